//! Conversion job lifecycle integration tests.
//!
//! These tests drive jobs through the mock converter:
//! - Argument validation at construction
//! - Item selection by kind
//! - Status sequence and progress counts under concurrency
//! - Observer registration order
//! - Fail-fast behavior

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use wavezip_core::{
    engine::{ConversionJob, EngineError, JobStatus},
    stage::{Transcoder, ZipArchiver},
    testing::{fixtures, MockConverter, RecordingObserver},
    FileKind, JobObserver,
};

/// Test helper holding a source album and the mock it is converted with.
struct TestHarness {
    converter: MockConverter,
    temp: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let converter = MockConverter::new();
        converter
            .set_conversion_duration(Duration::from_millis(10))
            .await;
        Self {
            converter,
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn album(&self, names: &[&str]) -> std::path::PathBuf {
        fixtures::album(self.temp.path(), "album", names).expect("Failed to create album")
    }

    fn out_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("out")
    }

    fn transcode_job(&self, input: &Path) -> ConversionJob<Transcoder<MockConverter>> {
        Transcoder::new(Arc::new(self.converter.clone()))
            .job(
                FileKind::Wave,
                FileKind::Mp3,
                input,
                Some(self.out_dir()),
            )
            .expect("Failed to create job")
    }
}

#[tokio::test]
async fn test_equal_kinds_rejected() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav"]);

    let result = Transcoder::new(Arc::new(harness.converter.clone())).job(
        FileKind::Mp3,
        FileKind::Mp3,
        &album,
        None,
    );

    let err = result.err().expect("equal kinds must be rejected");
    assert!(err.is_invalid_argument());
    assert_eq!(harness.converter.conversion_count().await, 0);
}

#[tokio::test]
async fn test_only_source_kind_is_counted() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav", "c.mp3", "d.txt", "e.WAV"]);

    let job = harness.transcode_job(&album);
    assert_eq!(job.total_count(), 2);
    assert_eq!(job.processed_count(), 0);
    assert_eq!(job.status(), JobStatus::Wait);

    let summary = assert_ok!(job.run().await);
    assert_eq!(summary.processed_count, 2);
    assert_eq!(summary.total_count, 2);

    let requests = harness.converter.recorded_requests().await;
    let mut inputs: Vec<_> = requests
        .iter()
        .map(|r| r.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    inputs.sort();
    assert_eq!(inputs, vec!["a.wav", "b.wav"]);
}

#[tokio::test]
async fn test_empty_input_waits_without_converting() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["notes.txt"]);
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness.transcode_job(&album).with_observer(recorder.clone());
    let summary = assert_ok!(job.run().await);

    assert_eq!(summary.status, JobStatus::Wait);
    assert_eq!(recorder.statuses(), vec![JobStatus::Wait]);
    assert_eq!(harness.converter.conversion_count().await, 0);
    // prepare never ran
    assert!(!harness.out_dir().exists());
}

#[tokio::test]
async fn test_running_counts_are_exact_under_concurrency() {
    let harness = TestHarness::new().await;
    let names: Vec<String> = (1..=8).map(|i| format!("{:02}.wav", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let album = harness.album(&names);
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness
        .transcode_job(&album)
        .with_max_parallel(4)
        .with_observer(recorder.clone());
    let summary = assert_ok!(job.run().await);

    assert_eq!(summary.status, JobStatus::Complete);
    assert_eq!(recorder.running_counts(), (1..=8).collect::<Vec<_>>());

    let statuses = recorder.statuses();
    assert_eq!(statuses.first(), Some(&JobStatus::Start));
    assert_eq!(statuses.last(), Some(&JobStatus::Complete));
    assert_eq!(recorder.count(JobStatus::Complete), 1);

    let max = harness.converter.max_in_flight();
    assert!(max > 1, "expected overlap, got {}", max);
    assert!(max <= 4, "limit exceeded: {}", max);
}

#[tokio::test]
async fn test_every_running_names_a_distinct_item() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav", "c.wav"]);
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness.transcode_job(&album).with_observer(recorder.clone());
    assert_ok!(job.run().await);

    let mut targets: Vec<_> = recorder
        .transitions()
        .into_iter()
        .filter(|t| t.status == JobStatus::Running)
        .filter_map(|t| t.target_file_path)
        .collect();
    targets.sort();
    targets.dedup();
    assert_eq!(targets.len(), 3);
    assert!(targets.iter().all(|t| t.starts_with(&album)));
}

#[tokio::test]
async fn test_observers_notified_in_registration_order() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav"]);
    let log = Arc::new(Mutex::new(Vec::new()));

    let job = harness
        .transcode_job(&album)
        .with_observer(Arc::new(RecordingObserver::with_shared_log("first", log.clone())))
        .with_observer(Arc::new(RecordingObserver::with_shared_log("second", log.clone())));
    assert_ok!(job.run().await);

    let log = log.lock().unwrap().clone();
    assert_eq!(log.len(), 8);
    for pair in log.chunks(2) {
        let (first, second) = (&pair[0], &pair[1]);
        assert!(first.starts_with("first:"), "{:?}", pair);
        assert!(second.starts_with("second:"), "{:?}", pair);
        assert_eq!(first.split(':').nth(1), second.split(':').nth(1));
    }
}

#[tokio::test]
async fn test_removed_observer_is_not_notified() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav"]);
    let kept = Arc::new(RecordingObserver::new());
    let removed = Arc::new(RecordingObserver::new());
    let removed_dyn: Arc<dyn JobObserver> = removed.clone();

    let mut job = harness
        .transcode_job(&album)
        .with_observer(kept.clone())
        .with_observer(removed_dyn.clone());
    assert!(job.remove_observer(&removed_dyn));
    assert_ok!(job.run().await);

    assert_eq!(kept.count(JobStatus::Complete), 1);
    assert!(removed.transitions().is_empty());
}

#[tokio::test]
async fn test_failure_stops_sequential_job() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav", "c.wav"]);
    harness.converter.fail_on_call(2).await;
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness
        .transcode_job(&album)
        .with_max_parallel(1)
        .with_observer(recorder.clone());
    let err = assert_err!(job.run().await);

    assert!(matches!(err, EngineError::Stage { ref stage, .. } if stage == "transcode"));
    assert_eq!(
        recorder.statuses(),
        vec![JobStatus::Start, JobStatus::Running, JobStatus::Failed]
    );
    assert_eq!(recorder.count(JobStatus::Complete), 0);
    // The third item is never attempted
    assert_eq!(harness.converter.conversion_count().await, 2);
    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(job.processed_count(), 1);
    // Converted items stay where they are
    assert!(harness.out_dir().join("a.mp3").exists());
}

#[tokio::test]
async fn test_failure_under_concurrency_never_completes() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav", "c.wav", "d.wav"]);
    harness.converter.fail_on_call(2).await;
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness
        .transcode_job(&album)
        .with_max_parallel(4)
        .with_observer(recorder.clone());
    assert_err!(job.run().await);

    assert!(recorder.count(JobStatus::Running) <= 3);
    assert_eq!(recorder.count(JobStatus::Failed), 1);
    assert_eq!(recorder.count(JobStatus::Complete), 0);
    assert_eq!(recorder.statuses().last(), Some(&JobStatus::Failed));
}

#[tokio::test]
async fn test_rerun_starts_from_zero() {
    let harness = TestHarness::new().await;
    let album = harness.album(&["a.wav", "b.wav"]);
    let recorder = Arc::new(RecordingObserver::new());

    let job = harness.transcode_job(&album).with_observer(recorder.clone());
    assert_ok!(job.run().await);
    recorder.clear();

    let summary = assert_ok!(job.run().await);
    assert_eq!(summary.processed_count, 2);
    assert_eq!(recorder.running_counts(), vec![1, 2]);
}

#[tokio::test]
async fn test_archive_job_serializes_entries() {
    let temp = TempDir::new().unwrap();
    let dir = fixtures::album(temp.path(), "mp3s", &["a.mp3", "b.mp3", "c.mp3", "cover.jpg"])
        .unwrap();
    let recorder = Arc::new(RecordingObserver::new());

    let job = ZipArchiver::new()
        .job(FileKind::Mp3, &dir)
        .unwrap()
        .with_max_parallel(8)
        .with_observer(recorder.clone());
    let summary = assert_ok!(job.run().await);

    assert_eq!(summary.status, JobStatus::Complete);
    assert_eq!(recorder.running_counts(), vec![1, 2, 3]);

    let archive = std::fs::File::open(temp.path().join("mp3s.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(archive).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3"]);

    let mut entry = archive.by_name("b.mp3").unwrap();
    let mut body = String::new();
    std::io::Read::read_to_string(&mut entry, &mut body).unwrap();
    assert_eq!(body, "b.mp3");
}
