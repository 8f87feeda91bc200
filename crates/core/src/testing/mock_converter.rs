//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::converter::{Converter, ConverterError, MediaInfo, TranscodeRequest, Transcoded};

/// A convert call seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    pub request: TranscodeRequest,
    pub success: bool,
}

#[derive(Debug)]
struct State {
    conversions: Vec<RecordedConversion>,
    probe_results: HashMap<PathBuf, MediaInfo>,
    next_error: Option<ConverterError>,
    fail_on_call: Option<usize>,
    delay: Duration,
    write_outputs: bool,
}

/// In-memory [`Converter`] with scripted behavior.
///
/// - records every request
/// - writes `mock:<input path>` to each output
/// - fails the next call, or the Nth call overall
/// - sleeps per call and tracks how many calls overlapped
///
/// Clones share their state, so a test can keep one handle and give
/// another to the job.
///
/// # Example
///
/// ```rust,ignore
/// use wavezip_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_on_call(2).await;
///
/// let job = Transcoder::new(Arc::new(converter.clone()))
///     .job(FileKind::Wave, FileKind::Mp3, dir, None)?;
/// assert!(job.run().await.is_err());
/// assert_eq!(converter.conversion_count().await, 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    state: Arc<Mutex<State>>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                conversions: Vec::new(),
                probe_results: HashMap::new(),
                next_error: None,
                fail_on_call: None,
                delay: Duration::ZERO,
                write_outputs: true,
            })),
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every convert call, failed ones included.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.state.lock().await.conversions.clone()
    }

    /// Requests of the successful conversions, in completion order.
    pub async fn recorded_requests(&self) -> Vec<TranscodeRequest> {
        self.state
            .lock()
            .await
            .conversions
            .iter()
            .filter(|c| c.success)
            .map(|c| c.request.clone())
            .collect()
    }

    pub async fn conversion_count(&self) -> usize {
        self.state.lock().await.conversions.len()
    }

    /// Highest number of convert calls running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn set_probe_result(&self, path: impl AsRef<Path>, info: MediaInfo) {
        self.state
            .lock()
            .await
            .probe_results
            .insert(path.as_ref().to_path_buf(), info);
    }

    /// The next call of any kind fails with `error`.
    pub async fn set_next_error(&self, error: ConverterError) {
        self.state.lock().await.next_error = Some(error);
    }

    /// The `n`th convert call (1-based) fails.
    pub async fn fail_on_call(&self, n: usize) {
        self.state.lock().await.fail_on_call = Some(n);
    }

    pub async fn set_conversion_duration(&self, delay: Duration) {
        self.state.lock().await.delay = delay;
    }

    /// Whether convert calls write a stub output file.
    pub async fn set_write_outputs(&self, write: bool) {
        self.state.lock().await.write_outputs = write;
    }

    async fn take_error(&self) -> Option<ConverterError> {
        self.state.lock().await.next_error.take()
    }

    async fn run_convert(
        &self,
        call: usize,
        request: &TranscodeRequest,
    ) -> Result<Transcoded, ConverterError> {
        let (delay, fail_on_call, write_outputs) = {
            let state = self.state.lock().await;
            (state.delay, state.fail_on_call, state.write_outputs)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        if fail_on_call == Some(call) {
            return Err(ConverterError::exited(
                &request.input,
                format!("injected failure on call {}", call),
                Vec::new(),
            ));
        }
        if !request.input.exists() {
            return Err(ConverterError::InputNotFound {
                path: request.input.clone(),
            });
        }

        let mut bytes = 0;
        if write_outputs {
            if let Some(parent) = request.output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let body = format!("mock:{}", request.input.display());
            tokio::fs::write(&request.output, &body).await?;
            bytes = body.len() as u64;
        }

        Ok(Transcoded {
            output: request.output.clone(),
            bytes,
            elapsed: delay,
        })
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(info) = self.state.lock().await.probe_results.get(path) {
            return Ok(info.clone());
        }

        Ok(MediaInfo {
            path: path.to_path_buf(),
            container: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
            size_bytes: 10 * 1024 * 1024,
            duration: Some(Duration::from_secs(180)),
            audio: None,
        })
    }

    async fn convert(&self, request: TranscodeRequest) -> Result<Transcoded, ConverterError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.run_convert(call, &request).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state.lock().await.conversions.push(RecordedConversion {
            request,
            success: result.is_ok(),
        });
        result
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match self.take_error().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
