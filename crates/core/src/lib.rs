pub mod config;
pub mod converter;
pub mod engine;
pub mod kind;
pub mod metrics;
pub mod observer;
pub mod paths;
pub mod pipeline;
pub mod placer;
pub mod stage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, resolve_config_path, validate_config, Config, ConfigError,
    LoggingConfig,
};
pub use converter::{
    AudioFormat, AudioStream, Converter, ConverterConfig, ConverterError, EncodeOptions,
    EncoderCapabilities, FfmpegConverter, MediaInfo, TranscodeRequest, Transcoded,
};
pub use engine::{
    ConversionJob, EngineConfig, EngineError, JobSpec, JobStatus, JobSummary, JobView,
    StageAdapter, StageError, WriteMode,
};
pub use kind::{FileKind, UnknownKind};
pub use observer::{
    ArchiveMessages, ConsoleObserver, JobObserver, MetricsObserver, StageMessages,
    TracingObserver, TranscodeMessages,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineOutcome};
pub use placer::{FsPlacer, Placer, PlacerConfig, PlacerError, Relocation};
pub use stage::{Transcoder, ZipArchiver};
