use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Pipeline kinds differ and both name an audio format
/// - Converter timeout and bitrate are not 0
/// - Placer buffer size is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let pipeline = &config.pipeline;

    if pipeline.source_kind == pipeline.intermediate_kind {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.source_kind and pipeline.intermediate_kind are both '{}'",
            pipeline.source_kind
        )));
    }
    if pipeline.source_kind.audio_format().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.source_kind must be an audio kind, got '{}'",
            pipeline.source_kind
        )));
    }
    if pipeline.intermediate_kind.audio_format().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.intermediate_kind must be an audio kind, got '{}'",
            pipeline.intermediate_kind
        )));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.converter.bitrate_kbps == Some(0) {
        return Err(ConfigError::ValidationError(
            "converter.bitrate_kbps cannot be 0".to_string(),
        ));
    }

    if config.placer.copy_buffer_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "placer.copy_buffer_bytes cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FileKind;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_equal_kinds_fails() {
        let mut config = Config::default();
        config.pipeline.intermediate_kind = FileKind::Wave;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_non_audio_kinds_fail() {
        let mut config = Config::default();
        config.pipeline.intermediate_kind = FileKind::Zip;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.pipeline.source_kind = FileKind::All;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_timeout_zero_fails() {
        let mut config = Config::default();
        config.converter.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
