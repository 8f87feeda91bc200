use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Prefix of environment overrides, e.g. `WAVEZIP_ENGINE__MAX_PARALLEL=2`.
pub const ENV_PREFIX: &str = "WAVEZIP_";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WAVEZIP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "wavezip.toml";

/// Picks the config file: explicit path, then `WAVEZIP_CONFIG`, then
/// `wavezip.toml` in the working directory if it exists.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        })
}

/// Load configuration: defaults, then the optional file, then environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FileKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[engine]
max_parallel = 2

[pipeline]
intermediate_kind = "ogg"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.engine.max_parallel, 2);
        assert_eq!(config.pipeline.intermediate_kind, FileKind::Ogg);
        assert_eq!(config.pipeline.source_kind, FileKind::Wave);
    }

    #[test]
    fn test_load_config_from_str_bad_kind() {
        let result = load_config_from_str("[pipeline]\nsource_kind = \"aiff\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/wavezip.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[converter]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
timeout_secs = 30

[logging]
json = true
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.converter.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.converter.timeout_secs, 30);
        assert!(config.logging.json);
        // Untouched sections keep their defaults
        assert!(config.pipeline.cleanup_intermediate);
    }

    #[test]
    fn test_load_config_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.pipeline.source_kind, FileKind::Wave);
        assert_eq!(config.pipeline.intermediate_kind, FileKind::Mp3);
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let explicit = PathBuf::from("/etc/wavezip.toml");
        assert_eq!(resolve_config_path(Some(explicit.clone())), Some(explicit));
    }
}
