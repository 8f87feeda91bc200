//! Configuration for the placer module.

use serde::{Deserialize, Serialize};

/// How an archive is moved when a plain rename is not possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Read/write buffer for cross-filesystem copies.
    pub copy_buffer_bytes: usize,

    /// Compare SHA-256 of source and copy before deleting the source.
    pub verify_copies: bool,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            copy_buffer_bytes: 1 << 20,
            verify_copies: true,
        }
    }
}

impl PlacerConfig {
    pub fn with_copy_verification(mut self, enabled: bool) -> Self {
        self.verify_copies = enabled;
        self
    }

    pub fn with_copy_buffer(mut self, bytes: usize) -> Self {
        self.copy_buffer_bytes = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlacerConfig::default();
        assert_eq!(config.copy_buffer_bytes, 1024 * 1024);
        assert!(config.verify_copies);
    }

    #[test]
    fn test_partial_table() {
        let config: PlacerConfig = toml::from_str("verify_copies = false").unwrap();
        assert!(!config.verify_copies);
        assert_eq!(config.copy_buffer_bytes, PlacerConfig::default().copy_buffer_bytes);
    }
}
