//! Codec configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HuffmanError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodecConfig {
    /// Capacity of the buffered reader and writer around files.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Reject a payload that ends before every byte is decoded.
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            strict: default_strict(),
            log_level: default_log_level(),
        }
    }
}

impl CodecConfig {
    /// Loads a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| HuffmanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|message| HuffmanError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

fn default_buffer_size() -> usize {
    64 * 1024
}

fn default_strict() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}
