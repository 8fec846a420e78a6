//! Configuration system for yamlpipe.
//!
//! Settings come from `~/.config/yamlpipe/config.toml` when it exists and fall
//! back to defaults otherwise. Command-line flags override individual fields
//! after loading.
//!
//! # Example
//!
//! ```
//! use yamlpipe::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.delimiter, ".");
//! assert_eq!(config.macro_namespace, "yamlpipe");
//!
//! let custom = Config {
//!     delimiter: "/".to_string(),
//!     ..Config::default()
//! };
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for yamlpipe.
///
/// # Fields
///
/// * `delimiter` - Default YAML-path segment delimiter (default: ".")
/// * `macro_namespace` - Namespace of `${NS::name}` macro tokens (default: "yamlpipe")
/// * `output_format` - "yaml" or "json" (default: "yaml")
/// * `create_backup` - Create .bak files before overwriting (default: false)
/// * `indent_size` - Spaces per indentation level in JSON output (default: 2)
/// * `strict_sequences` - Abort when a path descends into a sequence holding
///   non-mapping elements (default: true)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default YAML-path delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Namespace for macro tokens
    #[serde(default = "default_macro_namespace")]
    pub macro_namespace: String,

    /// "yaml" or "json"
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,

    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    #[serde(default = "default_strict_sequences")]
    pub strict_sequences: bool,
}

fn default_delimiter() -> String {
    crate::yamlpath::DEFAULT_DELIMITER.to_string()
}

fn default_macro_namespace() -> String {
    "yamlpipe".to_string()
}

fn default_output_format() -> String {
    "yaml".to_string()
}

fn default_indent_size() -> usize {
    2
}

fn default_strict_sequences() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            macro_namespace: default_macro_namespace(),
            output_format: default_output_format(),
            create_backup: false,
            indent_size: default_indent_size(),
            strict_sequences: default_strict_sequences(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/yamlpipe/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("yamlpipe");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable config file");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// True when output should be written as JSON.
    pub fn json_output(&self) -> bool {
        self.output_format.eq_ignore_ascii_case("json")
    }
}
