//! Archive configuration
//!
//! Settings are read from an explicit TOML file, or from ~/.ignore-zip/config.toml
//! when present, and fall back to built-in defaults.

use crate::core::error::{ArchiveError, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the user's home holding the configuration
pub const CONFIG_DIR: &str = ".ignore-zip";

/// Configuration file name
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Archive writing settings
    #[serde(default)]
    pub archive: ArchiveSettings,
}

/// Settings applied while walking the tree and writing the archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSettings {
    /// Compression method for archive entries
    pub compression: CompressionKind,
    /// Deflate level, library default when unset
    pub compression_level: Option<i64>,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Never add the output archive to itself when it lies under the root
    pub skip_output: bool,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            compression: CompressionKind::Deflated,
            compression_level: None,
            follow_links: false,
            skip_output: true,
        }
    }
}

/// Compression method for archive entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    /// No compression
    Stored,
    /// Deflate compression
    #[default]
    Deflated,
}

impl CompressionKind {
    pub fn to_zip_method(self) -> zip::CompressionMethod {
        match self {
            CompressionKind::Stored => zip::CompressionMethod::Stored,
            CompressionKind::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

impl ArchiveConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user file is used when it
    /// exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ArchiveError::configuration(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| {
            ArchiveError::configuration(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Per-user configuration path, `None` when no home directory is known
    pub fn default_path() -> Option<PathBuf> {
        UserDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ArchiveConfig::from_toml("").unwrap();
        assert_eq!(config, ArchiveConfig::default());
        assert_eq!(config.archive.compression, CompressionKind::Deflated);
        assert!(config.archive.skip_output);
        assert!(!config.archive.follow_links);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = ArchiveConfig::from_toml(
            r#"
[archive]
compression = "stored"
compression_level = 9
"#,
        )
        .unwrap();
        assert_eq!(config.archive.compression, CompressionKind::Stored);
        assert_eq!(config.archive.compression_level, Some(9));
        assert!(config.archive.skip_output);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(ArchiveConfig::from_toml("[archive]\ncompresion = \"stored\"\n").is_err());
        assert!(ArchiveConfig::from_toml("[archiv]\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ArchiveConfig::load(Some(&temp_dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_load_explicit_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[archive]\nfollow_links = true\n")?;

        let config = ArchiveConfig::load(Some(&path))?;
        assert!(config.archive.follow_links);

        std::fs::write(&path, "[archive]\nfollow_links = \"yes\"\n")?;
        assert!(ArchiveConfig::load(Some(&path)).is_err());
        Ok(())
    }
}
