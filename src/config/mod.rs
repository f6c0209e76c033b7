//! Configuration management for ignore-zip
//!
//! Settings are stored in ~/.ignore-zip/config.toml or passed explicitly.

pub mod archive_config;

// Re-export commonly used items
pub use archive_config::{ArchiveConfig, ArchiveSettings, CompressionKind};
