//! Error types for ignore-zip

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ignore-zip operations
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Root folder errors
    #[error("Root folder not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Root path is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// Ignore file errors
    #[error("Invalid pattern '{pattern}' in {file} at line {line}: {source}")]
    PatternCompile {
        file: PathBuf,
        line: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read ignore file {path}: {source}")]
    IgnoreFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output errors
    #[error("Failed to write archive {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive format error in {path}: {source}")]
    ArchiveFormat {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Create a new root not found error
    pub fn root_not_found(path: PathBuf) -> Self {
        Self::RootNotFound { path }
    }

    /// Create a new root not a directory error
    pub fn root_not_directory(path: PathBuf) -> Self {
        Self::RootNotDirectory { path }
    }

    /// Create a new pattern compile error
    pub fn pattern_compile(
        file: PathBuf,
        line: usize,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Self::PatternCompile {
            file,
            line,
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new output write error
    pub fn output_write(path: PathBuf, source: std::io::Error) -> Self {
        Self::OutputWrite { path, source }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before any archive work began
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. }
                | Self::RootNotDirectory { .. }
                | Self::PatternCompile { .. }
                | Self::IgnoreFileRead { .. }
                | Self::ConfigurationError { .. }
        )
    }
}

/// Result type alias for ignore-zip operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compile_message_names_file_and_line() {
        let source = regex::Regex::new("[").unwrap_err();
        let err = ArchiveError::pattern_compile(PathBuf::from("sub/.gitignore"), 3, "[", source);

        let message = err.to_string();
        assert!(message.contains("sub/.gitignore"));
        assert!(message.contains("line 3"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_output_errors_are_not_configuration() {
        let err = ArchiveError::output_write(
            PathBuf::from("out.zip"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("out.zip"));
    }
}
