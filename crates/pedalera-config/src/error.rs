//! Error types for preset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing presets.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Failed to parse preset JSON
    #[error("failed to parse preset: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize a preset to JSON
    #[error("failed to serialize preset: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The document declares a format version this build cannot read
    #[error("unsupported preset version {found} (this build reads version 1)")]
    UnsupportedVersion {
        /// Version number found in the document.
        found: u32,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PresetError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PresetError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn unsupported_version_display() {
        let err = PresetError::UnsupportedVersion { found: 7 };
        assert_eq!(
            err.to_string(),
            "unsupported preset version 7 (this build reads version 1)"
        );
    }

    #[test]
    fn parse_error_exposes_source() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = PresetError::Parse(json_err);
        assert!(err.to_string().contains("failed to parse preset"));
        assert!(err.source().is_some());
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = PresetError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, PresetError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn write_file_display() {
        let err = PresetError::write_file("/a/b.json", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to write file"), "got: {msg}");
        assert!(msg.contains("/a/b.json"), "got: {msg}");
    }

    #[test]
    fn create_dir_source_is_some() {
        let err = PresetError::create_dir("/x", mock_io_err());
        assert!(err.source().is_some(), "CreateDir must expose I/O source");
    }

    #[test]
    fn unsupported_version_source_is_none() {
        let err = PresetError::UnsupportedVersion { found: 2 };
        assert!(err.source().is_none());
    }
}
