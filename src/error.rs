//! Unified error type for the navigation tool.
//!
//! Failing to find an implementation is not an error (see `grpcnav::Resolution`);
//! these are the host-side failures around it.

use thiserror::Error;

/// All errors that can occur while indexing sources or serving a lookup.
#[derive(Error, Debug)]
pub enum NavError {
    /// I/O error (file read, directory access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory does not exist
    #[error("Directory does not exist: {0}")]
    DirNotFound(String),

    /// Source file does not exist
    #[error("File does not exist: {0}")]
    FileNotFound(String),

    /// Mutually exclusive flags or other argument validation error
    #[error("{0}")]
    InvalidArgs(String),

    /// tree-sitter refused the grammar (ABI mismatch)
    #[error("Failed to load {language} grammar: {source}")]
    Grammar {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },

    /// tree-sitter produced no tree for a file
    #[error("Failed to parse {path}")]
    Parse { path: String },

    /// JSON output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = NavError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_dir_not_found_display() {
        let err = NavError::DirNotFound("/nonexistent".to_string());
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn test_file_not_found_display() {
        let err = NavError::FileNotFound("src/Client.java".to_string());
        assert_eq!(err.to_string(), "File does not exist: src/Client.java");
    }

    #[test]
    fn test_parse_display() {
        let err = NavError::Parse { path: "Broken.java".to_string() };
        assert!(err.to_string().contains("Broken.java"));
    }

    #[test]
    fn test_invalid_args_display_is_verbatim() {
        let err = NavError::InvalidArgs("--line must be >= 1".to_string());
        assert_eq!(err.to_string(), "--line must be >= 1");
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let nav_err: NavError = io_err.into();
        assert!(matches!(nav_err, NavError::Io(_)));
    }

    #[test]
    fn test_json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let nav_err: NavError = json_err.into();
        assert!(nav_err.to_string().starts_with("JSON error"));
    }
}
