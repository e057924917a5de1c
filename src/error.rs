//! Error types for bundle spec loading and schema conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion.
///
/// Recoverable problems (bad patterns, bad dependency values, metadata copy
/// failures) are reported as [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported type \"{type_name}\" for parameter \"{parameter}\"")]
    UnsupportedType { parameter: String, type_name: String },
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a bundle spec.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid bundle spec: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("apb.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::InvalidJson { source };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unsupported_type_display() {
        let err = ConvertError::UnsupportedType {
            parameter: "size".into(),
            type_name: "shape".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported type \"shape\" for parameter \"size\""
        );
        assert_eq!(err.exit_code(), 2);
    }
}
