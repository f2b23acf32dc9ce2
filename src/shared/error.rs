use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// Reconciliation jobs map their outcome onto these so that scripts can
/// tell a clean run from a partial one without parsing the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Job passed its threshold (or an interactive command succeeded)
    Success = 0,
    /// Job finished but left work behind (unmapped values, degraded score)
    Partial = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (malformed data, network error, file I/O error, etc.)
    ApplicationError = 3,
    /// Job finished below its failure threshold
    Failed = 4,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::Partial => write!(f, "Partial (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::Failed => write!(f, "Failed (4)"),
        }
    }
}

/// Application-specific errors for catalog mapping.
///
/// "Not found" is deliberately absent: lookups return `Option` and a miss
/// is routine. These variants cover the conditions callers must be able to
/// tell apart from a miss.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed source file: {path}\nDetails: {details}\n\n💡 Hint: Fix the JSON in this file or restore it from data/backups")]
    MalformedSource { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid data directory: {path}\nReason: {reason}\n\n💡 Hint: Point --data-dir at a directory containing metaobjects/ and products/")]
    InvalidDataDir { path: PathBuf, reason: String },

    #[error("Remote catalog unavailable during {operation}\nDetails: {details}\n\n💡 Hint: Check SHOPIFY_ACCESS_TOKEN, the shop domain and your network connection")]
    RemoteUnavailable { operation: String, details: String },

    #[error("Remote catalog rejected {operation}: {}", messages.join("; "))]
    RemoteRejected {
        operation: String,
        messages: Vec<String>,
    },

    /// Validation error for builder patterns and config values
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Partial.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
        assert_eq!(ExitCode::Failed.as_i32(), 4);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(format!("{}", ExitCode::Partial), "Partial (1)");
        assert_eq!(format!("{}", ExitCode::Failed), "Failed (4)");
    }

    #[test]
    fn test_malformed_source_display() {
        let error = CatalogError::MalformedSource {
            path: PathBuf::from("/data/products/asus.json"),
            details: "expected value at line 1 column 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Malformed source file"));
        assert!(display.contains("/data/products/asus.json"));
        assert!(display.contains("line 1 column 1"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_remote_unavailable_display() {
        let error = CatalogError::RemoteUnavailable {
            operation: "metaobject search".to_string(),
            details: "connection refused".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("metaobject search"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_remote_rejected_joins_messages() {
        let error = CatalogError::RemoteRejected {
            operation: "productCreate".to_string(),
            messages: vec!["Title can't be blank".to_string(), "bad handle".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Remote catalog rejected productCreate: Title can't be blank; bad handle"
        );
    }

    #[test]
    fn test_malformed_source_survives_anyhow_downcast() {
        let err: anyhow::Error = CatalogError::MalformedSource {
            path: PathBuf::from("x.json"),
            details: "eof".to_string(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::MalformedSource { .. })
        ));
    }
}
