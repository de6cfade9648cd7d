//! Centralized error handling for Slipbox
//!
//! Every failure the editor core can produce is absorbed locally: the host
//! sees a rejected call or a logged fallback, never a crash. This module
//! defines the error taxonomy and the graceful-degradation helper used to
//! turn errors into defaults.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the editor core.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the editor core.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Editor Surface Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The initial document could not be loaded; the surface fell back to
    /// an empty editable document.
    ContentLoadFailed { reason: String },

    /// A command identifier or payload outside the closed dispatch set
    InvalidCommand(String),

    /// The host issued a call before the surface reported ready
    NotReady,

    /// A host call could not be delivered to the surface
    BridgeClosed,

    // ─────────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse JSON (configuration, bridge request or saved state)
    InvalidJson {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

impl Error {
    /// Shorthand for an `InvalidCommand` error.
    pub fn invalid_command(what: impl Into<String>) -> Self {
        Error::InvalidCommand(what.into())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidJson {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ContentLoadFailed { reason } => {
                write!(f, "Editor content failed to load: {}", reason)
            }
            Error::InvalidCommand(what) => write!(f, "Invalid editor command: {}", what),
            Error::NotReady => write!(f, "Editor surface is not ready"),
            Error::BridgeClosed => write!(f, "Editor bridge is closed"),

            Error::Io(err) => write!(f, "I/O error: {}", err),

            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::InvalidJson { message, .. } => {
                write!(f, "Invalid JSON: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::InvalidJson { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::ContentLoadFailed { .. }
            | Error::InvalidCommand(_)
            | Error::NotReady
            | Error::BridgeClosed
            | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_command_helper() {
        let err = Error::invalid_command("shout");
        assert!(matches!(err, Error::InvalidCommand(ref what) if what == "shout"));
        assert_eq!(err.to_string(), "Invalid editor command: shout");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::InvalidJson { .. }));
    }

    #[test]
    fn test_display_not_ready() {
        assert_eq!(Error::NotReady.to_string(), "Editor surface is not ready");
    }

    #[test]
    fn test_display_content_load_failed() {
        let err = Error::ContentLoadFailed {
            reason: "template missing".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("failed to load"));
        assert!(msg.contains("template missing"));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error as StdError;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err = Error::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_simple_variants() {
        use std::error::Error as StdError;
        assert!(Error::NotReady.source().is_none());
        assert!(Error::BridgeClosed.source().is_none());
        assert!(Error::ConfigDirNotFound.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: super::Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: super::Result<i32> = Err(Error::NotReady);
        assert_eq!(result.unwrap_or_warn_default(7, "test context"), 7);
    }
}
