//! Error types shared by every form-tabs crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────
    /// A field descriptor violates the assembly precondition
    #[error("Invalid field descriptor at index {index}: {message}")]
    InvalidInput { index: usize, message: String },

    #[error("Malformed location fragment: {message}")]
    FragmentDecode { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Page/Panel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No mounted tab panel with id {id}")]
    UnknownPanel { id: u64 },

    #[error("Invalid navigation target: {url}")]
    NavigationTarget { url: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn invalid_input(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            index,
            message: message.into(),
        }
    }

    pub fn fragment_decode(message: impl Into<String>) -> Self {
        Self::FragmentDecode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn navigation_target(url: impl Into<String>) -> Self {
        Self::NavigationTarget { url: url.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors fall back to a default (no prior selection,
    /// default settings) instead of aborting the panel.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FragmentDecode { .. }
                | Error::Config { .. }
                | Error::ConfigNotFound { .. }
                | Error::NavigationTarget { .. }
        )
    }

    /// Check if this error should abort mounting
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidInput { .. } | Error::Json(_))
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
