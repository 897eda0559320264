//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Configuration and content failures abort the operation that raised them;
//! image failures never surface here, they degrade inside the image client.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Model or image provider error with status context
    #[error("{provider} API error: {message}")]
    Provider {
        /// Display name of the provider that failed.
        provider: &'static str,
        /// Human-readable error description.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// A presentation setting supplied by the user is out of range
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Model output could not be parsed into slide content
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// Document assembly or write failure
    #[error("Export failed: {0}")]
    Export(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a provider error with HTTP status
    pub fn provider_status(provider: &'static str, message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            400 => Some("The provider rejected the request - check the model name"),
            401 | 403 => Some("Check GEMINI_API_KEY and TOGETHER_API_KEY environment variables"),
            404 => Some("The requested model or endpoint was not found"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Provider server error - try again later"),
            _ => None,
        };
        Self::Provider {
            provider,
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create an invalid input error for a named setting
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput { field, message: message.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }

    /// Message suitable for showing to the person who requested the operation.
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { hint: Some(hint), .. } => format!("{self} ({hint})"),
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Export(format!("zip: {e}"))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Self::Export(format!("xml write: {e}"))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Export(format!("xml: {e}"))
    }
}
