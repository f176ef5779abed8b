//! Error types for ripwave
//!
//! This module provides comprehensive error handling for the library, including:
//! - Domain-specific error types (Validation, Resource, Process, Stream)
//! - HTTP status code mapping for API integration
//! - Diagnostic classification for known upstream failure messages
//!   (private/age-restricted content, unavailable content)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for ripwave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ripwave
///
/// Each variant corresponds to one failure class of the acquisition and
/// delivery pipeline. Every variant still reaches workspace teardown before
/// it surfaces to the caller; teardown is owned by the resources themselves,
/// not by the error path.
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed validation before any resource was allocated
    #[error("validation error: {0}")]
    Validation(String),

    /// Temporary storage could not be created or managed
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// The external extraction tool failed, timed out, or produced nothing
    #[error("{0}")]
    Process(#[from] ProcessError),

    /// Artifact read or transport failure mid-delivery
    #[error("stream error: {0}")]
    Stream(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),
}

/// Temporary-storage errors
///
/// These are fatal to the request: without a workspace there is nothing to
/// download into, and without a cookie jar a configured credential blob
/// cannot be honored.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Workspace directory could not be created under the temp root
    #[error("failed to create workspace under {root}: {source}")]
    WorkspaceCreate {
        /// The temp root the workspace was to be created under
        root: PathBuf,
        /// The underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Cookie blob could not be written to a temp file
    #[error("failed to materialize cookie jar: {source}")]
    CookieJar {
        /// The underlying filesystem error
        #[source]
        source: std::io::Error,
    },
}

/// External extraction tool errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The tool binary is missing or could not be spawned
    #[error("extraction tool unavailable: {0}")]
    Launch(String),

    /// The tool exceeded the wall-clock timeout or the diagnostic capture cap
    /// and was terminated
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout {
        /// The configured wall-clock timeout in seconds
        timeout_secs: u64,
    },

    /// The tool exited with a non-zero status
    #[error("extraction tool exited with code {exit_code}: {diagnostic}")]
    ToolFailure {
        /// The subprocess exit code
        exit_code: i32,
        /// Captured stderr (stdout as fallback), tail-truncated
        diagnostic: String,
    },

    /// The tool exited successfully but the workspace is empty
    #[error("extraction produced no output file")]
    NoOutput,
}

/// A known upstream failure condition recognized in tool diagnostics
///
/// The extraction tool reports source-side refusals as free text on stderr.
/// The two conditions a client can act on are matched here and translated to
/// specific status codes and messages instead of a generic gateway error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownToolFailure {
    /// Source refused access: private or age-restricted content
    Restricted,
    /// Source reports the content as gone or never available
    Unavailable,
}

impl KnownToolFailure {
    /// Client-facing message for this condition
    pub fn message(self) -> &'static str {
        match self {
            KnownToolFailure::Restricted => "This video is private or age-restricted",
            KnownToolFailure::Unavailable => "This video is unavailable",
        }
    }
}

impl ProcessError {
    /// Match the diagnostic text against known upstream conditions
    ///
    /// Returns `None` for every variant except `ToolFailure`, and for
    /// `ToolFailure` diagnostics that match no known pattern.
    pub fn known_failure(&self) -> Option<KnownToolFailure> {
        let ProcessError::ToolFailure { diagnostic, .. } = self else {
            return None;
        };
        if diagnostic.contains("Private video") || diagnostic.contains("age-restricted") {
            return Some(KnownToolFailure::Restricted);
        }
        if diagnostic.contains("Video unavailable") {
            return Some(KnownToolFailure::Unavailable);
        }
        None
    }
}

/// API error response format
///
/// The wire shape is a flat `{ "error": string }` object. The status code
/// carries the failure class; the message is the human-readable part.
///
/// # Example JSON Response
///
/// ```json
/// { "error": "This video is private or age-restricted" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    /// Create a new API error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let message = match &error {
            // The client sees the validation text verbatim
            Error::Validation(msg) => msg.clone(),
            // Known upstream conditions get the specific client-facing text
            Error::Process(p) => match p.known_failure() {
                Some(known) => known.message().to_string(),
                None => format!("Download failed: {p}"),
            },
            // Server-side failures keep a generic message; the detail is logged
            Error::Resource(_) | Error::Io(_) | Error::ApiServer(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        ApiError::new(message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for ProcessError {
    fn status_code(&self) -> u16 {
        // Known upstream conditions are client-actionable, not gateway faults
        match self.known_failure() {
            Some(KnownToolFailure::Restricted) => return 403,
            Some(KnownToolFailure::Unavailable) => return 404,
            None => {}
        }
        match self {
            // 503 Service Unavailable - tool missing or unrunnable on this host
            ProcessError::Launch(_) => 503,
            // 504 Gateway Timeout - upstream fetch exceeded the deadline
            ProcessError::Timeout { .. } => 504,
            // 502 Bad Gateway - upstream tool failed
            ProcessError::ToolFailure { .. } => 502,
            ProcessError::NoOutput => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self.known_failure() {
            Some(KnownToolFailure::Restricted) => return "content_restricted",
            Some(KnownToolFailure::Unavailable) => return "content_unavailable",
            None => {}
        }
        match self {
            ProcessError::Launch(_) => "tool_unavailable",
            ProcessError::Timeout { .. } => "tool_timeout",
            ProcessError::ToolFailure { .. } => "tool_failure",
            ProcessError::NoOutput => "no_output",
        }
    }
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - client input error, no workspace allocated
            Error::Validation(_) => 400,

            // Process errors carry their own mapping (403/404/502/503/504)
            Error::Process(p) => p.status_code(),

            // 500 Internal Server Error - server-side issues
            Error::Resource(_) => 500,
            Error::Stream(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServer(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Resource(_) => "resource_error",
            Error::Process(p) => p.error_code(),
            Error::Stream(_) => "stream_error",
            Error::Io(_) => "io_error",
            Error::ApiServer(_) => "api_server_error",
        }
    }
}
