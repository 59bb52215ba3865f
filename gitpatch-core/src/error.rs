//! Error types for SCM gateway calls.

use thiserror::Error;

/// HTTP status the upstream uses for a missing resource.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Coarse classification of a failed gateway call.
///
/// Only [`ScmErrorKind::NotFound`] changes what the updater does next; every
/// other kind is surfaced as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmErrorKind {
    /// The upstream answered 404 for the requested resource.
    NotFound,
    /// The upstream answered with some other error status (auth, conflict,
    /// validation, server error).
    Status,
    /// No response was received (connection refused, DNS, timeout).
    Transport,
    /// A success response whose body could not be decoded.
    InvalidResponse,
}

/// A failed call against the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.message, .status, .response))]
pub struct ScmError {
    pub kind: ScmErrorKind,
    /// Upstream status code, absent for transport failures.
    pub status: Option<u16>,
    pub message: String,
    /// Raw response body returned with the status, possibly empty.
    pub response: String,
}

fn render(message: &str, status: &Option<u16>, response: &str) -> String {
    match status {
        Some(code) => format!("{message}: response status {code}: {response}"),
        None => message.to_owned(),
    }
}

impl ScmError {
    /// Build an error from an upstream status code. 404 maps to
    /// [`ScmErrorKind::NotFound`].
    pub fn from_status(message: impl Into<String>, status: u16, response: impl Into<String>) -> Self {
        let kind = if status == STATUS_NOT_FOUND {
            ScmErrorKind::NotFound
        } else {
            ScmErrorKind::Status
        };
        Self {
            kind,
            status: Some(status),
            message: message.into(),
            response: response.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_status(message, STATUS_NOT_FOUND, "")
    }

    /// Connection-level failure with no response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ScmErrorKind::Transport,
            status: None,
            message: message.into(),
            response: String::new(),
        }
    }

    pub fn invalid_response(message: impl Into<String>, status: u16) -> Self {
        Self {
            kind: ScmErrorKind::InvalidResponse,
            status: Some(status),
            message: message.into(),
            response: String::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ScmErrorKind::NotFound
    }
}

/// Returns true if the error represents a NotFound response from the
/// upstream service.
pub fn is_not_found(err: &ScmError) -> bool {
    err.is_not_found()
}
