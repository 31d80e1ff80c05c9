//! Error types for the calculator client
//!
//! Provides error handling for:
//! - Rate table fetch failures (transport and HTTP rejections)
//! - Submission failures (local validation, credentials, server rejection)
//! - Local state cache read/write failures

use ratecard_core::ValidationError;
use std::path::PathBuf;

/// Failure while fetching the rate table
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The service answered with a non-success status
    #[error("rates fetch rejected with http status {status}: {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-provided reason, or the status text
        reason: String,
    },

    /// The request never produced an HTTP response
    #[error("rates fetch transport failure: {0}")]
    Transport(String),

    /// The response body did not parse as a rate table
    #[error("rates document malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status of the rejection, when one was received
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Malformed(_) => None,
        }
    }
}

/// Failure while submitting an edited rate table
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Local validation refused the table; nothing was sent
    #[error("submission refused before send: {0}")]
    Invalid(#[from] ValidationError),

    /// No bearer credential was available to attach
    #[error("no credential available for submission")]
    MissingCredential,

    /// The service rejected the write
    #[error("update rejected with http status {status}: {reason}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided reason, or the status text
        reason: String,
    },

    /// The request never produced an HTTP response
    #[error("update transport failure: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Check if the rejection was an authentication or authorization one
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::Rejected { status: 401 | 403, .. }
        )
    }

    /// Check if nothing left the client
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::MissingCredential)
    }
}

/// Failure while writing local client state
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("cache io failure at {path}: {source}")]
    Io {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized
    #[error("cache encode failure: {0}")]
    Encode(#[from] serde_json::Error),
}
