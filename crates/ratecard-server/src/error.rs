//! Error types for the rates service
//!
//! Provides error handling for:
//! - Document store reads and writes
//! - Credential decoding and verification
//! - Service configuration

use std::path::PathBuf;

/// Failure in the rates document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("store io failure at {path}: {source}")]
    Io {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Stored document did not parse as a rate table
    #[error("stored rates document malformed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rate table could not be serialized for storage
    #[error("rates document encode failure: {source}")]
    Encode {
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while checking a bearer credential
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carried no bearer credential
    #[error("no bearer credential on the request")]
    MissingCredential,

    /// The credential was not a well-formed token
    #[error("credential malformed: {0}")]
    Malformed(String),

    /// The signature did not verify against the provider key
    #[error("credential signature invalid")]
    BadSignature,

    /// The claims carry an expiry in the past
    #[error("credential expired")]
    Expired,

    /// Claims could not be serialized while minting
    #[error("claims encode failure: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AuthError {
    /// Check if the credential never reached signature verification
    #[inline]
    #[must_use]
    pub fn is_absent_or_malformed(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Malformed(_))
    }
}

/// Failure while assembling the service configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Bind address did not parse
    #[error("bind address invalid: {0}")]
    Bind(#[from] std::net::AddrParseError),

    /// No provider verifying key was supplied
    #[error("verifying key missing: set RATECARD_IDENTITY_PUBKEY or RATECARD_IDENTITY_PUBKEY_B64")]
    MissingVerifyingKey,

    /// Supplied verifying key bytes were not a valid key
    #[error("verifying key invalid: {0}")]
    BadVerifyingKey(String),

    /// Supplied signing key bytes were not a valid key
    #[error("signing key invalid: {0}")]
    BadSigningKey(String),
}
