//! Service configuration
//!
//! Explicit flags beat environment variables; bind and store fall back
//! to defaults. The provider verifying key has no default: the service
//! refuses to start without one, since every write check depends on it.

use crate::error::ConfigError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{SigningKey, VerifyingKey};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default rates document path
pub const DEFAULT_STORE: &str = "rates.json";

/// Runtime configuration for the service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket the service listens on
    pub bind: SocketAddr,
    /// Path of the rates document
    pub store_path: PathBuf,
    /// Provider verifying key
    pub verifying_key: VerifyingKey,
}

impl ServerConfig {
    /// Assemble the configuration from flags and the environment
    pub fn resolve(
        bind: Option<&str>,
        store: Option<&str>,
        pubkey_hex: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind {
            Some(value) => value.to_string(),
            None => env::var("RATECARD_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
        };
        let bind: SocketAddr = bind.trim().parse()?;

        let store_path = match store {
            Some(value) => PathBuf::from(value),
            None => env::var("RATECARD_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE)),
        };

        let verifying_key = match pubkey_hex {
            Some(value) => verifying_key_from_hex(value)?,
            None => verifying_key_from_env()?,
        };

        Ok(Self {
            bind,
            store_path,
            verifying_key,
        })
    }
}

/// Load the provider key from the environment
///
/// `RATECARD_IDENTITY_PUBKEY` carries hex. Deployments that can only
/// ship an encoded blob set `RATECARD_IDENTITY_PUBKEY_B64` instead.
pub fn verifying_key_from_env() -> Result<VerifyingKey, ConfigError> {
    if let Ok(value) = env::var("RATECARD_IDENTITY_PUBKEY") {
        return verifying_key_from_hex(&value);
    }
    if let Ok(value) = env::var("RATECARD_IDENTITY_PUBKEY_B64") {
        return verifying_key_from_b64(&value);
    }
    Err(ConfigError::MissingVerifyingKey)
}

/// Parse a verifying key from hex
pub fn verifying_key_from_hex(value: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = hex::decode(value.trim())
        .map_err(|err| ConfigError::BadVerifyingKey(format!("not hex: {err}")))?;
    verifying_key_from_bytes(&bytes)
}

/// Parse a verifying key from a base64 blob
pub fn verifying_key_from_b64(value: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = BASE64
        .decode(value.trim())
        .map_err(|err| ConfigError::BadVerifyingKey(format!("not base64: {err}")))?;
    verifying_key_from_bytes(&bytes)
}

fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, ConfigError> {
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| ConfigError::BadVerifyingKey(format!("expected 32 bytes, got {}", bytes.len())))?;
    VerifyingKey::from_bytes(&bytes).map_err(|err| ConfigError::BadVerifyingKey(err.to_string()))
}

/// Parse a signing key seed from hex, for local credential minting
pub fn signing_key_from_hex(value: &str) -> Result<SigningKey, ConfigError> {
    let bytes = hex::decode(value.trim())
        .map_err(|err| ConfigError::BadSigningKey(format!("not hex: {err}")))?;
    let bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::BadSigningKey(format!("expected 32 bytes, got {}", bytes.len())))?;
    Ok(SigningKey::from_bytes(&bytes))
}
