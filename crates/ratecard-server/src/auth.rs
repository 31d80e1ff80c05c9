//! Bearer credential verification
//!
//! The identity provider signs a claims document with an ed25519 key;
//! the service holds only the verifying key and never issues
//! credentials of its own. On the wire a credential is
//! `base64(claims_json) "." base64(signature)`, and the signature
//! covers the exact claims bytes as transmitted, so claim ordering
//! never matters.
//!
//! Runtime checks, in order: decode, signature, expiry. Policy (who
//! may write rates) is decided by the routes from the verified claims.

use crate::error::AuthError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Role claim that authorizes rates writes
pub const ADMIN_ROLE: &str = "admin";

/// Claims the identity provider embeds in a credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub email: String,
    /// Granted roles
    #[serde(default)]
    pub roles: Vec<String>,
    /// Unix expiry in seconds; `0` means the credential never expires
    #[serde(default)]
    pub expires_at: u64,
}

impl Claims {
    /// Claims for an account with no roles and no expiry
    #[inline]
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            roles: Vec::new(),
            expires_at: 0,
        }
    }

    /// With a role claim added
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// With an expiry at the given unix second
    #[inline]
    #[must_use]
    pub fn with_expiry(mut self, expires_at: u64) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Check for the admin role claim
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ADMIN_ROLE)
    }
}

/// A decoded credential: claims plus the provider signature
#[derive(Debug, Clone)]
pub struct AccessToken {
    claims: Claims,
    message: Vec<u8>,
    signature: Signature,
}

impl AccessToken {
    /// Sign claims with the provider key
    pub fn sign(claims: Claims, signing_key: &SigningKey) -> Result<Self, AuthError> {
        let message = serde_json::to_vec(&claims)?;
        let signature = signing_key.sign(&message);
        Ok(Self {
            claims,
            message,
            signature,
        })
    }

    /// Wire form of the credential
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}.{}",
            BASE64.encode(&self.message),
            BASE64.encode(self.signature.to_bytes())
        )
    }

    /// Parse a wire credential without verifying it
    pub fn decode(raw: &str) -> Result<Self, AuthError> {
        let (claims_part, signature_part) = raw
            .split_once('.')
            .ok_or_else(|| AuthError::Malformed("missing signature separator".into()))?;

        let message = BASE64
            .decode(claims_part)
            .map_err(|err| AuthError::Malformed(format!("claims not base64: {err}")))?;
        let signature_bytes = BASE64
            .decode(signature_part)
            .map_err(|err| AuthError::Malformed(format!("signature not base64: {err}")))?;
        let signature = Signature::from_slice(&signature_bytes)
            .map_err(|err| AuthError::Malformed(format!("signature malformed: {err}")))?;
        let claims: Claims = serde_json::from_slice(&message)
            .map_err(|err| AuthError::Malformed(format!("claims malformed: {err}")))?;

        Ok(Self {
            claims,
            message,
            signature,
        })
    }

    /// Check the signature against the provider key
    #[must_use]
    pub fn verify(&self, verifying_key: &VerifyingKey) -> bool {
        verifying_key.verify(&self.message, &self.signature).is_ok()
    }

    /// Check the expiry claim against a clock reading
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.claims.expires_at != 0 && self.claims.expires_at < now
    }

    /// The embedded claims
    #[inline]
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Take the embedded claims
    #[inline]
    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Sign claims and return the wire credential in one step
pub fn mint(claims: Claims, signing_key: &SigningKey) -> Result<String, AuthError> {
    Ok(AccessToken::sign(claims, signing_key)?.encode())
}

/// Verifies presented credentials against the provider key
#[derive(Debug, Clone, Copy)]
pub struct TokenVerifier {
    key: VerifyingKey,
}

impl TokenVerifier {
    /// Verifier over the provider's verifying key
    #[inline]
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Full credential check: decode, signature, then expiry
    ///
    /// The signature is checked before the expiry claim, so an
    /// attacker never learns expiry state from an unsigned token.
    pub fn check(&self, raw: &str, now: u64) -> Result<Claims, AuthError> {
        let token = AccessToken::decode(raw)?;
        if !token.verify(&self.key) {
            return Err(AuthError::BadSignature);
        }
        if token.is_expired(now) {
            return Err(AuthError::Expired);
        }
        Ok(token.into_claims())
    }
}

/// Pull the bearer token out of an `Authorization` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingCredential)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Malformed("authorization scheme is not bearer".into()))?
        .trim();
    if token.is_empty() {
        return Err(AuthError::Malformed("bearer token empty".into()));
    }
    Ok(token)
}

/// Current unix time in seconds
#[must_use]
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
