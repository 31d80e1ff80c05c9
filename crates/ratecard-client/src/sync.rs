//! Remote sync client
//!
//! Blocking HTTP against the rates service. Every call is one request
//! with connect/read timeouts on the agent; there are no retries and no
//! cancellation, and callers issue at most one request per user action.

use crate::error::{FetchError, SubmitError};
use ratecard_core::{validate_for_submission, RateTable};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Service base URL when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";

/// Path of the read endpoint
pub const RATES_PATH: &str = "/v1/rates";

/// Path of the write endpoint
pub const UPDATE_PATH: &str = "/v1/rates/update";

const CONNECT_TIMEOUT_MS_DEFAULT: u64 = 3_000;
const REQUEST_TIMEOUT_MS_DEFAULT: u64 = 10_000;

/// Transport configuration for the sync client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Service base URL, no trailing slash
    pub endpoint: String,
    /// Connection establishment timeout
    pub connect_timeout_ms: u64,
    /// Read/write timeout per request
    pub request_timeout_ms: u64,
}

impl SyncConfig {
    /// Config for an endpoint with default timeouts
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        Self {
            endpoint,
            connect_timeout_ms: CONNECT_TIMEOUT_MS_DEFAULT,
            request_timeout_ms: REQUEST_TIMEOUT_MS_DEFAULT,
        }
    }

    /// Config from `RATECARD_ENDPOINT` and the timeout overrides
    ///
    /// Returns `None` when no endpoint is configured. Timeouts outside
    /// their accepted ranges fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("RATECARD_ENDPOINT").ok()?;
        let endpoint = endpoint.trim().to_string();
        if endpoint.is_empty() {
            return None;
        }
        let mut config = Self::new(endpoint);
        config.connect_timeout_ms = env::var("RATECARD_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=60_000).contains(v))
            .unwrap_or(CONNECT_TIMEOUT_MS_DEFAULT);
        config.request_timeout_ms = env::var("RATECARD_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| (100..=120_000).contains(v))
            .unwrap_or(REQUEST_TIMEOUT_MS_DEFAULT);
        Some(config)
    }

    /// Environment config when set, defaults otherwise
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|| Self::new(DEFAULT_ENDPOINT))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Error body the service attaches to rejections
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the two rates endpoints
#[derive(Clone)]
pub struct SyncClient {
    config: SyncConfig,
    agent: ureq::Agent,
}

impl SyncClient {
    /// Build a client with its own configured agent
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(config.connect_timeout_ms))
            .timeout_read(Duration::from_millis(config.request_timeout_ms))
            .timeout_write(Duration::from_millis(config.request_timeout_ms))
            .build();
        Self { config, agent }
    }

    /// Client against the environment-configured service
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::new(SyncConfig::from_env_or_default())
    }

    /// Base URL this client talks to
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Fetch the current rate table
    pub fn fetch_rates(&self) -> Result<RateTable, FetchError> {
        let url = format!("{}{}", self.config.endpoint, RATES_PATH);
        match self.agent.get(&url).call() {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|err| FetchError::Transport(err.to_string()))?;
                let rates = serde_json::from_str(&body)?;
                tracing::debug!(endpoint = %self.config.endpoint, "rates fetched");
                Ok(rates)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let reason = rejection_reason(resp);
                tracing::warn!(status, reason = %reason, "rates fetch rejected");
                Err(FetchError::Status { status, reason })
            }
            Err(ureq::Error::Transport(err)) => {
                tracing::warn!(error = %err, "rates fetch transport failure");
                Err(FetchError::Transport(err.to_string()))
            }
        }
    }

    /// Validate and push an edited rate table
    ///
    /// The table is validated before anything is sent; the first
    /// offending leaf aborts the submission. `token` goes out as a
    /// bearer credential.
    pub fn submit_rates(&self, rates: &RateTable, token: &str) -> Result<(), SubmitError> {
        validate_for_submission(rates)?;
        let payload = serde_json::to_string(rates)
            .map_err(|err| SubmitError::Transport(format!("payload encode failed: {err}")))?;

        let url = format!("{}{}", self.config.endpoint, UPDATE_PATH);
        let request = self
            .agent
            .post(&url)
            .set("content-type", "application/json")
            .set("authorization", &format!("Bearer {token}"));

        match request.send_string(&payload) {
            Ok(_resp) => {
                tracing::info!(endpoint = %self.config.endpoint, "rates update accepted");
                Ok(())
            }
            Err(ureq::Error::Status(status, resp)) => {
                let reason = rejection_reason(resp);
                tracing::warn!(status, reason = %reason, "rates update rejected");
                Err(SubmitError::Rejected { status, reason })
            }
            Err(ureq::Error::Transport(err)) => {
                tracing::warn!(error = %err, "rates update transport failure");
                Err(SubmitError::Transport(err.to_string()))
            }
        }
    }
}

/// Best reason available for a rejection response
///
/// Prefers the body's `error` member, then its `message`, then the
/// status text.
fn rejection_reason(resp: ureq::Response) -> String {
    let status_text = resp.status_text().to_string();
    match resp.into_string() {
        Ok(body) => reason_from_body(&status_text, &body),
        Err(_) => status_text,
    }
}

fn reason_from_body(status_text: &str, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.message)
            .unwrap_or_else(|| status_text.to_string()),
        Err(_) => status_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_trims_trailing_slash() {
        let config = SyncConfig::new("http://rates.internal:9000/ ");
        assert_eq!(config.endpoint, "http://rates.internal:9000");
    }

    #[test]
    fn config_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.connect_timeout_ms, 3_000);
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn reason_prefers_error_then_message() {
        assert_eq!(
            reason_from_body(
                "Unauthorized",
                r#"{"message":"Unauthorized","error":"You must be logged in to update rates."}"#
            ),
            "You must be logged in to update rates."
        );
        assert_eq!(
            reason_from_body("OK", r#"{"message":"Rates updated successfully!"}"#),
            "Rates updated successfully!"
        );
        assert_eq!(reason_from_body("Not Found", "<html>nope</html>"), "Not Found");
        assert_eq!(reason_from_body("Bad Gateway", "{}"), "Bad Gateway");
    }

    #[test]
    fn invalid_table_is_refused_before_send() {
        // Endpoint is unroutable; a send attempt would fail as transport,
        // so an Invalid result proves nothing left the client.
        let client = SyncClient::new(SyncConfig::new("http://127.0.0.1:1"));
        let rates = RateTable::new().with_hourly_rate(-5.0);

        let err = client.submit_rates(&rates, "token").unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(err.is_local());
    }
}
