//! HTTP surface of the rates service
//!
//! Two endpoints over one document: an open read and a credentialed
//! write. Response bodies follow the `{message, error}` shape the
//! front ends already parse. A malformed write body is folded into the
//! 500 path rather than a 400, matching what callers expect.

use crate::auth::{bearer_token, now_secs, Claims, TokenVerifier};
use crate::store::DocumentStore;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ratecard_core::RateTable;
use serde::Serialize;
use std::sync::Arc;

/// Read endpoint path
pub const RATES_PATH: &str = "/v1/rates";

/// Write endpoint path
pub const UPDATE_PATH: &str = "/v1/rates/update";

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    verifier: TokenVerifier,
}

impl AppState {
    /// State over a document store and the provider verifier
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, verifier: TokenVerifier) -> Self {
        Self { store, verifier }
    }
}

/// Body shape shared by every non-200 response and the write ack
#[derive(Debug, Serialize)]
struct ApiMessage {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiMessage {
    fn plain(message: &str) -> Self {
        Self {
            message: message.to_string(),
            error: None,
        }
    }

    fn with_error(message: &str, error: impl Into<String>) -> Self {
        Self {
            message: message.to_string(),
            error: Some(error.into()),
        }
    }
}

/// The service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(RATES_PATH, get(get_rates).fallback(rates_method_not_allowed))
        .route(
            UPDATE_PATH,
            post(update_rates).fallback(update_method_not_allowed),
        )
        .with_state(state)
}

async fn get_rates(State(state): State<AppState>) -> Response {
    match state.store.get() {
        Ok(Some(rates)) => (StatusCode::OK, Json(rates)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiMessage::with_error(
                "Not Found",
                "The requested rates configuration was not found.",
            )),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "rates read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::with_error("Internal Server Error", err.to_string())),
            )
                .into_response()
        }
    }
}

async fn update_rates(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let claims = match authorize(&state.verifier, header) {
        Ok(claims) => claims,
        Err(denied) => return denied,
    };

    // The original service folds parse failures into its catch-all, so
    // a malformed body answers 500, not 400.
    let rates: RateTable = match serde_json::from_str(&body) {
        Ok(rates) => rates,
        Err(err) => {
            tracing::warn!(email = %claims.email, error = %err, "update body malformed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::with_error("Failed to update rates", err.to_string())),
            )
                .into_response();
        }
    };

    match state.store.put(&rates) {
        Ok(()) => {
            tracing::info!(email = %claims.email, "rates document updated");
            (
                StatusCode::OK,
                Json(ApiMessage::plain("Rates updated successfully!")),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(email = %claims.email, error = %err, "rates write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::with_error("Failed to update rates", err.to_string())),
            )
                .into_response()
        }
    }
}

fn authorize(verifier: &TokenVerifier, header: Option<&str>) -> Result<Claims, Response> {
    let token = match bearer_token(header) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = %err, "update refused: no usable credential");
            return Err(unauthorized());
        }
    };

    let claims = match verifier.check(token, now_secs()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "update refused: credential check failed");
            return Err(unauthorized());
        }
    };

    if !claims.is_admin() {
        tracing::warn!(email = %claims.email, "update refused: admin role missing");
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiMessage::with_error(
                "Forbidden",
                "You do not have permission to update rates. Admin access required.",
            )),
        )
            .into_response());
    }

    Ok(claims)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiMessage::with_error(
            "Unauthorized",
            "You must be logged in to update rates.",
        )),
    )
        .into_response()
}

async fn rates_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Json(ApiMessage::with_error(
            "Method Not Allowed",
            "Only GET requests are supported.",
        )),
    )
        .into_response()
}

async fn update_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(ApiMessage::with_error(
            "Method Not Allowed",
            "Only POST requests are supported for this endpoint.",
        )),
    )
        .into_response()
}
