//! HTTP surface of the relay: direct form posts, forwarded webhooks and
//! CORS preflight.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::DEFAULT_SITE_ORIGIN;
use crate::relay::{ContactForm, MessageRelay, WebhookPayload};

/// Largest request body either endpoint will read.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared state for relay handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<MessageRelay>,
}

/// Build the relay router.
///
/// The CORS layer answers every `OPTIONS` request itself (site origin only,
/// `POST` only, `Content-Type` allowed), so preflights never reach a handler.
pub fn relay_routes(relay: Arc<MessageRelay>) -> Router {
    let origin = HeaderValue::from_str(&relay.site().origin).unwrap_or_else(|e| {
        warn!(origin = %relay.site().origin, error = %e, "Invalid site origin, using default");
        HeaderValue::from_static(DEFAULT_SITE_ORIGIN)
    });

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let state = AppState { relay };

    Router::new()
        .route("/submit", post(submit).fallback(not_found))
        .route("/webhook", post(webhook).fallback(not_found))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

// ── Responses ───────────────────────────────────────────────────────────

fn thanks(state: &AppState) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.relay.site().thanks_url.clone())],
    )
        .into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "contact-relay"
    }))
}

// ── Direct submission ───────────────────────────────────────────────────

/// POST /submit
///
/// Always redirects to the thank-you page, including on internal failure
/// and oversized bodies. The only visible error is a 400 for missing fields.
async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            error!(status = %e.status(), error = %e, "Direct submission body unreadable");
            return thanks(&state);
        }
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let form = match ContactForm::from_body(content_type, &body) {
        Ok(form) => form,
        Err(e) => {
            error!(error = %e, "Direct submission error");
            return thanks(&state);
        }
    };

    if form.is_spam() {
        info!("Honeypot filled, dropping direct submission");
        return thanks(&state);
    }

    let submission = match form.into_submission() {
        Ok(submission) => submission,
        Err(e) => {
            debug!(error = %e, "Rejecting direct submission");
            return (StatusCode::BAD_REQUEST, "All fields are required.").into_response();
        }
    };

    let span = info_span!("relay", submission_id = %submission.id, path = "submit");
    if state.relay.process(&submission).instrument(span).await.is_err() {
        warn!(submission_id = %submission.id, "Direct submission failed, redirecting anyway");
    }
    thanks(&state)
}

// ── Forwarded webhook ───────────────────────────────────────────────────

/// POST /webhook
async fn webhook(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            error!(status = %e.status(), error = %e, "Webhook body unreadable");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response();
        }
    };

    let payload = match WebhookPayload::from_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Webhook error");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response();
        }
    };

    if payload.is_spam() {
        info!("Honeypot filled, dropping webhook submission");
        return (StatusCode::OK, "OK").into_response();
    }

    let submission = payload.into_submission();
    let span = info_span!("relay", submission_id = %submission.id, path = "webhook");
    match state.relay.process(&submission).instrument(span).await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response(),
    }
}
