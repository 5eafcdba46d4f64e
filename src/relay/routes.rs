//! REST endpoints for lead submission and service status.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::webhook::WebhookForwarder;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::lead::LeadReceipt;
use crate::submit::SUBMIT_PATH;

const ACCEPTED_MESSAGE: &str = "Dados recebidos com sucesso!";
const INTERNAL_ERROR: &str = "Erro interno do servidor";
const RETRY_LATER: &str = "Tente novamente em alguns instantes";

/// Shared state for relay routes. Read-only after startup.
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<RelayConfig>,
    pub webhook: Option<Arc<WebhookForwarder>>,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        let webhook = config
            .webhook_url
            .as_ref()
            .map(|url| Arc::new(WebhookForwarder::new(url.clone())));
        Self {
            config: Arc::new(config),
            webhook,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitAccepted {
    success: bool,
    message: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ServiceStatus {
    status: &'static str,
    service: String,
    version: String,
    timestamp: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            Self::UpstreamDelivery(_) | Self::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": INTERNAL_ERROR,
                    "message": RETRY_LATER,
                })),
            )
                .into_response(),
        }
    }
}

/// POST /api/submit-form
///
/// Validates that `email` and `userType` are present, logs the receipt, and
/// forwards the received JSON untouched to the webhook if one is configured.
/// Other fields are never type-checked. A webhook failure is logged and never
/// changes the response.
async fn submit_form(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Json<SubmitAccepted>, RelayError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Malformed submission body");
        RelayError::Unexpected(e.to_string())
    })?;
    let receipt = LeadReceipt::from_payload(&payload).inspect_err(|e| {
        warn!(error = %e, "Submission rejected");
    })?;

    info!(
        user_type = %receipt.user_type,
        email = %receipt.email,
        timestamp = receipt.timestamp.as_deref(),
        has_simulation = receipt.has_simulation,
        "New lead received"
    );

    if let Some(ref webhook) = state.webhook {
        match webhook.forward(&payload).await {
            Ok(()) => info!(url = webhook.url(), "Lead forwarded to webhook"),
            Err(e) => error!(error = %e, url = webhook.url(), "Webhook delivery failed"),
        }
    }

    Ok(Json(SubmitAccepted {
        success: true,
        message: ACCEPTED_MESSAGE,
        timestamp: now_rfc3339(),
    }))
}

/// GET /api/submit-form
///
/// Fixed service identity. No inputs, no side effects.
async fn status(State(state): State<RelayState>) -> impl IntoResponse {
    Json(ServiceStatus {
        status: "OK",
        service: state.config.service_name.clone(),
        version: state.config.version.clone(),
        timestamp: now_rfc3339(),
    })
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Build the relay router with CORS, tracing, and security headers.
pub fn relay_routes(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(SUBMIT_PATH, get(status).post(submit_form))
        .route(&format!("{SUBMIT_PATH}/"), get(status).post(submit_form))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}
