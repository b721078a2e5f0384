//! HTTP relay in front of the chat and location-lookup backends.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/chat` with `{ "message": .., "conversationHistory": [..] }`
//! - `GET /api/validate-city?city=..&country=..`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::application::{ChatClient, CheckFailure, CheckOutcome, ExistenceChecker};
use crate::domain::{ChatTurn, DomainError};

#[derive(Clone)]
pub struct RelayState {
    chat: Arc<dyn ChatClient>,
    checker: Arc<ExistenceChecker>,
}

impl RelayState {
    pub fn new(chat: Arc<dyn ChatClient>, checker: Arc<ExistenceChecker>) -> Self {
        Self { chat, checker }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCityParams {
    pub city: Option<String>,
    pub country: Option<String>,
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/validate-city", get(validate_city))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, app: Router) -> Result<(), DomainError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Weather relay listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Weather AI Server is running"
    }))
}

async fn chat(State(state): State<RelayState>, Json(request): Json<ChatRequest>) -> Response {
    if request.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message is required", None);
    }

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    let result = state
        .chat
        .send(&request.message, &request.conversation_history)
        .instrument(span)
        .await;

    match result {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            error!("Chat backend {} failed: {}", state.chat.name(), e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate response",
                Some(e.to_string()),
            )
        }
    }
}

async fn validate_city(
    State(state): State<RelayState>,
    Query(params): Query<ValidateCityParams>,
) -> Response {
    let city = params.city.unwrap_or_default();
    let country = params.country.unwrap_or_default();
    if city.trim().is_empty() || country.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "City and country are required",
            None,
        );
    }

    match state.checker.check(&city, &country).await {
        CheckOutcome::Matches(matches) => Json(matches).into_response(),
        CheckOutcome::Failed(CheckFailure::Incomplete) => {
            Json(Vec::<serde_json::Value>::new()).into_response()
        }
        CheckOutcome::Failed(failure) => {
            error!("City validation for {}, {} failed: {:?}", city, country, failure);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to validate city",
                None,
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str, details: Option<String>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": message, "details": details }),
        None => json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}
