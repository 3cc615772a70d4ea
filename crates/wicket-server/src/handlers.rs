//! Route handlers for the two gateway endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use http::{StatusCode, header};

use wicket_config::UpstreamConfig;
use wicket_upstream::protocol::ChatCompletionRequest;
use wicket_upstream::{ChatRequest, DeltaStream, OpenAiClient, UpstreamError, trim_messages};

use crate::relay::relay_deltas;

/// Fixed page size for the assistants list call
const ASSISTANT_PAGE_LIMIT: u32 = 100;

/// Shared state for the gateway handlers
///
/// Read-only after construction; nothing here is mutated across requests.
#[derive(Clone)]
pub struct GatewayState {
    client: Arc<OpenAiClient>,
    default_model: String,
    trim_budget: usize,
}

impl GatewayState {
    /// Build handler state from upstream configuration
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            client: Arc::new(OpenAiClient::new(config)),
            default_model: config.default_model.clone(),
            trim_budget: config.trim_budget,
        }
    }
}

/// Build the gateway router with both endpoints
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .route("/assistants", routing::get(list_assistants))
        .route("/chat", routing::post(chat))
        .with_state(state)
}

/// Handle `GET /assistants`
async fn list_assistants(State(state): State<GatewayState>) -> Response {
    match state.client.list_assistants(ASSISTANT_PAGE_LIMIT).await {
        Ok(assistants) => {
            let body = serde_json::json!({ "assistants": assistants });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Handle `POST /chat`
///
/// The body is taken as a deserialization result so malformed JSON flows
/// through the same error shape as upstream failures instead of axum's
/// default rejection.
async fn chat(State(state): State<GatewayState>, payload: Result<Json<ChatRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return error_response(&UpstreamError::Unexpected(rejection.body_text())),
    };

    let stream = request.stream;
    let wire = ChatCompletionRequest {
        model: request.model.unwrap_or_else(|| state.default_model.clone()),
        messages: trim_messages(request.messages, state.trim_budget),
        temperature: request.temperature,
        stream,
    };

    if stream {
        match state.client.complete_stream(&wire).await {
            Ok(deltas) => stream_response(deltas),
            Err(e) => error_response(&e),
        }
    } else {
        match state.client.complete(&wire).await {
            Ok(text) => {
                let body = serde_json::json!({ "text": text });
                (StatusCode::OK, Json(body)).into_response()
            }
            Err(e) => error_response(&e),
        }
    }
}

/// Build the outgoing byte-stream response for a streamed completion
fn stream_response(deltas: DeltaStream) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from_stream(relay_deltas(deltas)),
    )
        .into_response()
}

/// Map any upstream outcome to the uniform `{"message"}` error shape
///
/// Status and message follow the error's own priority chains; see
/// `UpstreamError::status_code` and `UpstreamError::client_message`.
fn error_response(error: &UpstreamError) -> Response {
    let body = serde_json::json!({ "message": error.client_message() });
    (error.status_code(), Json(body)).into_response()
}
