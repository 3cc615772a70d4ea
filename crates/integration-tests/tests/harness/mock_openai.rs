//! Mock `OpenAI` backend for integration tests
//!
//! Implements just enough of the upstream API surface the gateway talks to:
//! chat completions (plain and SSE) and the assistants list, with canned
//! responses and configurable failure modes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

/// How the mock responds to incoming requests
#[derive(Clone)]
pub enum Behavior {
    /// Canned success responses
    Normal,
    /// Fixed status and JSON body for every request
    Fail(u16, serde_json::Value),
    /// Never respond; the connection stays open
    Hang,
    /// Streaming only: send one delta, then abort the connection
    BreakMidStream,
}

pub struct MockOpenAi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    response_content: String,
    request_count: AtomicU32,
    last_model: Mutex<Option<String>>,
}

impl MockOpenAi {
    /// Start a mock answering with default canned content
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Normal, "Hello from mock upstream").await
    }

    /// Start a mock answering with the given completion content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Normal, content).await
    }

    /// Start a mock failing every request with the given status and body
    pub async fn start_failing(status: u16, body: serde_json::Value) -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Fail(status, body), "").await
    }

    /// Start a mock that accepts connections but never responds
    pub async fn start_hanging() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Hang, "").await
    }

    /// Start a mock that breaks the connection mid-stream
    pub async fn start_breaking_stream() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::BreakMidStream, "partial").await
    }

    async fn start_inner(behavior: Behavior, response_content: &str) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            response_content: response_content.to_owned(),
            request_count: AtomicU32::new(0),
            last_model: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/assistants", routing::get(handle_assistants))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for pointing the gateway at this mock
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Model named by the most recent completion request
    pub fn last_model(&self) -> Option<String> {
        self.state.last_model.lock().unwrap().clone()
    }
}

impl Drop for MockOpenAi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    Json(req): Json<serde_json::Value>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    if let Some(model) = req.get("model").and_then(serde_json::Value::as_str) {
        *state.last_model.lock().unwrap() = Some(model.to_owned());
    }

    match &state.behavior {
        Behavior::Fail(status, body) => fail_response(*status, body),
        Behavior::Hang => std::future::pending().await,
        Behavior::BreakMidStream => broken_stream_response(&state.response_content),
        Behavior::Normal => {
            if req.get("stream").and_then(serde_json::Value::as_bool).unwrap_or(false) {
                sse_response(&state.response_content)
            } else {
                completion_response(&state.response_content)
            }
        }
    }
}

async fn handle_assistants(State(state): State<Arc<MockState>>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    match &state.behavior {
        Behavior::Fail(status, body) => fail_response(*status, body),
        Behavior::Hang => std::future::pending().await,
        _ => Json(serde_json::json!({
            "object": "list",
            "data": [
                {
                    "id": "asst_mock_1",
                    "object": "assistant",
                    "created_at": 1_700_000_000,
                    "name": "Mock Assistant",
                    "model": "gpt-5"
                }
            ]
        }))
        .into_response(),
    }
}

fn fail_response(status: u16, body: &serde_json::Value) -> Response {
    let status = StatusCode::from_u16(status).expect("valid status");
    (status, Json(body.clone())).into_response()
}

fn completion_response(content: &str) -> Response {
    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-5",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .into_response()
}

fn sse_chunk(content: Option<&str>, finish_reason: Option<&str>) -> String {
    let chunk = serde_json::json!({
        "id": "chatcmpl-mock-stream",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "gpt-5",
        "choices": [{
            "index": 0,
            "delta": {"content": content},
            "finish_reason": finish_reason
        }]
    });
    format!("data: {chunk}\n\n")
}

/// Build an SSE body streaming `content` word by word
///
/// Includes an empty-content chunk to exercise the gateway's empty-delta
/// filtering. The delivered words concatenate exactly to `content`.
fn sse_response(content: &str) -> Response {
    let mut body = String::new();

    body.push_str(&sse_chunk(Some(""), None));
    for (i, word) in content.split(' ').enumerate() {
        let delta = if i == 0 { word.to_owned() } else { format!(" {word}") };
        body.push_str(&sse_chunk(Some(&delta), None));
    }
    body.push_str(&sse_chunk(None, Some("stop")));
    body.push_str("data: [DONE]\n\n");

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        body,
    )
        .into_response()
}

/// Send one delta, then abort the connection so the client sees a
/// transport error instead of a clean close
fn broken_stream_response(content: &str) -> Response {
    let first = Bytes::from(sse_chunk(Some(content), None));
    // Yield between the chunk and the error so the headers and first delta
    // are flushed before the connection aborts; an immediately-ready error
    // would tear down the connection before anything was written.
    let stream = futures_util::stream::once(async move { Ok(first) }).chain(futures_util::stream::once(async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "mock broke the stream"))
    }));

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(stream),
    )
        .into_response()
}
