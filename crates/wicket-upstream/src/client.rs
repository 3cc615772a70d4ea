//! `OpenAI` upstream client adapter

use std::pin::Pin;
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use wicket_config::UpstreamConfig;

use crate::deadline::with_deadline;
use crate::error::{UpstreamError, parse_error_message};
use crate::protocol::{Assistant, AssistantList, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Stream of text deltas parsed from an initiated streaming completion
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, UpstreamError>> + Send>>;

/// Outcome of decoding one SSE event
enum SseItem {
    Delta(String),
    Fail(UpstreamError),
    Skip,
    Done,
}

/// Client for the upstream completion API
///
/// Holds the credential and the per-operation deadlines. The credential is
/// attached as a bearer token and never logged; an absent credential is not
/// validated here and fails upstream as an authentication error.
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    list_timeout: Duration,
    completion_timeout: Duration,
}

impl OpenAiClient {
    /// Build a client from upstream configuration
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(config: &UpstreamConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Self {
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            list_timeout: config.list_timeout,
            completion_timeout: config.completion_timeout,
        }
    }

    /// List available assistants
    ///
    /// The whole call races the list deadline; on expiry the in-flight
    /// request is dropped and `UpstreamError::Timeout` is returned.
    pub async fn list_assistants(&self, limit: u32) -> Result<Vec<Assistant>, UpstreamError> {
        with_deadline(self.list_timeout, self.fetch_assistants(limit)).await
    }

    /// Run a non-streaming chat completion, returning the first choice's text
    ///
    /// Races the completion deadline end to end. Returns an empty string
    /// when upstream produced no content.
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, UpstreamError> {
        let mut wire = request.clone();
        wire.stream = false;
        with_deadline(self.completion_timeout, self.fetch_completion(wire)).await
    }

    /// Initiate a streaming chat completion
    ///
    /// Only initiation (up to obtaining the event stream) is bounded by the
    /// completion deadline; once the stream is handed out its duration is
    /// governed solely by the consumer's cancellation.
    pub async fn complete_stream(&self, request: &ChatCompletionRequest) -> Result<DeltaStream, UpstreamError> {
        let mut wire = request.clone();
        wire.stream = true;
        with_deadline(self.completion_timeout, self.open_stream(wire)).await
    }

    async fn fetch_assistants(&self, limit: u32) -> Result<Vec<Assistant>, UpstreamError> {
        let response = self
            .authorize(self.client.get(self.endpoint("assistants")))
            .query(&[("limit", limit)])
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "assistants request failed");
                UpstreamError::from(e)
            })?;

        let response = Self::check_status(response).await?;
        let list: AssistantList = response.json().await?;
        Ok(list.data)
    }

    async fn fetch_completion(&self, wire: ChatCompletionRequest) -> Result<String, UpstreamError> {
        let response = self
            .authorize(self.client.post(self.endpoint("chat/completions")))
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "completion request failed");
                UpstreamError::from(e)
            })?;

        let response = Self::check_status(response).await?;
        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion.first_text())
    }

    async fn open_stream(&self, wire: ChatCompletionRequest) -> Result<DeltaStream, UpstreamError> {
        let response = self
            .authorize(self.client.post(self.endpoint("chat/completions")))
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "stream initiation failed");
                UpstreamError::from(e)
            })?;

        let response = Self::check_status(response).await?;

        let deltas = response
            .bytes_stream()
            .eventsource()
            .map(|result| match result {
                Ok(event) => {
                    let data = event.data.trim().to_owned();
                    if data == "[DONE]" {
                        return SseItem::Done;
                    }
                    match serde_json::from_str::<ChatCompletionChunk>(&data) {
                        Ok(chunk) => SseItem::Delta(chunk.first_delta()),
                        Err(e) => {
                            tracing::debug!(error = %e, data = %data, "skipping unparseable stream chunk");
                            SseItem::Skip
                        }
                    }
                }
                Err(e) => SseItem::Fail(UpstreamError::Streaming(e.to_string())),
            })
            .take_while(|item| futures_util::future::ready(!matches!(item, SseItem::Done)))
            .filter_map(|item| {
                futures_util::future::ready(match item {
                    SseItem::Delta(delta) => Some(Ok(delta)),
                    SseItem::Fail(error) => Some(Err(error)),
                    SseItem::Skip | SseItem::Done => None,
                })
            });

        Ok(Box::pin(deltas))
    }

    /// Map a non-2xx response to `UpstreamError::Api`
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "upstream returned error");
        Err(UpstreamError::Api {
            status,
            message: parse_error_message(&body),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }
}
