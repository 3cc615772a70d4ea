//! Streaming relay: republish upstream deltas as an outgoing byte stream
//!
//! A producer task pulls the upstream delta sequence and writes into a
//! bounded channel; the outgoing response body consumes the channel. The
//! bounded capacity carries backpressure, and a downstream disconnect shows
//! up as a failed send, at which point the producer stops pulling and drops
//! the upstream stream, aborting the in-flight transfer.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use wicket_upstream::UpstreamError;

/// Chunks buffered between the upstream puller and the outgoing body
const RELAY_BUFFER: usize = 16;

/// Bridge a delta stream into a byte stream for the response body
///
/// Empty deltas are dropped; non-empty deltas are forwarded as raw UTF-8
/// bytes in exact upstream order. An upstream error is republished as the
/// stream's final item so the consumer observes a failure rather than a
/// silent close.
pub fn relay_deltas<S>(upstream: S) -> ReceiverStream<Result<Bytes, UpstreamError>>
where
    S: Stream<Item = Result<String, UpstreamError>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(RELAY_BUFFER);

    tokio::spawn(async move {
        let mut upstream = std::pin::pin!(upstream);

        while let Some(item) = upstream.next().await {
            match item {
                Ok(delta) => {
                    if delta.is_empty() {
                        continue;
                    }
                    if tx.send(Ok(Bytes::from(delta))).await.is_err() {
                        // Downstream hung up; stop pulling upstream chunks.
                        tracing::debug!("client disconnected, cancelling relay");
                        return;
                    }
                }
                Err(error) => {
                    tracing::warn!(error = %error, "upstream stream failed mid-relay");
                    let _ = tx.send(Err(error)).await;
                    return;
                }
            }
        }
    });

    ReceiverStream::new(rx)
}
