//! Stream consumption: chunk stream in, explicit `Result` out.
//!
//! The turn controller branches on the returned `Result` rather than
//! catching anything; a failure mid-stream discards the partial aggregate.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::client::ChunkStream;
use crate::error::ClientError;

/// Receiver for response fragments as they arrive.
///
/// Implemented by presentation surfaces that render incrementally, and by
/// [`CollectSink`] in tests.
#[async_trait]
pub trait ChunkSink: Send {
    /// Accept one freshly arrived text fragment.
    async fn accept(&mut self, chunk: &str);
}

/// Sink that records every fragment, for tests.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub chunks: Vec<String>,
}

#[async_trait]
impl ChunkSink for CollectSink {
    async fn accept(&mut self, chunk: &str) {
        self.chunks.push(chunk.to_string());
    }
}

/// Drive a chunk stream to completion.
///
/// Each fragment is forwarded to `sink` as it arrives and appended to the
/// aggregate. Returns `Ok(aggregate)` when the stream ends normally, or the
/// first error — in which case fragments already forwarded to the sink were
/// rendered but the aggregate is discarded by the caller.
pub async fn consume_stream(
    mut stream: ChunkStream,
    sink: &mut dyn ChunkSink,
) -> Result<String, ClientError> {
    let mut aggregate = String::new();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        sink.accept(&chunk).await;
        aggregate.push_str(&chunk);
    }
    Ok(aggregate)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ChatStreamRequest, MockChatClient, StreamingChatClient};
    use uuid::Uuid;

    fn request() -> ChatStreamRequest {
        ChatStreamRequest {
            input: "q".to_string(),
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_consume_aggregates_in_order() {
        let client = MockChatClient::with_chunks(vec!["Hello", " world"]);
        let stream = client.stream_reply(request()).await.unwrap();

        let mut sink = CollectSink::default();
        let aggregate = consume_stream(stream, &mut sink).await.unwrap();

        assert_eq!(aggregate, "Hello world");
        assert_eq!(sink.chunks, vec!["Hello", " world"]);
    }

    #[tokio::test]
    async fn test_consume_empty_stream() {
        let client = MockChatClient::with_chunks(vec![]);
        let stream = client.stream_reply(request()).await.unwrap();

        let mut sink = CollectSink::default();
        let aggregate = consume_stream(stream, &mut sink).await.unwrap();

        assert_eq!(aggregate, "");
        assert!(sink.chunks.is_empty());
    }

    #[tokio::test]
    async fn test_consume_returns_first_error() {
        let client = MockChatClient::failing_after(vec!["partial", " text"], 1);
        let stream = client.stream_reply(request()).await.unwrap();

        let mut sink = CollectSink::default();
        let result = consume_stream(stream, &mut sink).await;

        assert!(result.is_err());
        // The fragment that arrived before the failure was rendered.
        assert_eq!(sink.chunks, vec!["partial"]);
    }
}
