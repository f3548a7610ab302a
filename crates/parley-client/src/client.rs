//! Streaming chat client trait and implementations.
//!
//! `HttpChatClient` posts the user query to the remote stream endpoint and
//! yields SSE text fragments as they arrive. `MockChatClient` replays a
//! scripted stream for tests and offline runs.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ClientError;
use crate::sse::SseParser;

/// One request to the stream endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatStreamRequest {
    /// The user's query text (the last unanswered Human message).
    pub input: String,
    /// Session identifier, stable for one process run.
    pub session_id: Uuid,
    /// User identifier.
    pub user_id: Uuid,
}

/// A lazy sequence of response text fragments.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// Client for the remote streaming chat API.
///
/// One call per user turn: the request carries the query and session
/// identity, the response is a stream of text fragments terminated normally
/// or by a connection error.
#[async_trait]
pub trait StreamingChatClient: Send + Sync {
    /// Open a response stream for the given request.
    ///
    /// Fails fast on connection or HTTP-status errors; errors that occur
    /// mid-stream surface as `Err` items within the returned stream.
    async fn stream_reply(&self, request: ChatStreamRequest) -> Result<ChunkStream, ClientError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// reqwest-backed SSE client for the remote chat backend.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    /// Create a client for the given stream endpoint.
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The configured stream endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StreamingChatClient for HttpChatClient {
    async fn stream_reply(&self, request: ChatStreamRequest) -> Result<ChunkStream, ClientError> {
        tracing::info!(
            endpoint = %self.endpoint,
            session_id = %request.session_id,
            query_len = request.input.len(),
            "Opening SSE stream"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut bytes = response.bytes_stream();
        let stream = async_stream::stream! {
            let mut parser = SseParser::new();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => match parser.push_bytes(&chunk) {
                        Ok(events) => {
                            for event in events {
                                yield Ok(event);
                            }
                            if parser.is_done() {
                                return;
                            }
                        }
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    },
                    Err(e) => {
                        yield Err(ClientError::Http(e));
                        return;
                    }
                }
            }
            match parser.finish() {
                Ok(Some(event)) => yield Ok(event),
                Ok(None) => {}
                Err(e) => yield Err(e),
            }
        };

        Ok(Box::pin(stream))
    }
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Scripted chat client for tests.
///
/// Replays the configured chunks; optionally fails when opening the stream
/// or after a given number of chunks have been yielded.
#[derive(Debug, Clone, Default)]
pub struct MockChatClient {
    chunks: Vec<String>,
    fail_on_connect: bool,
    fail_after: Option<usize>,
}

impl MockChatClient {
    /// A client that streams the given chunks and completes normally.
    pub fn with_chunks(chunks: Vec<&str>) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::from).collect(),
            ..Self::default()
        }
    }

    /// A client whose `stream_reply` call itself fails.
    pub fn failing_on_connect() -> Self {
        Self {
            fail_on_connect: true,
            ..Self::default()
        }
    }

    /// A client that yields `n` of its chunks and then an error item.
    pub fn failing_after(chunks: Vec<&str>, n: usize) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::from).collect(),
            fail_after: Some(n),
            ..Self::default()
        }
    }
}

#[async_trait]
impl StreamingChatClient for MockChatClient {
    async fn stream_reply(&self, _request: ChatStreamRequest) -> Result<ChunkStream, ClientError> {
        if self.fail_on_connect {
            return Err(ClientError::Backend("mock connection failure".to_string()));
        }

        let chunks = self.chunks.clone();
        let fail_after = self.fail_after;
        let stream = async_stream::stream! {
            for (i, chunk) in chunks.into_iter().enumerate() {
                if let Some(n) = fail_after {
                    if i >= n {
                        yield Err(ClientError::Backend("mock stream failure".to_string()));
                        return;
                    }
                }
                yield Ok(chunk);
            }
        };
        Ok(Box::pin(stream))
    }
}

// =============================================================================
// Tests
// =============================================================================
