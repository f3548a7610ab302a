//! Streaming chat client for the remote Parley backend.
//!
//! Provides a trait-based abstraction over the SSE stream endpoint, a
//! reqwest-backed implementation, an incremental server-sent-events parser,
//! and a consumption helper that turns a chunk stream into an explicit
//! `Result` with the aggregated reply.

pub mod client;
pub mod consume;
pub mod error;
pub mod sse;

pub use client::{ChatStreamRequest, ChunkStream, HttpChatClient, MockChatClient, StreamingChatClient};
pub use consume::{consume_stream, ChunkSink, CollectSink};
pub use error::ClientError;
pub use sse::SseParser;
