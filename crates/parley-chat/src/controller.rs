//! The chat turn controller.
//!
//! One `run_cycle` call per user interaction. The cycle appends any newly
//! acquired Human input to the transcript, and if the transcript then ends
//! on an unanswered Human message, streams the AI reply. Failures inside the
//! cycle degrade: STT and TTS problems are logged and skipped, a streaming
//! failure is reported to the user and leaves the transcript unchanged so
//! the next interaction retries the same turn.

use parley_client::{consume_stream, ChatStreamRequest, ChunkSink, StreamingChatClient};
use parley_core::types::{ChatSession, CycleOutcome, Message, Role};
use parley_voice::{remove_audio_asset, SpeechSynthesizer, SpeechTranscriber};

use async_trait::async_trait;

use crate::surface::PresentationSurface;

/// User-visible message for any streaming failure. Diagnostic detail goes to
/// the log, not the user.
const STREAM_ERROR_MESSAGE: &str = "Failed to get a response from the AI.";

/// Input acquired for one cycle: at most one captured audio clip and one
/// typed query.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Raw captured audio bytes, if the user spoke.
    pub audio: Option<Vec<u8>>,
    /// Typed query text, if the user typed.
    pub typed: Option<String>,
}

impl TurnInput {
    /// No new input this cycle.
    pub fn none() -> Self {
        Self::default()
    }

    /// A typed query.
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            typed: Some(text.into()),
            ..Self::default()
        }
    }

    /// A captured audio clip.
    pub fn spoken(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            ..Self::default()
        }
    }
}

/// Drives one request/response cycle per user turn.
///
/// Owns the boundary services; the session is passed in explicitly per
/// cycle and is the only thing mutated.
pub struct ChatTurnController<T, S, C>
where
    T: SpeechTranscriber,
    S: SpeechSynthesizer,
    C: StreamingChatClient,
{
    transcriber: T,
    synthesizer: S,
    client: C,
    voice_output: bool,
    sample_rate: u32,
}

impl<T, S, C> ChatTurnController<T, S, C>
where
    T: SpeechTranscriber,
    S: SpeechSynthesizer,
    C: StreamingChatClient,
{
    /// Create a controller with voice output disabled and a 16 kHz input
    /// sample rate.
    pub fn new(client: C, transcriber: T, synthesizer: S) -> Self {
        Self {
            transcriber,
            synthesizer,
            client,
            voice_output: false,
            sample_rate: 16_000,
        }
    }

    /// Enable or disable spoken replies.
    pub fn with_voice_output(mut self, enabled: bool) -> Self {
        self.voice_output = enabled;
        self
    }

    /// Set the sample rate of captured audio input.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Run one turn cycle.
    ///
    /// 1. Transcribe captured audio, if any; non-empty text becomes a Human
    ///    message. Empty transcriptions and STT errors append nothing.
    /// 2. Append the typed query, if non-empty after trimming.
    /// 3. If the transcript now ends on a Human message, stream the reply:
    ///    render each chunk, append the aggregate as an AI message, and, with
    ///    voice output enabled, speak it. A stream failure reports a generic
    ///    error and appends nothing — the unanswered Human message stays at
    ///    the tail, so the next cycle retries.
    pub async fn run_cycle(
        &self,
        session: &mut ChatSession,
        input: TurnInput,
        surface: &mut dyn PresentationSurface,
    ) -> CycleOutcome {
        if let Some(audio) = input.audio {
            self.accept_voice_input(session, &audio, surface).await;
        }

        if let Some(text) = input.typed {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                tracing::debug!("Ignoring whitespace-only typed query");
            } else {
                surface.render_message(Role::Human, trimmed).await;
                session.transcript.push(Message::human(trimmed));
                tracing::info!(query_len = trimmed.len(), "User query added to transcript");
            }
        }

        let reply = if session.transcript.awaiting_reply() {
            // The tail is the unanswered Human message; its content is the query.
            let query = session
                .transcript
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.answer_turn(session, query, surface).await
        } else {
            None
        };

        CycleOutcome {
            state: session.transcript.turn_state(),
            reply,
        }
    }

    /// Transcribe one captured audio clip and append the result, if any.
    async fn accept_voice_input(
        &self,
        session: &mut ChatSession,
        audio: &[u8],
        surface: &mut dyn PresentationSurface,
    ) {
        match self.transcriber.transcribe(audio, self.sample_rate).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                surface.render_message(Role::Human, &text).await;
                tracing::info!(transcript_len = text.len(), "Voice transcript added to transcript");
                session.transcript.push(Message::human(text));
            }
            Ok(_) => {
                tracing::debug!("Empty transcription result — nothing appended");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech-to-text failed — voice input dropped");
            }
        }
    }

    /// Stream the reply for `query`, append it on success, and optionally
    /// speak it. Returns the aggregated reply if one was appended.
    async fn answer_turn(
        &self,
        session: &mut ChatSession,
        query: String,
        surface: &mut dyn PresentationSurface,
    ) -> Option<String> {
        let request = ChatStreamRequest {
            input: query,
            session_id: session.session_id,
            user_id: session.user_id,
        };

        tracing::info!(session_id = %request.session_id, "Requesting streamed AI response");
        surface.begin_reply().await;

        let outcome = match self.client.stream_reply(request).await {
            Ok(stream) => {
                let mut sink = SurfaceSink {
                    surface: &mut *surface,
                };
                consume_stream(stream, &mut sink).await
            }
            Err(e) => Err(e),
        };

        surface.end_reply().await;

        match outcome {
            Ok(text) if !text.is_empty() => {
                tracing::info!(reply_len = text.len(), "AI streaming complete");
                session.transcript.push(Message::ai(text.clone()));
                if self.voice_output {
                    self.speak(&text, surface).await;
                }
                Some(text)
            }
            Ok(_) => {
                tracing::debug!("Backend returned an empty response — nothing appended");
                None
            }
            Err(e) => {
                // A partially streamed response is discarded, not appended.
                tracing::error!(error = %e, "SSE consumption failed");
                surface.report_error(STREAM_ERROR_MESSAGE).await;
                None
            }
        }
    }

    /// Synthesize and play a reply. Never fails the turn: synthesis and
    /// playback problems are logged and the audio asset is always removed
    /// after the attempt.
    async fn speak(&self, text: &str, surface: &mut dyn PresentationSurface) {
        match self.synthesizer.synthesize(text).await {
            Ok(path) => {
                match surface.play_audio(&path).await {
                    Ok(()) => tracing::info!("Audio response generated and played"),
                    Err(e) => tracing::error!(error = %e, "Audio playback failed"),
                }
                remove_audio_asset(&path);
            }
            Err(e) => {
                tracing::error!(error = %e, "Text-to-speech synthesis failed");
            }
        }
    }
}

/// Adapter forwarding stream fragments to the presentation surface.
struct SurfaceSink<'a> {
    surface: &'a mut dyn PresentationSurface,
}

#[async_trait]
impl ChunkSink for SurfaceSink<'_> {
    async fn accept(&mut self, chunk: &str) {
        self.surface.render_chunk(chunk).await;
    }
}

// =============================================================================
// Tests
// =============================================================================
