//! Presentation boundary: where messages, chunks, errors, and audio land.
//!
//! The controller never talks to a terminal or widget toolkit directly; it
//! renders through this trait. `RecordingSurface` captures every call for
//! assertions in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use parley_core::error::ParleyError;
use parley_core::types::Role;

/// Rendering surface for one chat session.
///
/// A reply is rendered as `begin_reply`, zero or more `render_chunk` calls
/// as fragments arrive, then `end_reply` — whether the stream completed or
/// failed partway.
#[async_trait]
pub trait PresentationSurface: Send + Sync {
    /// Render a complete message (a Human input or an earlier AI reply).
    async fn render_message(&mut self, role: Role, content: &str);

    /// An AI reply is about to stream in.
    async fn begin_reply(&mut self);

    /// Render one freshly arrived response fragment.
    async fn render_chunk(&mut self, chunk: &str);

    /// The current reply stream ended (normally or with an error).
    async fn end_reply(&mut self);

    /// Show a user-visible error message.
    async fn report_error(&mut self, message: &str);

    /// Play a synthesized audio asset.
    async fn play_audio(&mut self, path: &Path) -> Result<(), ParleyError>;
}

// =============================================================================
// Recording surface (test double)
// =============================================================================

/// One recorded surface interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Message(Role, String),
    BeginReply,
    Chunk(String),
    EndReply,
    Error(String),
    Played(PathBuf),
}

/// Surface that records every interaction, for tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    /// When set, `play_audio` fails instead of recording a playback.
    pub fail_playback: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rendered chunks, in order.
    pub fn chunks(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Chunk(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All reported error messages, in order.
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Paths of audio assets that were played.
    pub fn played(&self) -> Vec<&Path> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Played(p) => Some(p.as_path()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl PresentationSurface for RecordingSurface {
    async fn render_message(&mut self, role: Role, content: &str) {
        self.events
            .push(SurfaceEvent::Message(role, content.to_string()));
    }

    async fn begin_reply(&mut self) {
        self.events.push(SurfaceEvent::BeginReply);
    }

    async fn render_chunk(&mut self, chunk: &str) {
        self.events.push(SurfaceEvent::Chunk(chunk.to_string()));
    }

    async fn end_reply(&mut self) {
        self.events.push(SurfaceEvent::EndReply);
    }

    async fn report_error(&mut self, message: &str) {
        self.events.push(SurfaceEvent::Error(message.to_string()));
    }

    async fn play_audio(&mut self, path: &Path) -> Result<(), ParleyError> {
        if self.fail_playback {
            return Err(ParleyError::Surface(
                "playback device unavailable".to_string(),
            ));
        }
        self.events.push(SurfaceEvent::Played(path.to_path_buf()));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.render_message(Role::Human, "hi").await;
        surface.begin_reply().await;
        surface.render_chunk("Hel").await;
        surface.render_chunk("lo").await;
        surface.end_reply().await;

        assert_eq!(surface.events.len(), 5);
        assert_eq!(surface.chunks(), vec!["Hel", "lo"]);
        assert!(surface.errors().is_empty());
    }

    #[tokio::test]
    async fn test_recording_surface_playback_failure() {
        let mut surface = RecordingSurface {
            fail_playback: true,
            ..RecordingSurface::new()
        };
        let result = surface.play_audio(Path::new("/tmp/clip.wav")).await;
        assert!(result.is_err());
        assert!(surface.played().is_empty());
    }

    #[tokio::test]
    async fn test_recording_surface_playback_success() {
        let mut surface = RecordingSurface::new();
        surface.play_audio(Path::new("/tmp/clip.wav")).await.unwrap();
        assert_eq!(surface.played(), vec![Path::new("/tmp/clip.wav")]);
    }
}
