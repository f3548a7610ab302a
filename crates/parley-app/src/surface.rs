//! Terminal presentation surface.
//!
//! Renders the transcript to stdout, errors to stderr, and "plays" audio by
//! announcing the asset path — no audio device dependency, the asset is a
//! real file a player could consume.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;

use parley_chat::PresentationSurface;
use parley_core::error::ParleyError;
use parley_core::types::Role;

/// Chat surface over stdout/stderr.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn new() -> Self {
        Self
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Human => "You",
        Role::Ai => "AI",
    }
}

#[async_trait]
impl PresentationSurface for TerminalSurface {
    async fn render_message(&mut self, role: Role, content: &str) {
        println!("{}: {}", role_label(role), content);
    }

    async fn begin_reply(&mut self) {
        print!("AI: ");
        let _ = std::io::stdout().flush();
    }

    async fn render_chunk(&mut self, chunk: &str) {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }

    async fn end_reply(&mut self) {
        println!();
    }

    async fn report_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }

    async fn play_audio(&mut self, path: &Path) -> Result<(), ParleyError> {
        if !path.exists() {
            return Err(ParleyError::Surface(format!(
                "audio asset not found: {}",
                path.display()
            )));
        }
        println!("[audio reply: {}]", path.display());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label(Role::Human), "You");
        assert_eq!(role_label(Role::Ai), "AI");
    }

    #[tokio::test]
    async fn test_play_audio_missing_asset_fails() {
        let mut surface = TerminalSurface::new();
        let result = surface
            .play_audio(Path::new("/nonexistent/parley-clip.wav"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_play_audio_existing_asset() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("parley-surface-test-{}.wav", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"RIFF").unwrap();

        let mut surface = TerminalSurface::new();
        assert!(surface.play_audio(&path).await.is_ok());

        std::fs::remove_file(&path).unwrap();
    }
}
