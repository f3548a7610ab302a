//! Parley voice crate - speech-to-text and text-to-speech boundaries.
//!
//! Provides trait-based abstractions for transcribing captured audio and
//! synthesizing spoken replies, along with mock implementations for running
//! and testing without real speech engines. Synthesized audio lands in a
//! temporary file that the caller plays once and then deletes.

use std::future::Future;
use std::path::{Path, PathBuf};

use parley_core::error::ParleyError;

// =============================================================================
// Traits
// =============================================================================

/// Service for transcribing captured audio into text.
///
/// Implementations accept raw audio bytes and return plain text, or `None`
/// when nothing intelligible was heard. An empty transcription must never be
/// surfaced as a chat message.
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe raw audio bytes into text.
    ///
    /// # Arguments
    /// * `audio` - Raw captured audio bytes (PCM, 16 kHz expected).
    /// * `sample_rate` - Sample rate of the audio in Hz.
    ///
    /// # Returns
    /// `Ok(Some(text))` with the transcribed text, or `Ok(None)` when the
    /// audio contained no recognizable speech.
    fn transcribe(
        &self,
        audio: &[u8],
        sample_rate: u32,
    ) -> impl Future<Output = Result<Option<String>, ParleyError>> + Send;
}

/// Service for synthesizing text into a playable audio asset.
///
/// Implementations write the generated audio to a temporary file and return
/// its path. The caller owns the file from that point: it is played once and
/// then removed via [`remove_audio_asset`].
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio file.
    ///
    /// # Returns
    /// The filesystem path of the generated audio asset.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<PathBuf, ParleyError>> + Send;
}

// =============================================================================
// Mock implementations
// =============================================================================

/// Mock transcriber that derives text from the audio payload.
///
/// Used for testing and for running without a real STT engine. Interprets
/// the audio bytes as UTF-8 and returns the contained text, which lets tests
/// script exact transcripts. Returns `None` for whitespace-only payloads,
/// mirroring a real engine hearing silence.
#[derive(Debug, Clone, Default)]
pub struct MockTranscriber;

impl MockTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechTranscriber for MockTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        sample_rate: u32,
    ) -> Result<Option<String>, ParleyError> {
        if audio.is_empty() {
            return Err(ParleyError::Transcription(
                "Cannot transcribe empty audio data".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(ParleyError::Transcription(
                "Sample rate must be greater than 0".to_string(),
            ));
        }

        let text = String::from_utf8_lossy(audio).trim().to_string();

        tracing::debug!(
            audio_bytes = audio.len(),
            sample_rate = sample_rate,
            transcript_len = text.len(),
            "Mock transcription complete"
        );

        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

/// Mock synthesizer that writes a minimal silent WAV file.
///
/// The file lands in the system temp directory under a unique name so that
/// concurrent turns never collide. Refuses empty text.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer;

impl MockSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<PathBuf, ParleyError> {
        if text.trim().is_empty() {
            return Err(ParleyError::Synthesis(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let path =
            std::env::temp_dir().join(format!("parley-tts-{}.wav", uuid::Uuid::new_v4()));
        std::fs::write(&path, silent_wav())?;

        tracing::debug!(
            text_len = text.len(),
            path = %path.display(),
            "Mock synthesis complete"
        );

        Ok(path)
    }
}

/// A minimal valid WAV file: 44-byte header plus 100 ms of 16 kHz silence.
fn silent_wav() -> Vec<u8> {
    const SAMPLE_RATE: u32 = 16_000;
    const SAMPLES: u32 = SAMPLE_RATE / 10;
    let data_len = SAMPLES * 2; // 16-bit mono
    let mut wav = Vec::with_capacity(44 + data_len as usize);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

// =============================================================================
// Audio asset cleanup
// =============================================================================

/// Best-effort removal of a consumed audio asset.
///
/// Playback already happened (or already failed); a leftover temp file is
/// worth a warning, never an error.
pub fn remove_audio_asset(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Temporary audio asset removed"),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove audio asset")
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // SpeechTranscriber (MockTranscriber)
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mock_transcriber_returns_text() {
        let stt = MockTranscriber::new();
        let result = stt.transcribe(b"turn on the lights", 16_000).await.unwrap();
        assert_eq!(result.as_deref(), Some("turn on the lights"));
    }

    #[tokio::test]
    async fn test_mock_transcriber_trims_whitespace() {
        let stt = MockTranscriber::new();
        let result = stt.transcribe(b"  hello  ", 16_000).await.unwrap();
        assert_eq!(result.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_mock_transcriber_silence_returns_none() {
        let stt = MockTranscriber::new();
        let result = stt.transcribe(b"   \n  ", 16_000).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mock_transcriber_empty_audio_fails() {
        let stt = MockTranscriber::new();
        let result = stt.transcribe(&[], 16_000).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_transcriber_zero_sample_rate_fails() {
        let stt = MockTranscriber::new();
        let result = stt.transcribe(b"audio", 0).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_transcriber_non_utf8_audio() {
        let stt = MockTranscriber::new();
        // Lossy decoding still yields replacement characters, not an error.
        let result = stt.transcribe(&[0xff, 0xfe, 0x41], 16_000).await.unwrap();
        assert!(result.is_some());
    }

    // -------------------------------------------------------------------------
    // SpeechSynthesizer (MockSynthesizer)
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mock_synthesizer_writes_wav() {
        let tts = MockSynthesizer::new();
        let path = tts.synthesize("hello world").await.unwrap();
        assert!(path.exists());

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        remove_audio_asset(&path);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_mock_synthesizer_unique_paths() {
        let tts = MockSynthesizer::new();
        let a = tts.synthesize("one").await.unwrap();
        let b = tts.synthesize("two").await.unwrap();
        assert_ne!(a, b);
        remove_audio_asset(&a);
        remove_audio_asset(&b);
    }

    #[tokio::test]
    async fn test_mock_synthesizer_empty_text_fails() {
        let tts = MockSynthesizer::new();
        assert!(tts.synthesize("").await.is_err());
        assert!(tts.synthesize("   ").await.is_err());
    }

    // -------------------------------------------------------------------------
    // Asset cleanup
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_audio_asset_missing_file_is_silent() {
        // Removing a file that does not exist logs a warning and returns.
        remove_audio_asset(Path::new("/nonexistent/parley-tts-gone.wav"));
    }

    #[test]
    fn test_remove_audio_asset_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"RIFF").unwrap();
        assert!(path.exists());
        remove_audio_asset(&path);
        assert!(!path.exists());
    }

    // -------------------------------------------------------------------------
    // WAV helper
    // -------------------------------------------------------------------------

    #[test]
    fn test_silent_wav_header() {
        let wav = silent_wav();
        assert!(wav.len() > 44);
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");
        // Everything after the header is silence.
        assert!(wav[44..].iter().all(|&b| b == 0));
    }
}
