//! Parley application binary - composition root.
//!
//! Ties the Parley crates together into an interactive chat client:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Resolve the required page title (env > config > default)
//! 3. Build the streaming HTTP client and the voice services
//! 4. Create the per-run chat session
//! 5. Drive one controller cycle per line of user input
//!
//! Voice input arrives through `/voice <file>`, which feeds the file's raw
//! bytes through the speech-to-text path exactly like a microphone capture
//! would.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use parley_chat::{ChatTurnController, TurnInput};
use parley_client::HttpChatClient;
use parley_core::config::ParleyConfig;
use parley_core::types::ChatSession;
use parley_voice::{MockSynthesizer, MockTranscriber};

mod cli;
mod surface;

use surface::TerminalSurface;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = ParleyConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Parley v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // The page title is a required setting; startup fails without a value.
    let page_title = config.resolve_page_title()?;
    tracing::info!(title = %page_title, "Page configured");

    // Session identity.
    let user_id = args.resolve_user_id();
    let mut session = ChatSession::new(user_id, config.api.model_name.clone());
    tracing::info!(
        session_id = %session.session_id,
        user_id = %user_id,
        model = %session.model_name,
        "Chat session created"
    );

    // Streaming client + voice services.
    let api_url = args.resolve_api_url(&config.api.url);
    let client = HttpChatClient::new(
        api_url.clone(),
        Duration::from_secs(config.api.connect_timeout_secs),
    )?;
    tracing::info!(endpoint = %api_url, "Streaming chat client ready");

    let voice_enabled = args.voice || config.voice.enabled;
    if voice_enabled {
        tracing::info!("Voice capabilities enabled");
    }

    let controller = ChatTurnController::new(client, MockTranscriber::new(), MockSynthesizer::new())
        .with_voice_output(voice_enabled)
        .with_sample_rate(config.voice.sample_rate);

    let mut surface = TerminalSurface::new();

    // Greeting.
    println!("=== {} ===", page_title);
    if let Some(greeting) = session.transcript.last() {
        println!("AI: {}", greeting.content);
    }
    println!("Type a message; /voice <file> to speak; /quit to exit.");

    // One controller cycle per line of input.
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();

        let input = if line == "/quit" || line == "/exit" {
            break;
        } else if let Some(path) = line.strip_prefix("/voice ") {
            match tokio::fs::read(path.trim()).await {
                Ok(bytes) => {
                    tracing::info!(path = path.trim(), bytes = bytes.len(), "Audio clip loaded");
                    TurnInput::spoken(bytes)
                }
                Err(e) => {
                    eprintln!("error: cannot read audio file: {}", e);
                    tracing::warn!(path = path.trim(), error = %e, "Failed to read audio clip");
                    continue;
                }
            }
        } else {
            // An empty line still runs a cycle: if the previous turn failed,
            // the unanswered question at the transcript tail is retried.
            TurnInput::typed(line)
        };

        let outcome = controller.run_cycle(&mut session, input, &mut surface).await;
        tracing::debug!(state = ?outcome.state, "Cycle complete");
    }

    tracing::info!(
        session_id = %session.session_id,
        messages = session.transcript.len(),
        "Session ended"
    );
    Ok(())
}
