//! Turn controller for the Parley chat client.
//!
//! Drives one request/response cycle per user turn: acquire voice or typed
//! input, append Human messages to the transcript, stream the AI reply from
//! the remote backend, and optionally speak the reply aloud.

pub mod controller;
pub mod surface;

pub use controller::{ChatTurnController, TurnInput};
pub use surface::PresentationSurface;
