//! Banter is a themeable terminal chat client for Google's Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns conversation state, the chat session, streaming
//!   orchestration, and configuration.
//! - [`ui`] renders the terminal interface, the markdown transcript, and the
//!   theme registry, and runs the interactive event loop.
//! - [`api`] defines the Gemini request/response payloads used by the
//!   streaming client.
//! - [`cli`] parses command-line arguments and dispatches into the chat loop.
//!
//! The binary entrypoint (`src/main.rs`) routes through [`cli::run`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
