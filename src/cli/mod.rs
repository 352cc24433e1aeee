//! Command-line interface parsing and dispatch.

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_THEME};
use crate::ui::builtin_themes::load_builtin_themes;
use crate::ui::chat_loop::{run_chat, ChatOptions};

#[derive(Parser)]
#[command(name = "banter")]
#[command(about = "A themeable terminal chat interface for Google's Gemini API")]
#[command(
    long_about = "Banter is a full-screen terminal chat interface for Google's Gemini API. \
Responses stream in live and render as formatted markdown, and five built-in \
themes restyle the whole interface.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (read when the first message is sent)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down           Scroll through chat history\n\
  Ctrl+T            Switch to the next theme\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use for chat
    #[arg(short, long)]
    pub model: Option<String>,

    /// Theme to start with (see `banter themes`)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Write diagnostics to the given file
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available themes
    Themes,
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Themes) => list_themes(),
        None => {
            crate::utils::logging::init(args.log.as_deref())?;
            let config = Config::load()?;
            let options = ChatOptions {
                model: args
                    .model
                    .or(config.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                theme: args
                    .theme
                    .or(config.theme)
                    .unwrap_or_else(|| DEFAULT_THEME.to_string()),
                base_url: config
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            };
            run_chat(options).await
        }
    }
}

fn list_themes() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let current = config.theme.as_deref().unwrap_or(DEFAULT_THEME);

    println!("Available themes:\n");
    for t in load_builtin_themes() {
        let mark = if t.id.eq_ignore_ascii_case(current) {
            "*"
        } else {
            " "
        };
        println!("  {} {} - {}", mark, t.id, t.display_name);
    }
    println!("\nCurrent: {}", current);
    Ok(())
}
