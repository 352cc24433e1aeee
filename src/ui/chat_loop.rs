//! The interactive event loop.
//!
//! One loop drives everything: draw a frame, fold in any streamed
//! fragments that arrived since the last frame, then handle at most one
//! keyboard event. Stream consumption and key handling never block each
//! other because the stream service runs on its own task and hands events
//! over the channel.

use std::error::Error;
use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Size, Terminal};
use tokio::sync::mpsc;

use crate::core::app::App;
use crate::core::chat_stream::{ChatStreamService, StreamMessage, StreamParams};
use crate::ui::renderer::{transcript_max_offset, ui};

pub struct ChatOptions {
    pub model: String,
    pub theme: String,
    pub base_url: String,
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(options.model, options.base_url, &options.theme);
    let client = reqwest::Client::new();
    let (service, mut rx) = ChatStreamService::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, &client, &service, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &reqwest::Client,
    service: &ChatStreamService,
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Fold in every fragment that arrived since the last frame, then
        // repaint before touching the keyboard.
        let mut received_any = false;
        while let Ok((message, stream_id)) = rx.try_recv() {
            app.on_stream_event(message, stream_id);
            received_any = true;
        }
        if received_any {
            continue;
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match apply_key(app, terminal.size()?, key) {
            KeyAction::Quit => return Ok(()),
            KeyAction::Submit => {
                if let Some(request) = app.submit() {
                    service.spawn_stream(StreamParams {
                        client: client.clone(),
                        base_url: request.base_url,
                        api_key: request.api_key,
                        model: request.model,
                        contents: request.contents,
                        stream_id: request.stream_id,
                    });
                }
            }
            KeyAction::Handled => {}
        }
    }
}

enum KeyAction {
    Quit,
    Submit,
    Handled,
}

fn apply_key(app: &mut App, viewport: Size, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cycle_theme();
        }
        KeyCode::Enter => return KeyAction::Submit,
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => {
            if app.auto_scroll {
                // Leaving follow mode: start from the pinned position.
                app.scroll_offset = transcript_max_offset(app, viewport);
            }
            app.scroll_up();
        }
        KeyCode::Down => {
            let max = transcript_max_offset(app, viewport);
            app.scroll_down(max);
        }
        // Control chords arrive as plain chars with the modifier set;
        // they are commands, not input.
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(c);
        }
        _ => {}
    }
    KeyAction::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_THEME};

    fn test_app() -> App {
        App::new(
            DEFAULT_MODEL.to_string(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_THEME,
        )
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        apply_key(app, Size::new(80, 24), KeyEvent::new(code, modifiers))
    }

    #[test]
    fn plain_characters_edit_the_input() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('h'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('I'), KeyModifiers::SHIFT);
        assert_eq!(app.input, "hI");

        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.input, "h");
    }

    #[test]
    fn control_chords_never_edit_the_input() {
        let mut app = test_app();
        app.input.push_str("draft");
        press(&mut app, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(app.input, "draft");
    }

    #[test]
    fn ctrl_c_quits_and_ctrl_t_cycles() {
        let mut app = test_app();
        assert!(matches!(
            press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit
        ));
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_ne!(app.theme_id, DEFAULT_THEME);
    }
}
