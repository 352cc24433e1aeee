use crate::core::app::App;
use crate::core::message::Sender;
use crate::ui::builtin_themes::load_builtin_themes;
use crate::ui::markdown::render_markdown;
use crate::utils::scroll::wrap_styled_lines;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Size,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Height of the bordered input box, in rows.
const INPUT_AREA_HEIGHT: u16 = 3;

pub fn ui(f: &mut Frame, app: &App) {
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_AREA_HEIGHT)])
        .split(f.area());

    // Pre-wrapped to the transcript width, so scroll offsets count the
    // rows actually rendered and the tail stays reachable.
    let lines = wrap_styled_lines(&build_transcript_lines(app), chunks[0].width);

    let available_height = chunks[0].height.saturating_sub(1); // title row
    let total_rows = lines.len() as u16;
    let max_offset = total_rows.saturating_sub(available_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(title_line(app)))
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    render_input_area(f, app, chunks[1]);
}

/// Title row: app identity on the left, the theme strip on the right of it.
/// One strip entry per registry theme, the active one highlighted.
fn title_line(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(
            "banter v{} — {}  ",
            env!("CARGO_PKG_VERSION"),
            app.model()
        ),
        app.theme.title_style,
    )];
    for theme in load_builtin_themes() {
        let label = format!(" {} ", theme.display_name);
        if theme.id.eq_ignore_ascii_case(&app.theme_id) {
            spans.push(Span::styled(
                label,
                app.theme.title_style.add_modifier(Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::styled(label, app.theme.title_style));
        }
    }
    Line::from(spans)
}

/// Shared between the frame renderer and the scroll keys in the event loop.
pub fn build_transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for msg in app.conversation.display_messages() {
        match msg.sender {
            Sender::User => {
                for (i, content_line) in msg.content.lines().enumerate() {
                    let prefix = if i == 0 {
                        Span::styled("You: ", app.theme.user_prefix_style)
                    } else {
                        Span::raw("     ")
                    };
                    lines.push(Line::from(vec![
                        prefix,
                        Span::styled(content_line.to_string(), app.theme.user_text_style),
                    ]));
                }
            }
            Sender::Bot => {
                lines.extend(render_markdown(&msg.content, &app.theme));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Largest transcript scroll offset for the current terminal size, in
/// wrapped-row coordinates.
pub fn transcript_max_offset(app: &App, size: Size) -> u16 {
    let available = size
        .height
        .saturating_sub(INPUT_AREA_HEIGHT)
        .saturating_sub(1);
    let rows = wrap_styled_lines(&build_transcript_lines(app), size.width).len() as u16;
    rows.saturating_sub(available)
}

fn render_input_area(f: &mut Frame, app: &App, area: Rect) {
    let input_title = if app.is_loading() {
        "Waiting for Gemini… (Ctrl+T theme, Ctrl+C quit)"
    } else {
        "Ask Gemini anything (Enter send, Ctrl+T theme, Ctrl+C quit)"
    };

    let input = Paragraph::new(app.input.as_str())
        .style(app.theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.input_border_style)
                .title(Span::styled(input_title, app.theme.input_title_style)),
        );
    f.render_widget(input, area);

    if app.is_loading() && area.width > 3 {
        // Pulse cadence: two cycles per second, ramping up then down.
        let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
        let phase = (elapsed * 2.0) % 2.0;
        let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
        let symbol = if intensity < 0.33 {
            "○"
        } else if intensity < 0.66 {
            "◐"
        } else {
            "●"
        };
        let indicator_area = Rect {
            x: area.x + area.width - 3,
            y: area.y + 1,
            width: 1,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(symbol).style(app.theme.streaming_indicator_style),
            indicator_area,
        );
    }

    // Keep the cursor visible at the end of the input.
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_col = app.input.width().min(inner_width.saturating_sub(1)) as u16;
    f.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_THEME};
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        App::new(
            DEFAULT_MODEL.to_string(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_THEME,
        )
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn auto_scroll_reaches_the_tail_of_wrapped_replies() {
        let mut app = test_app();
        // One long unbroken markdown line; on a 30-column terminal it
        // wraps to far more rows than the transcript area holds.
        let mut reply = "word ".repeat(120);
        reply.push_str("FINALWORD");
        app.conversation.push_bot(reply);

        let backend = TestBackend::new(30, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();

        assert!(
            buffer_text(&terminal).contains("FINALWORD"),
            "tail of streamed reply not visible"
        );
    }

    #[test]
    fn max_offset_counts_wrapped_rows() {
        let mut app = test_app();
        app.conversation.push_bot("word ".repeat(40).trim_end().to_string());

        let narrow = transcript_max_offset(&app, Size::new(20, 10));
        let wide = transcript_max_offset(&app, Size::new(300, 10));
        assert!(narrow > wide, "narrow: {narrow}, wide: {wide}");
    }
}
