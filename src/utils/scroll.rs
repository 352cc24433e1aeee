//! Width-aware wrapping for transcript lines.
//!
//! The transcript is pre-wrapped to the terminal width before rendering,
//! so scroll offsets count exactly the rows that end up on screen.
//! Wrapping happens at word boundaries; a word wider than the terminal is
//! broken mid-word. Span styles survive the breaks.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

pub fn wrap_styled_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    if width == 0 {
        return lines.iter().map(owned_line).collect();
    }

    let mut wrapper = Wrapper {
        width,
        out: Vec::with_capacity(lines.len()),
        row: Vec::new(),
        row_width: 0,
    };
    for line in lines {
        wrapper.wrap_line(line);
    }
    wrapper.out
}

fn owned_line(line: &Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

struct Wrapper {
    width: usize,
    out: Vec<Line<'static>>,
    row: Vec<Span<'static>>,
    row_width: usize,
}

impl Wrapper {
    fn wrap_line(&mut self, line: &Line<'_>) {
        let rows_before = self.out.len();
        // The word being accumulated, one styled char at a time.
        let mut word: Vec<(char, Style, usize)> = Vec::new();
        let mut word_width = 0usize;

        for span in &line.spans {
            for ch in span.content.chars() {
                if ch == ' ' {
                    self.place_word(&mut word, &mut word_width);
                    if self.row_width < self.width {
                        self.push_char(' ', span.style, 1);
                    } else {
                        // The space itself is the break point; drop it.
                        self.emit_row();
                    }
                } else {
                    let ch_width = ch.width().unwrap_or(0);
                    word.push((ch, span.style, ch_width));
                    word_width += ch_width;
                }
            }
        }
        self.place_word(&mut word, &mut word_width);

        if !self.row.is_empty() {
            self.emit_row();
        }
        if self.out.len() == rows_before {
            self.out.push(Line::from(""));
        }
    }

    fn place_word(&mut self, word: &mut Vec<(char, Style, usize)>, word_width: &mut usize) {
        if *word_width == 0 {
            word.clear();
            return;
        }
        if self.row_width > 0 && self.row_width + *word_width > self.width {
            self.emit_row();
        }
        for (ch, style, ch_width) in word.drain(..) {
            // Words wider than the terminal break mid-word.
            if self.row_width > 0 && self.row_width + ch_width > self.width {
                self.emit_row();
            }
            self.push_char(ch, style, ch_width);
        }
        *word_width = 0;
    }

    fn push_char(&mut self, ch: char, style: Style, ch_width: usize) {
        match self.row.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(ch),
            _ => self.row.push(Span::styled(ch.to_string(), style)),
        }
        self.row_width += ch_width;
    }

    fn emit_row(&mut self) {
        self.out.push(Line::from(std::mem::take(&mut self.row)));
        self.row_width = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn short_lines_pass_through_unchanged() {
        let input = vec![Line::from("hello"), Line::from("")];
        let wrapped = wrap_styled_lines(&input, 20);
        assert_eq!(texts(&wrapped), vec!["hello", ""]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let input = vec![Line::from("alpha beta gamma")];
        let wrapped = wrap_styled_lines(&input, 10);
        assert_eq!(texts(&wrapped), vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn words_wider_than_the_terminal_break_mid_word() {
        let input = vec![Line::from("a".repeat(25))];
        let wrapped = wrap_styled_lines(&input, 10);
        assert_eq!(
            texts(&wrapped),
            vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]
        );
    }

    #[test]
    fn styles_survive_the_break() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let input = vec![Line::from(vec![
            Span::raw("plain "),
            Span::styled("emphasized words here", bold),
        ])];
        let wrapped = wrap_styled_lines(&input, 12);
        assert_eq!(texts(&wrapped), vec!["plain ", "emphasized ", "words here"]);
        let second_row_style = wrapped[1].spans[0].style;
        assert!(second_row_style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn zero_width_leaves_lines_untouched() {
        let input = vec![Line::from("anything at all")];
        let wrapped = wrap_styled_lines(&input, 0);
        assert_eq!(texts(&wrapped), vec!["anything at all"]);
    }
}
