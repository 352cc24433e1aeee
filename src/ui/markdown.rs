//! Markdown rendering for bot messages.
//!
//! A pulldown-cmark event walk producing themed ratatui lines. Styling is
//! resolved per node kind through [`Theme::markdown_style`], so themes
//! decide how each element looks and the walk only decides structure.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::{MarkdownKind, Theme};

/// Renders one message body to display lines. The result carries no
/// trailing blank line; the transcript builder owns inter-message spacing.
pub fn render_markdown(content: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(content, options);

    let mut renderer = Renderer::new(theme);
    for event in parser {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Clone, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

#[derive(Default)]
struct TableState {
    in_header: bool,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
}

struct Renderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    quote_depth: usize,
    code_block: Option<String>,
    table: Option<TableState>,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![theme.markdown_style(MarkdownKind::Paragraph)],
            list_stack: Vec::new(),
            quote_depth: 0,
            code_block: None,
            table: None,
        }
    }

    fn current_style(&self) -> Style {
        *self.style_stack.last().expect("base style always present")
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(table) = self.table.as_mut() {
            table.current_cell.push_str(text);
            return;
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn flush_line(&mut self) {
        let mut spans = std::mem::take(&mut self.spans);
        if self.quote_depth > 0 {
            spans.insert(
                0,
                Span::styled(
                    "│ ".repeat(self.quote_depth),
                    self.theme.markdown_style(MarkdownKind::Blockquote),
                ),
            );
        }
        self.lines.push(Line::from(spans));
    }

    fn flush_if_pending(&mut self) {
        if !self.spans.is_empty() {
            self.flush_line();
        }
    }

    fn blank_line(&mut self) {
        self.lines.push(Line::from(""));
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag_end) => self.end_tag(tag_end),
            Event::Text(text) => {
                if let Some(buffer) = self.code_block.as_mut() {
                    buffer.push_str(&text);
                } else {
                    let style = self.current_style();
                    self.push_text(&text, style);
                }
            }
            Event::Code(code) => {
                let style = self.theme.markdown_style(MarkdownKind::CodeSpan);
                self.push_text(&code, style);
            }
            Event::SoftBreak => {
                let style = self.current_style();
                self.push_text(" ", style);
            }
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_if_pending();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    self.theme.markdown_style(MarkdownKind::TableBorder),
                )));
                self.blank_line();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                let style = self.theme.markdown_style(MarkdownKind::ListMarker);
                self.push_text(marker, style);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.current_style();
                self.push_text(html.trim_end_matches('\n'), style);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { .. } => {
                self.flush_if_pending();
                self.style_stack
                    .push(self.theme.markdown_style(MarkdownKind::Heading));
            }
            Tag::BlockQuote(_) => {
                self.flush_if_pending();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush_if_pending();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush_if_pending();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                let style = self.theme.markdown_style(MarkdownKind::ListMarker);
                self.spans.push(Span::styled(marker, style));
            }
            Tag::CodeBlock(_) => {
                self.flush_if_pending();
                self.code_block = Some(String::new());
            }
            Tag::Emphasis => {
                let style = self.current_style().add_modifier(Modifier::ITALIC);
                self.style_stack.push(style);
            }
            Tag::Strong => {
                let style = self.current_style().add_modifier(Modifier::BOLD);
                self.style_stack.push(style);
            }
            Tag::Strikethrough => {
                let style = self.current_style().add_modifier(Modifier::CROSSED_OUT);
                self.style_stack.push(style);
            }
            Tag::Link { .. } => {
                self.style_stack
                    .push(self.theme.markdown_style(MarkdownKind::Link));
            }
            Tag::Table(_) => {
                self.flush_if_pending();
                self.table = Some(TableState::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_header = true;
                }
            }
            Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.current_cell.clear();
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() && self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.style_stack.pop();
                self.flush_line();
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_if_pending();
                self.quote_depth -= 1;
                if self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.flush_if_pending(),
            TagEnd::CodeBlock => {
                if let Some(buffer) = self.code_block.take() {
                    let style = self.theme.markdown_style(MarkdownKind::CodeBlock);
                    for code_line in buffer.trim_end_matches('\n').split('\n') {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {code_line}"),
                            style,
                        )));
                    }
                    self.blank_line();
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.style_stack.pop();
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.render_table(table);
                    self.blank_line();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current_row);
                    table.in_header = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            _ => {}
        }
    }

    fn render_table(&mut self, table: TableState) {
        let column_count = table
            .rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(table.header.len()))
            .max()
            .unwrap_or(0);
        if column_count == 0 {
            return;
        }

        let mut widths = vec![0usize; column_count];
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let border_style = self.theme.markdown_style(MarkdownKind::TableBorder);
        let header_style = self.theme.markdown_style(MarkdownKind::TableHeader);
        let cell_style = self.theme.markdown_style(MarkdownKind::Paragraph);

        if !table.header.is_empty() {
            self.lines
                .push(table_row_line(&table.header, &widths, header_style, border_style));
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            self.lines.push(Line::from(Span::styled(
                rule.join("─┼─"),
                border_style,
            )));
        }
        for row in &table.rows {
            self.lines
                .push(table_row_line(row, &widths, cell_style, border_style));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_if_pending();
        while matches!(self.lines.last(), Some(line) if line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

fn table_row_line(
    cells: &[String],
    widths: &[usize],
    cell_style: Style,
    border_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", border_style));
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let padding = width.saturating_sub(cell.width());
        spans.push(Span::styled(
            format!("{cell}{}", " ".repeat(padding)),
            cell_style,
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::builtin_themes::find_builtin_theme;

    fn theme() -> Theme {
        Theme::from_spec(&find_builtin_theme("nebula").unwrap())
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn paragraphs_render_as_plain_lines() {
        let lines = render_markdown("Hello world", &theme());
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "Hello world");
    }

    #[test]
    fn paragraphs_are_separated_by_a_blank_line() {
        let lines = render_markdown("one\n\ntwo", &theme());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["one", "", "two"]);
    }

    #[test]
    fn emphasis_and_strong_set_modifiers() {
        let lines = render_markdown("*it* and **bold**", &theme());
        let spans = &lines[0].spans;
        let italic = spans
            .iter()
            .find(|s| s.content == "it")
            .expect("italic span");
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
        let bold = spans
            .iter()
            .find(|s| s.content == "bold")
            .expect("bold span");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn unordered_lists_get_bullet_markers() {
        let lines = render_markdown("- one\n- two", &theme());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• one", "• two"]);
    }

    #[test]
    fn ordered_lists_count_from_their_start() {
        let lines = render_markdown("3. three\n4. four", &theme());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["3. three", "4. four"]);
    }

    #[test]
    fn nested_lists_indent() {
        let lines = render_markdown("- outer\n  - inner", &theme());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• outer", "  • inner"]);
    }

    #[test]
    fn inline_code_uses_the_code_span_style() {
        let rendered_theme = theme();
        let lines = render_markdown("run `cargo` now", &rendered_theme);
        let code = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "cargo")
            .expect("code span");
        assert_eq!(
            code.style,
            rendered_theme.markdown_style(MarkdownKind::CodeSpan)
        );
    }

    #[test]
    fn fenced_code_blocks_render_indented_verbatim_lines() {
        let rendered_theme = theme();
        let lines = render_markdown("```\nlet x = 1;\nlet y = 2;\n```", &rendered_theme);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["  let x = 1;", "  let y = 2;"]);
        assert_eq!(
            lines[0].spans[0].style,
            rendered_theme.markdown_style(MarkdownKind::CodeBlock)
        );
    }

    #[test]
    fn blockquotes_carry_a_bar_prefix() {
        let lines = render_markdown("> quoted text", &theme());
        assert_eq!(line_text(&lines[0]), "│ quoted text");
    }

    #[test]
    fn links_use_the_link_style() {
        let rendered_theme = theme();
        let lines = render_markdown("see [docs](https://example.com)", &rendered_theme);
        let link = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "docs")
            .expect("link span");
        assert_eq!(
            link.style,
            rendered_theme.markdown_style(MarkdownKind::Link)
        );
        assert!(link.style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn tables_render_header_rule_and_padded_cells() {
        let lines = render_markdown(
            "| name | qty |\n| --- | --- |\n| apples | 3 |\n| plums | 12 |",
            &theme(),
        );
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0], "name   │ qty");
        assert_eq!(texts[1], "───────┼────");
        assert_eq!(texts[2], "apples │ 3  ");
        assert_eq!(texts[3], "plums  │ 12 ");
    }

    #[test]
    fn task_markers_render_literally() {
        let lines = render_markdown("- [x] done\n- [ ] open", &theme());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["• [x] done", "• [ ] open"]);
    }
}
