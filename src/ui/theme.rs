use crate::ui::builtin_themes::ThemeSpec;
use ratatui::style::{Color, Modifier, Style};

/// Markdown node kinds with a themed rendering style. The renderer looks
/// styles up through [`Theme::markdown_style`] rather than hard-wiring
/// colors per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownKind {
    Paragraph,
    Heading,
    ListMarker,
    Link,
    CodeSpan,
    CodeBlock,
    Blockquote,
    TableBorder,
    TableHeader,
}

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub streaming_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,

    // Markdown node styles
    md_heading_style: Style,
    md_list_marker_style: Style,
    md_link_style: Style,
    md_code_style: Style,
    md_code_block_style: Style,
    md_blockquote_style: Style,
    md_table_border_style: Style,
    md_table_header_style: Style,
}

impl Theme {
    /// Per-node-kind style table for the markdown renderer.
    pub fn markdown_style(&self, kind: MarkdownKind) -> Style {
        match kind {
            MarkdownKind::Paragraph => self.bot_text_style,
            MarkdownKind::Heading => self.md_heading_style,
            MarkdownKind::ListMarker => self.md_list_marker_style,
            MarkdownKind::Link => self.md_link_style,
            MarkdownKind::CodeSpan => self.md_code_style,
            MarkdownKind::CodeBlock => self.md_code_block_style,
            MarkdownKind::Blockquote => self.md_blockquote_style,
            MarkdownKind::TableBorder => self.md_table_border_style,
            MarkdownKind::TableHeader => self.md_table_header_style,
        }
    }

    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let background_color = spec
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::Black);

        let bot_text_style = parse_style(&spec.bot_text);

        Theme {
            background_color,
            user_prefix_style: parse_style(&spec.user_prefix),
            user_text_style: parse_style(&spec.user_text),
            bot_text_style,

            title_style: parse_style(&spec.title),
            streaming_indicator_style: parse_style(&spec.streaming_indicator),
            input_border_style: parse_style(&spec.input_border),
            input_title_style: parse_style(&spec.input_title),
            input_text_style: parse_style(&spec.input_text),

            md_heading_style: style_or(
                &spec.md_heading,
                bot_text_style.add_modifier(Modifier::BOLD),
            ),
            md_list_marker_style: style_or(&spec.md_list_marker, bot_text_style),
            md_link_style: style_or(
                &spec.md_link,
                bot_text_style.add_modifier(Modifier::UNDERLINED),
            ),
            md_code_style: style_or(&spec.md_code, bot_text_style),
            md_code_block_style: style_or(&spec.md_code_block, bot_text_style),
            md_blockquote_style: style_or(
                &spec.md_blockquote,
                bot_text_style.add_modifier(Modifier::ITALIC),
            ),
            md_table_border_style: style_or(&spec.md_table_border, bot_text_style),
            md_table_header_style: style_or(
                &spec.md_table_header,
                bot_text_style.add_modifier(Modifier::BOLD),
            ),
        }
    }
}

fn style_or(spec: &Option<String>, fallback: Style) -> Style {
    match spec {
        Some(_) => parse_style(spec),
        None => fallback,
    }
}

fn parse_style(s: &Option<String>) -> Style {
    let mut style = Style::default();
    if let Some(ref spec) = s {
        for tok in spec.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if let Some(color) = parse_color(tok) {
                style = style.fg(color);
            } else {
                match tok.to_ascii_lowercase().as_str() {
                    "bold" => style = style.add_modifier(Modifier::BOLD),
                    "italic" => style = style.add_modifier(Modifier::ITALIC),
                    "underlined" => style = style.add_modifier(Modifier::UNDERLINED),
                    "reversed" => style = style.add_modifier(Modifier::REVERSED),
                    _ => {}
                }
            }
        }
    }
    style
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-gray" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "light_red" | "light-red" => Some(Color::LightRed),
        "green" => Some(Color::Green),
        "light_green" | "light-green" => Some(Color::LightGreen),
        "blue" => Some(Color::Blue),
        "light_blue" | "light-blue" => Some(Color::LightBlue),
        "cyan" => Some(Color::Cyan),
        "light_cyan" | "light-cyan" => Some(Color::LightCyan),
        "magenta" => Some(Color::Magenta),
        "light_magenta" | "light-magenta" => Some(Color::LightMagenta),
        "yellow" => Some(Color::Yellow),
        "light_yellow" | "light-yellow" => Some(Color::LightYellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    if !s.starts_with('#') {
        return None;
    }
    let hex = &s[1..];
    if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

fn parse_rgb_func(s: &str) -> Option<Color> {
    // Format: rgb(r,g,b)
    if !s.starts_with("rgb(") || !s.ends_with(')') {
        return None;
    }
    let content = &s[4..s.len() - 1];
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Color::Rgb(
        r.min(255) as u8,
        g.min(255) as u8,
        b.min(255) as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::builtin_themes::find_builtin_theme;

    #[test]
    fn hex_colors_parse_in_short_and_long_form() {
        assert_eq!(parse_color("#abc"), Some(Color::Rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(parse_color("#1a2B3c"), Some(Color::Rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn rgb_function_colors_parse_and_clamp() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Color::Rgb(1, 2, 3)));
        assert_eq!(parse_color("rgb(300,0,0)"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn style_tokens_combine_color_and_modifiers() {
        let style = parse_style(&Some("cyan, bold, underlined".to_string()));
        assert_eq!(style.fg, Some(Color::Cyan));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn missing_markdown_fields_fall_back_to_bot_text() {
        let spec = ThemeSpec {
            id: "test".to_string(),
            display_name: "Test".to_string(),
            background: Some("black".to_string()),
            user_prefix: None,
            user_text: None,
            bot_text: Some("white".to_string()),
            title: None,
            streaming_indicator: None,
            input_border: None,
            input_title: None,
            input_text: None,
            md_heading: None,
            md_list_marker: None,
            md_link: None,
            md_code: None,
            md_code_block: None,
            md_blockquote: None,
            md_table_border: None,
            md_table_header: None,
        };
        let theme = Theme::from_spec(&spec);
        let link = theme.markdown_style(MarkdownKind::Link);
        assert_eq!(link.fg, Some(Color::White));
        assert!(link.add_modifier.contains(Modifier::UNDERLINED));
        let heading = theme.markdown_style(MarkdownKind::Heading);
        assert!(heading.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn builtin_specs_resolve_to_distinct_backgrounds() {
        let nebula = Theme::from_spec(&find_builtin_theme("nebula").unwrap());
        let minty = Theme::from_spec(&find_builtin_theme("minty").unwrap());
        assert_ne!(nebula.background_color, minty.background_color);
    }
}
