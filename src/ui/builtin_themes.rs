use serde::Deserialize;

/// Style tokens for one theme, as written in `builtin_themes.toml`. Each
/// field is a comma-separated token list: a color (named, `#rgb`,
/// `#rrggbb`, or `rgb(r,g,b)`) plus optional modifiers (`bold`, `italic`,
/// `underlined`, `reversed`).
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub display_name: String,
    pub background: Option<String>,
    pub user_prefix: Option<String>,
    pub user_text: Option<String>,
    pub bot_text: Option<String>,
    pub title: Option<String>,
    pub streaming_indicator: Option<String>,
    pub input_border: Option<String>,
    pub input_title: Option<String>,
    pub input_text: Option<String>,
    pub md_heading: Option<String>,
    pub md_list_marker: Option<String>,
    pub md_link: Option<String>,
    pub md_code: Option<String>,
    pub md_code_block: Option<String>,
    pub md_blockquote: Option<String>,
    pub md_table_border: Option<String>,
    pub md_table_header: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
}

/// The closed theme registry, in display/cycle order.
pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_themes.toml");
    let config: BuiltinThemesConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_themes.toml");
    config.themes
}

pub fn find_builtin_theme(id: &str) -> Option<ThemeSpec> {
    load_builtin_themes()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_exactly_the_five_themes() {
        let themes = load_builtin_themes();
        let ids: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["nebula", "minty", "sunset", "mono", "oceanic"]);
    }

    #[test]
    fn lookup_is_total_for_valid_ids_and_case_insensitive() {
        for id in ["nebula", "minty", "sunset", "mono", "oceanic"] {
            assert!(find_builtin_theme(id).is_some());
        }
        let t = find_builtin_theme("OcEaNiC").expect("should find 'oceanic'");
        assert_eq!(t.id, "oceanic");
        assert!(find_builtin_theme("midnight").is_none());
    }

    #[test]
    fn every_theme_names_a_background_and_display_name() {
        for t in load_builtin_themes() {
            assert!(t.background.is_some(), "theme {} lacks a background", t.id);
            assert!(!t.display_name.is_empty());
        }
    }
}
