//! URL utilities for consistent endpoint construction.

/// Normalize a base URL by removing trailing slashes.
///
/// # Examples
///
/// ```
/// use banter::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1"), "https://example.com/v1");
/// assert_eq!(normalize_base_url("https://example.com/v1///"), "https://example.com/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build the SSE streaming endpoint for a model.
///
/// # Examples
///
/// ```
/// use banter::utils::url::construct_stream_url;
///
/// assert_eq!(
///     construct_stream_url("https://generativelanguage.googleapis.com/v1beta/", "gemini-2.5-flash"),
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
/// );
/// ```
pub fn construct_stream_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:streamGenerateContent?alt=sse",
        normalize_base_url(base_url),
        model
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_do_not_double_up() {
        assert_eq!(
            construct_stream_url("https://example.com/v1///", "gemini-2.5-flash"),
            "https://example.com/v1/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn plain_base_urls_pass_through() {
        assert_eq!(normalize_base_url("https://example.com/v1"), "https://example.com/v1");
    }
}
