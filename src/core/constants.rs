//! Shared constants used across the application.

/// Model requested when neither the CLI nor the config names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint; overridable via config for proxies.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key. Read once, when the chat
/// session is first activated; absence surfaces as a send-time failure.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Theme selected when neither the CLI nor the config names one.
pub const DEFAULT_THEME: &str = "nebula";

/// Synthetic greeting seeded into every new conversation. Never sent to
/// the API.
pub const WELCOME_TEXT: &str = "Hello! I'm Gemini. Ask me anything to get started.";

/// Fixed reply shown in place of a bot response after any API failure.
pub const ERROR_REPLY: &str = "I'm sorry, I encountered an error. Please try again.";
