//! The conversation controller.
//!
//! `App` is pure state driven by the UI loop: `submit` runs the
//! send-side of one exchange and hands back the request for the stream
//! service to spawn; `on_stream_event` folds arriving stream events back
//! into the transcript. All terminal I/O lives in [`crate::ui`].

use std::env;
use std::time::Instant;

use crate::api::Content;
use crate::core::chat_stream::StreamMessage;
use crate::core::constants::{API_KEY_ENV, ERROR_REPLY};
use crate::core::conversation::Conversation;
use crate::core::message::MessageId;
use crate::core::session::ChatSession;
use crate::ui::builtin_themes::{find_builtin_theme, load_builtin_themes};
use crate::ui::theme::Theme;

/// Everything the stream service needs for one exchange, minus the HTTP
/// client the UI loop already holds.
pub struct SubmitRequest {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub contents: Vec<Content>,
    pub stream_id: u64,
}

struct InFlight {
    stream_id: u64,
    reply_target: MessageId,
    user_text: String,
    /// Running concatenation of every fragment, in arrival order. The
    /// reply target is overwritten with the full value on each arrival.
    accumulator: String,
    failed: bool,
}

pub struct App {
    pub conversation: Conversation,
    pub session: ChatSession,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub theme: Theme,
    pub theme_id: String,
    pub pulse_start: Instant,
    model: String,
    base_url: String,
    api_key: Option<String>,
    next_stream_id: u64,
    in_flight: Option<InFlight>,
}

impl App {
    pub fn new(model: String, base_url: String, theme_id: &str) -> Self {
        let spec = find_builtin_theme(theme_id)
            .unwrap_or_else(|| load_builtin_themes().into_iter().next().expect("builtin themes"));
        let theme = Theme::from_spec(&spec);
        Self {
            conversation: Conversation::new(),
            session: ChatSession::new(),
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            theme,
            theme_id: spec.id,
            pulse_start: Instant::now(),
            model,
            base_url,
            api_key: None,
            next_stream_id: 0,
            in_flight: None,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_loading(&self) -> bool {
        self.conversation.is_loading()
    }

    /// Runs the send side of one exchange for the current input buffer.
    ///
    /// Blank input is a no-op, and a submit while an exchange is in flight
    /// is hard-rejected; both return `None` without touching state. On
    /// success the returned request is ready for the stream service.
    pub fn submit(&mut self) -> Option<SubmitRequest> {
        let text = self.input.clone();
        if text.trim().is_empty() || self.conversation.is_loading() {
            return None;
        }

        // Prior history for seeding excludes the turn being submitted.
        let history = self.conversation.history();

        self.conversation.set_loading(true);
        self.pulse_start = Instant::now();
        self.conversation.push_user(&text);
        self.input.clear();

        if !self.session.is_active() {
            // Credential read happens here, once; a missing key surfaces
            // as a send-time provider failure, never at startup.
            self.api_key = env::var(API_KEY_ENV).ok();
            self.session.activate(history);
        }

        let reply_target = self.conversation.open_placeholder();
        self.next_stream_id += 1;
        let stream_id = self.next_stream_id;
        self.in_flight = Some(InFlight {
            stream_id,
            reply_target,
            user_text: text.clone(),
            accumulator: String::new(),
            failed: false,
        });
        self.auto_scroll = true;

        let session = self
            .session
            .active_mut()
            .expect("session is active after activation");

        Some(SubmitRequest {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            contents: session.request_contents(&text),
            stream_id,
        })
    }

    /// Folds one stream event into the transcript. Events tagged with a
    /// stream id other than the in-flight one are dropped.
    pub fn on_stream_event(&mut self, event: StreamMessage, stream_id: u64) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };
        if flight.stream_id != stream_id {
            return;
        }

        match event {
            StreamMessage::Chunk(delta) => {
                if flight.failed {
                    return;
                }
                flight.accumulator.push_str(&delta);
                let text = flight.accumulator.clone();
                let target = flight.reply_target;
                self.conversation.overwrite(target, text);
            }
            StreamMessage::Error(detail) => {
                tracing::error!("exchange failed: {detail}");
                flight.failed = true;
                let target = flight.reply_target;
                if !self.conversation.overwrite(target, ERROR_REPLY) {
                    self.conversation.push_bot(ERROR_REPLY);
                }
            }
            StreamMessage::End => {
                let flight = self.in_flight.take().expect("in-flight exchange");
                if !flight.failed {
                    if let Some(session) = self.session.active_mut() {
                        session.record_exchange(&flight.user_text, &flight.accumulator);
                    }
                }
                self.conversation.set_loading(false);
            }
        }
    }

    /// Sets the active theme to `id`. Unknown ids and reselecting the
    /// active theme leave state untouched.
    pub fn set_theme(&mut self, id: &str) {
        if self.theme_id.eq_ignore_ascii_case(id) {
            return;
        }
        if let Some(spec) = find_builtin_theme(id) {
            self.theme = Theme::from_spec(&spec);
            self.theme_id = spec.id;
        }
    }

    /// Advances to the next registry entry, wrapping at the end.
    pub fn cycle_theme(&mut self) {
        let themes = load_builtin_themes();
        let next = themes
            .iter()
            .position(|t| t.id.eq_ignore_ascii_case(&self.theme_id))
            .map(|i| (i + 1) % themes.len())
            .unwrap_or(0);
        let id = themes[next].id.clone();
        self.set_theme(&id);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(1).min(max_offset);
        if self.scroll_offset == max_offset {
            self.auto_scroll = true;
        }
    }
}
