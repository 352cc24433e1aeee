//! The lazily created chat session.
//!
//! Gemini multi-turn chat is client-side: each request carries the full
//! accumulated turn list. The session is an explicit two-state machine so
//! the seed-once transition is its own testable unit: `Uninitialized`
//! until the first send, then `Active` for the rest of the controller's
//! lifetime, carrying the serialized prior history exactly once.

use crate::api::Content;

pub enum ChatSession {
    Uninitialized,
    Active(ActiveSession),
}

pub struct ActiveSession {
    contents: Vec<Content>,
}

impl ChatSession {
    pub fn new() -> Self {
        ChatSession::Uninitialized
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ChatSession::Active(_))
    }

    /// Transitions to `Active`, seeding the turn list with `history`. On an
    /// already-active session the seed is ignored and the existing session
    /// is returned, so the transition happens at most once.
    pub fn activate(&mut self, history: Vec<Content>) -> &mut ActiveSession {
        if let ChatSession::Uninitialized = self {
            *self = ChatSession::Active(ActiveSession { contents: history });
        }
        match self {
            ChatSession::Active(session) => session,
            ChatSession::Uninitialized => unreachable!("session was just activated"),
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            ChatSession::Active(session) => Some(session),
            ChatSession::Uninitialized => None,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveSession {
    /// Turn list for a streamed send: the accumulated history plus the new
    /// user turn. The exchange is recorded only after the stream completes.
    pub fn request_contents(&self, message: &str) -> Vec<Content> {
        let mut contents = self.contents.clone();
        contents.push(Content::user(message));
        contents
    }

    /// Commits a completed exchange to the session history. Failed
    /// exchanges are never recorded; the session stays at its last good
    /// state and is reused for the next send.
    pub fn record_exchange(&mut self, user_text: &str, model_text: &str) {
        self.contents.push(Content::user(user_text));
        self.contents.push(Content::model(model_text));
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_happens_exactly_once() {
        let mut session = ChatSession::new();
        assert!(!session.is_active());

        session.activate(vec![Content::user("earlier")]);
        assert!(session.is_active());
        assert_eq!(session.active_mut().unwrap().contents().len(), 1);

        // A second activation must not reseed.
        session.activate(vec![]);
        assert_eq!(session.active_mut().unwrap().contents().len(), 1);
    }

    #[test]
    fn request_contents_appends_without_committing() {
        let mut session = ChatSession::new();
        let active = session.activate(vec![]);

        let request = active.request_contents("Hi");
        assert_eq!(request, vec![Content::user("Hi")]);
        // Not recorded until the exchange completes.
        assert!(active.contents().is_empty());
    }

    #[test]
    fn recorded_exchanges_carry_into_the_next_request() {
        let mut session = ChatSession::new();
        let active = session.activate(vec![]);
        active.record_exchange("Hi", "Hello!");

        let request = active.request_contents("And again?");
        assert_eq!(
            request,
            vec![
                Content::user("Hi"),
                Content::model("Hello!"),
                Content::user("And again?"),
            ]
        );
    }
}
