//! The ordered transcript of one chat.
//!
//! The conversation owns the message list, the id counter, and the loading
//! flag. It knows nothing about streaming; the controller in
//! [`crate::core::app`] mutates it one discrete step at a time.

use crate::api::Content;
use crate::core::constants::WELCOME_TEXT;
use crate::core::message::{Message, MessageId, WELCOME_ID};

pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
    next_id: u64,
}

impl Conversation {
    /// A fresh conversation holds exactly the synthetic welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(WELCOME_ID, WELCOME_TEXT)],
            loading: false,
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a user turn carrying `text` verbatim (untrimmed).
    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(Message::user(id, text));
        id
    }

    /// Appends an empty bot message to be filled in as fragments arrive.
    pub fn open_placeholder(&mut self) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(Message::bot(id, ""));
        id
    }

    /// Appends a bot message carrying `text`; used when a failure occurs
    /// before a placeholder exists.
    pub fn push_bot(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(Message::bot(id, text));
        id
    }

    /// Overwrites the content of the message with `id`. Returns false when
    /// no such message exists.
    pub fn overwrite(&mut self, id: MessageId, text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.content = text.into();
                true
            }
            None => false,
        }
    }

    /// Display projection: placeholder bot messages are suppressed until
    /// their first fragment arrives. A filter, not a deletion.
    pub fn display_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_placeholder())
    }

    /// Prior turns serialized for session seeding: every message except the
    /// synthetic welcome, in order, mapped to API roles.
    pub fn history(&self) -> Vec<Content> {
        self.messages
            .iter()
            .filter(|m| m.id != WELCOME_ID)
            .map(|m| Content::new(m.sender.api_role(), m.content.clone()))
            .collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
