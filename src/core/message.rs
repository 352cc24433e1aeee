/// Identifier for one transcript entry. Ids are allocated from a counter
/// owned by the conversation and are unique within it; allocation order is
/// insertion order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

/// The synthetic welcome message occupies a reserved id so that history
/// serialization can skip it without positional bookkeeping.
pub const WELCOME_ID: MessageId = MessageId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role string the Gemini API expects for this sender.
    pub fn api_role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
}

impl Message {
    pub fn new(id: MessageId, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            content: content.into(),
        }
    }

    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, Sender::User, content)
    }

    pub fn bot(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, Sender::Bot, content)
    }

    /// An empty bot message awaiting its first streamed fragment.
    pub fn is_placeholder(&self) -> bool {
        self.sender == Sender::Bot && self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senders_map_to_api_roles() {
        assert_eq!(Sender::User.api_role(), "user");
        assert_eq!(Sender::Bot.api_role(), "model");
    }

    #[test]
    fn only_empty_bot_messages_are_placeholders() {
        assert!(Message::bot(MessageId(1), "").is_placeholder());
        assert!(!Message::bot(MessageId(1), "hi").is_placeholder());
        assert!(!Message::user(MessageId(1), "").is_placeholder());
    }
}
