//! Domain state and backend coordination.
//!
//! [`app`] is the conversation controller driven by the UI loop;
//! [`conversation`] owns the ordered transcript, [`session`] the seed-once
//! chat session, and [`chat_stream`] the streaming transport.

pub mod app;
pub mod chat_stream;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod session;
