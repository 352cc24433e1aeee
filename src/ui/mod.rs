//! Terminal UI layer.
//!
//! - [`chat_loop`]: the interaction loop coordinating keyboard input and
//!   streaming via [`crate::core::chat_stream`].
//! - [`renderer`]: frame composition for the transcript and input areas.
//! - [`markdown`]: bot-message rendering to styled lines.
//! - [`theme`] and [`builtin_themes`]: color/style policy and the closed
//!   five-theme registry.
//!
//! Ownership boundary: this layer presents and captures interaction state;
//! [`crate::core`] owns domain logic and backend coordination.

pub mod builtin_themes;
pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
