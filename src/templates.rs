//! Embedded template assets.

/// Grounded-chat template: answers queries using retrieved documents.
pub static GROUNDED_CHAT: &str = include_str!("templates/grounded_chat.prompty");
