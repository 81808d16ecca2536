//! Conversation assembly: the bounded reply window and the summary prompt.

pub mod summary;
pub mod window;
