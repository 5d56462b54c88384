//! Interactive chat module
//!
//! Provides a line-editor driven interface that walks the user through the
//! assessment one question at a time.

mod repl;

pub use repl::{ChatError, ChatRepl, ReplAction};
