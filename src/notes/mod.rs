//! Note storage for Inkwell
//!
//! Notes live in memory for the lifetime of a session. The store keeps
//! them newest-first and tracks which one is open in the editor.

mod store;

pub use store::{derive_title, Note, NoteId, NoteStore, UNTITLED, WELCOME_CONTENT};
