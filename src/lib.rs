//! Inkwell - a distraction-free markdown note editor core
//!
//! The library holds everything a host UI needs: the markdown renderer,
//! the scroll synchronizer that keeps editor and preview aligned, the
//! in-memory note store, printable export and user settings.

pub mod config;
pub mod error;
pub mod export;
pub mod markdown;
pub mod notes;
pub mod preview;
pub mod state;

pub use error::{Error, Result};
pub use state::EditorSession;
