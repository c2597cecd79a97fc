//! Document Export Module for Inkwell
//!
//! This module turns a note into something that can leave the editor:
//! a printable standalone HTML document, or rendered HTML on the clipboard.
//!
//! # Architecture
//!
//! - `options.rs` - Export destination and behavior
//! - `html.rs` - Print document generation and writing
//! - `clipboard.rs` - Platform clipboard operations

pub mod clipboard;
pub mod html;
pub mod options;

pub use clipboard::{copy_html_to_clipboard, copy_html_to_clipboard_with, ClipboardHold};
pub use html::{document_file_name, export_document, generate_print_document};
pub use options::ExportOptions;
