//! Markdown rendering module
//!
//! This module converts note text into the HTML shown in the preview pane
//! and embedded in exported documents. It implements a small, ordered
//! pattern-substitution subset of markdown rather than a full CommonMark
//! parser.
//!
//! # Supported syntax
//! - Fenced code blocks with an optional language tag
//! - Inline code spans
//! - `#`, `##` and `###` headings
//! - `***bold italic***`, `**bold**` and `*italic*`
//! - `[label](url)` links
//! - `> ` blockquote lines
//! - `---` horizontal rules
//! - `- ` unordered list items
//! - Blank-line separated paragraphs with line breaks
//!
//! # Example
//! ```ignore
//! use crate::markdown::{render, MarkdownRenderer, RenderOptions};
//!
//! let html = render("# Hello\n\nThis is **bold** text.");
//! let printable = MarkdownRenderer::with_options(RenderOptions::print()).render("[a](b)");
//! ```

mod pipeline;
mod renderer;

pub use pipeline::{Pass, Stage};
pub use renderer::{render, MarkdownRenderer, RenderOptions};
