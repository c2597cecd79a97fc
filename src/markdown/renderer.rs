//! Markdown to HTML rendering
//!
//! [`MarkdownRenderer`] drives a source string through every stage of the
//! pipeline in order. Rendering is total: malformed input degrades to
//! literal, escaped text and never fails. The renderer is the only
//! sanitization boundary between note text and the preview surface.

use super::pipeline::{Pass, Stage};

// ─────────────────────────────────────────────────────────────────────────────
// Render Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Open links in a new browsing context without exposing the opener
    /// or the referrer to the linked page
    pub links_open_in_new_window: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            links_open_in_new_window: true,
        }
    }
}

impl RenderOptions {
    /// Options for printable documents, where links stay in place.
    pub fn print() -> Self {
        Self {
            links_open_in_new_window: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Stateless markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render markdown source to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let mut pass = Pass::new(markdown);
        for stage in Stage::PIPELINE {
            stage.apply(&mut pass, &self.options);
        }
        pass.finish()
    }
}

/// Render markdown to HTML with the default options.
///
/// # Example
/// ```
/// let html = inkwell::markdown::render("# Title\n\nBody text");
/// assert_eq!(html, "<h1>Title</h1>\n<p>Body text</p>");
/// ```
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
