//! Clipboard Operations for HTML Export
//!
//! This module copies rendered notes to the system clipboard using the
//! arboard crate. Rich-text targets receive the HTML; everything else
//! receives the markdown source.
//!
//! On Linux the clipboard is served by the process that set it. A
//! long-running editor can return right away, but a process about to exit
//! has to keep serving until another application takes the clipboard over.

use crate::error::{Error, Result};
use crate::markdown;
use arboard::Clipboard;
use log::{debug, info};

/// How long copied content must be served by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardHold {
    /// The caller keeps running, e.g. an editor window
    #[default]
    Host,
    /// The caller exits next; serve until the clipboard is replaced
    UntilReplaced,
}

impl ClipboardHold {
    /// Whether copying must block to keep the content available.
    pub fn blocks(self) -> bool {
        self == ClipboardHold::UntilReplaced && cfg!(target_os = "linux")
    }
}

/// Render markdown and copy the HTML to the clipboard.
///
/// The markdown source is offered as the plain-text alternative, so
/// pasting into a plain editor yields the original note.
///
/// # Example
///
/// ```ignore
/// use inkwell::export::copy_html_to_clipboard;
///
/// copy_html_to_clipboard("# Hello\n\n**Bold** text")?;
/// // User can now paste formatted content in email/word processor
/// ```
pub fn copy_html_to_clipboard(markdown: &str) -> Result<()> {
    copy_html_to_clipboard_with(markdown, ClipboardHold::Host)
}

/// Render markdown and copy it, holding the clipboard as `hold` requires.
pub fn copy_html_to_clipboard_with(markdown: &str, hold: ClipboardHold) -> Result<()> {
    let html = markdown::render(markdown);
    copy_html_with_fallback(&html, markdown, hold)
}

/// Copy HTML with a plain-text fallback to the clipboard.
pub fn copy_html_with_fallback(html: &str, plain_text: &str, hold: ClipboardHold) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(clipboard_error("access"))?;

    if hold.blocks() {
        info!("Serving clipboard until another application replaces it");
        set_html_and_wait(&mut clipboard, html, plain_text)?;
    } else {
        clipboard
            .set_html(html, Some(plain_text))
            .map_err(clipboard_error("write"))?;
    }

    debug!("Copied {} bytes of HTML to clipboard", html.len());
    Ok(())
}

#[cfg(target_os = "linux")]
fn set_html_and_wait(clipboard: &mut Clipboard, html: &str, plain_text: &str) -> Result<()> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .wait()
        .html(html, Some(plain_text))
        .map_err(clipboard_error("write"))
}

#[cfg(not(target_os = "linux"))]
fn set_html_and_wait(clipboard: &mut Clipboard, html: &str, plain_text: &str) -> Result<()> {
    clipboard
        .set_html(html, Some(plain_text))
        .map_err(clipboard_error("write"))
}

/// Map an arboard failure to an `Error::Clipboard` naming the operation.
fn clipboard_error(operation: &'static str) -> impl Fn(arboard::Error) -> Error {
    move |e| Error::Clipboard(format!("{} failed: {}", operation, e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
