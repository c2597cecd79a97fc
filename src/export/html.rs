//! Printable HTML Export
//!
//! This module wraps rendered markdown in a standalone HTML document with
//! an inlined print stylesheet. The document asks the browser to print
//! itself once loaded, so opening it is all a user needs to save a PDF.

use super::options::ExportOptions;
use crate::error::{Error, Result};
use crate::markdown::{MarkdownRenderer, RenderOptions};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// File name used when a title has no usable characters.
const FALLBACK_FILE_STEM: &str = "note";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete, printable HTML document from markdown content.
///
/// Links stay in the same browsing context since the document is meant
/// for paper.
///
/// # Arguments
///
/// * `markdown` - The markdown source text
/// * `title` - Document title, escaped into `<title>`
pub fn generate_print_document(markdown: &str, title: &str) -> String {
    let body = MarkdownRenderer::with_options(RenderOptions::print()).render(markdown);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Inkwell">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
<script>
    window.addEventListener("load", function () {{ window.print(); }});
</script>
</body>
</html>"#,
        title = html_escape(title),
        css = PRINT_CSS,
        body = body,
    )
}

/// Derive a file name for an exported document from its title.
///
/// Runs of anything other than letters and digits collapse into a single
/// `-`, and the result is lowercased.
pub fn document_file_name(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem
    };
    format!("{}.html", stem)
}

/// Write a printable document for `markdown` and optionally open it.
///
/// Returns the path of the written file. Conversion never fails; the
/// errors are environmental:
/// - `Error::FileWrite` when the directory or file cannot be written
/// - `Error::ExportPresent` when the file was written but no system
///   handler could open it
pub fn export_document(markdown: &str, title: &str, options: &ExportOptions) -> Result<PathBuf> {
    let dir = options.output_dir();
    fs::create_dir_all(&dir).map_err(|e| Error::FileWrite {
        path: dir.clone(),
        source: e,
    })?;

    let path = dir.join(document_file_name(title));
    let html = generate_print_document(markdown, title);
    debug!("Writing print document ({} bytes)", html.len());

    fs::write(&path, html).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;
    info!("Exported '{}' to {}", title, path.display());

    if options.open_after_export {
        open::that(&path).map_err(|e| Error::ExportPresent {
            path: path.clone(),
            source: e,
        })?;
        debug!("Opened {} for printing", path.display());
    }

    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Stylesheet for printed notes.
const PRINT_CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: #1a1a1a;
    padding: 40px;
    max-width: 800px;
    margin: 0 auto;
}

h1 { font-size: 2em; font-weight: 700; margin-top: 1em; margin-bottom: 0.5em; }
h2 { font-size: 1.5em; font-weight: 600; margin-top: 1em; margin-bottom: 0.5em; }
h3 { font-size: 1.25em; font-weight: 600; margin-top: 1em; margin-bottom: 0.5em; }

p { margin-bottom: 1em; }
strong { font-weight: 600; }
em { font-style: italic; }

code {
    background: #f4f4f5;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    font-family: "SF Mono", Monaco, Consolas, monospace;
    font-size: 0.9em;
}

pre {
    background: #f4f4f5;
    padding: 1em;
    border-radius: 8px;
    overflow-x: auto;
    margin-bottom: 1em;
}

pre code {
    background: none;
    padding: 0;
}

blockquote {
    border-left: 4px solid #d4d4d8;
    padding-left: 1em;
    margin: 1em 0;
    color: #52525b;
    font-style: italic;
}

ul {
    margin-bottom: 1em;
    padding-left: 2em;
}

li { margin-bottom: 0.25em; }

hr {
    border: none;
    border-top: 1px solid #e4e4e7;
    margin: 2em 0;
}

a { color: #2563eb; text-decoration: underline; }

@media print {
    body { padding: 20px; }
    pre, blockquote { page-break-inside: avoid; }
}
"#;

/// Escape HTML special characters for text and attribute contexts.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_options(dir: &TempDir) -> ExportOptions {
        ExportOptions::default()
            .with_directory(dir.path())
            .with_open_after_export(false)
    }

    #[test]
    fn test_generate_print_document() {
        let html = generate_print_document("# Test\n\nParagraph text.", "Test Doc");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Doc</title>"));
        assert!(html.contains("@media print"));
        assert!(html.contains("window.print()"));
        assert!(html.contains("<h1>Test</h1>\n<p>Paragraph text.</p>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = generate_print_document("body", "</title><script>x</script>");
        assert!(html.contains("<title>&lt;/title&gt;&lt;script&gt;x&lt;/script&gt;</title>"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn test_links_stay_in_place_when_printed() {
        let html = generate_print_document("[site](https://example.com)", "Links");
        assert!(html.contains("<a href=\"https://example.com\">site</a>"));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(document_file_name("Welcome to Inkwell"), "welcome-to-inkwell.html");
        assert_eq!(document_file_name("  a / b: c?  "), "a-b-c.html");
        assert_eq!(document_file_name("../../etc/passwd"), "etc-passwd.html");
        assert_eq!(document_file_name("***"), "note.html");
        assert_eq!(document_file_name(""), "note.html");
    }

    #[test]
    fn test_export_document_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = export_document("# Shopping\n\n- eggs", "Shopping", &quiet_options(&dir)).unwrap();

        assert_eq!(path, dir.path().join("shopping.html"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<title>Shopping</title>"));
        assert!(written.contains("<ul><li>eggs</li></ul>"));
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("prints").join("2026");
        let options = ExportOptions::default()
            .with_directory(&nested)
            .with_open_after_export(false);

        let path = export_document("text", "Nested", &options).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_export_to_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let options = ExportOptions::default()
            .with_directory(&blocker)
            .with_open_after_export(false);

        let result = export_document("text", "Blocked", &options);
        assert!(matches!(result, Err(Error::FileWrite { .. })));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"it's\""), "&quot;it&#39;s&quot;");
    }
}
