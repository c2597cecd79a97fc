//! Staged markdown-to-HTML pipeline
//!
//! Rendering is a fixed, ordered list of independent [`Stage`]s. Each stage
//! rewrites a [`Pass`]: the partially transformed text plus a stash of
//! finished markup fragments. Code spans and fenced blocks are moved into
//! the stash and replaced by sentinel tokens, so no later stage can
//! reinterpret their contents. The stash is restored once every stage has
//! run.

use regex::{Captures, Regex};
use std::fmt::Write;
use std::sync::OnceLock;

use super::renderer::RenderOptions;

/// Opens a token standing for a block-level stash entry.
const BLOCK_TOKEN: char = '\u{E000}';
/// Opens a token standing for an inline stash entry.
const INLINE_TOKEN: char = '\u{E001}';
/// Closes either kind of token.
const TOKEN_END: char = '\u{E002}';

/// Tags that mark a paragraph-stage block as already block-level.
const BLOCK_LEVEL_PREFIXES: &[&str] = &["<h", "<ul", "<ol", "<pre", "<blockquote", "<hr"];

/// URL schemes that are never emitted into an `href`.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

macro_rules! static_regex {
    ($pattern:expr) => {{
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new($pattern).expect("built-in pattern must compile"))
    }};
}

// ─────────────────────────────────────────────────────────────────────────────
// Intermediate Representation
// ─────────────────────────────────────────────────────────────────────────────

/// Finished markup fragments, addressed by the tokens left in the text.
#[derive(Debug, Default)]
struct Stash {
    fragments: Vec<String>,
}

impl Stash {
    fn push(&mut self, opener: char, html: String) -> String {
        let token = format!("{}{}{}", opener, self.fragments.len(), TOKEN_END);
        self.fragments.push(html);
        token
    }

    fn push_block(&mut self, html: String) -> String {
        self.push(BLOCK_TOKEN, html)
    }

    fn push_inline(&mut self, html: String) -> String {
        self.push(INLINE_TOKEN, html)
    }

    fn get(&self, index: &str) -> &str {
        index
            .parse::<usize>()
            .ok()
            .and_then(|i| self.fragments.get(i))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Replace every token in `text` with its fragment.
    fn restore(&self, text: &str) -> String {
        let re = static_regex!("[\u{E000}\u{E001}]([0-9]+)\u{E002}");
        re.replace_all(text, |caps: &Captures| self.get(&caps[1]).to_string())
            .into_owned()
    }
}

/// One rendering in progress.
#[derive(Debug)]
pub struct Pass {
    text: String,
    stash: Stash,
}

impl Pass {
    /// Start a pass over raw markdown source.
    pub fn new(source: &str) -> Self {
        Self {
            text: source.to_string(),
            stash: Stash::default(),
        }
    }

    /// The current intermediate text, tokens included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute stashed fragments back in and return the final HTML.
    pub fn finish(self) -> String {
        self.stash.restore(&self.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stages
// ─────────────────────────────────────────────────────────────────────────────

/// A single transformation step of the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Escape `&`, `<` and `>` in the raw input
    Escape,
    /// Triple-backtick fenced code blocks
    FencedCode,
    /// Single-backtick code spans
    InlineCode,
    /// `#`, `##` and `###` headings
    Headings,
    /// `***`, `**` and `*` emphasis
    Emphasis,
    /// `[label](url)` links
    Links,
    /// `> ` quoted lines
    Blockquotes,
    /// `---` rules
    HorizontalRules,
    /// `- ` list items and their containers
    Lists,
    /// Blank-line separated paragraphs
    Paragraphs,
}

impl Stage {
    /// Every stage, in the order it must run.
    pub const PIPELINE: [Stage; 10] = [
        Stage::Escape,
        Stage::FencedCode,
        Stage::InlineCode,
        Stage::Headings,
        Stage::Emphasis,
        Stage::Links,
        Stage::Blockquotes,
        Stage::HorizontalRules,
        Stage::Lists,
        Stage::Paragraphs,
    ];

    /// Short name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Escape => "escape",
            Stage::FencedCode => "fenced-code",
            Stage::InlineCode => "inline-code",
            Stage::Headings => "headings",
            Stage::Emphasis => "emphasis",
            Stage::Links => "links",
            Stage::Blockquotes => "blockquotes",
            Stage::HorizontalRules => "horizontal-rules",
            Stage::Lists => "lists",
            Stage::Paragraphs => "paragraphs",
        }
    }

    /// Run this stage over the pass.
    pub fn apply(self, pass: &mut Pass, options: &RenderOptions) {
        match self {
            Stage::Escape => pass.text = escape_html(&pass.text),
            Stage::FencedCode => fenced_code(pass),
            Stage::InlineCode => inline_code(pass),
            Stage::Headings => headings(pass),
            Stage::Emphasis => emphasis(pass),
            Stage::Links => links(pass, options),
            Stage::Blockquotes => {
                let re = static_regex!(r"(?m)^&gt; (.*)$");
                pass.text = re
                    .replace_all(&pass.text, "<blockquote>${1}</blockquote>")
                    .into_owned();
            }
            Stage::HorizontalRules => {
                let re = static_regex!(r"(?m)^---$");
                pass.text = re.replace_all(&pass.text, "<hr>").into_owned();
            }
            Stage::Lists => lists(pass),
            Stage::Paragraphs => paragraphs(pass),
        }
    }
}

/// Escape the three markup-significant characters and any literal token
/// characters. Line endings are normalized to `\n`.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.replace("\r\n", "\n").chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            BLOCK_TOKEN | INLINE_TOKEN | TOKEN_END => {
                let _ = write!(out, "&#x{:X};", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn fenced_code(pass: &mut Pass) {
    // The closing fence is optional: an unterminated block runs to the end.
    let re = static_regex!(r"(?ms)^```(\w*)[ \t]*\n(.*?)(?:^```[ \t]*$|\z)");
    let replaced = re
        .replace_all(&pass.text, |caps: &Captures| {
            let language = match &caps[1] {
                "" => "text",
                lang => lang,
            };
            let html = format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                language,
                caps[2].trim()
            );
            format!("\n\n{}\n\n", pass.stash.push_block(html))
        })
        .into_owned();
    pass.text = replaced;
}

/// Stash code spans, and link targets with them.
///
/// A link target must reach the link stage as written, so it is stashed
/// here, before code and emphasis markup can land inside it. One
/// leftmost-first scan decides which construct owns each backtick.
fn inline_code(pass: &mut Pass) {
    let re = static_regex!(r"`(?P<code>[^`\n]+)`|\]\((?P<target>[^)\n]+)\)");
    let replaced = re
        .replace_all(&pass.text, |caps: &Captures| match caps.name("code") {
            Some(code) => pass.stash.push_inline(format!("<code>{}</code>", code.as_str())),
            None => {
                let target = pass.stash.push_inline(caps["target"].to_string());
                format!("]({})", target)
            }
        })
        .into_owned();
    pass.text = replaced;
}

fn headings(pass: &mut Pass) {
    // Most specific first so `#` never eats the hashes of `###`.
    let h3 = static_regex!(r"(?m)^### (.*)$");
    let h2 = static_regex!(r"(?m)^## (.*)$");
    let h1 = static_regex!(r"(?m)^# (.*)$");

    let text = h3.replace_all(&pass.text, "<h3>${1}</h3>").into_owned();
    let text = h2.replace_all(&text, "<h2>${1}</h2>").into_owned();
    pass.text = h1.replace_all(&text, "<h1>${1}</h1>").into_owned();
}

fn emphasis(pass: &mut Pass) {
    let strong_em = static_regex!(r"\*\*\*(.+?)\*\*\*");
    // A bold span may swallow one trailing `*` so that `**a *b***` closes
    // the inner italic inside the bold.
    let strong = static_regex!(r"\*\*(.+?\*?)\*\*");
    let em = static_regex!(r"\*(.+?)\*");

    let text = strong_em
        .replace_all(&pass.text, "<strong><em>${1}</em></strong>")
        .into_owned();
    let text = strong.replace_all(&text, "<strong>${1}</strong>").into_owned();
    pass.text = em.replace_all(&text, "<em>${1}</em>").into_owned();
}

fn links(pass: &mut Pass, options: &RenderOptions) {
    let re = static_regex!(r"\[([^\]]+)\]\(([^)]+)\)");
    let replaced = re
        .replace_all(&pass.text, |caps: &Captures| {
            let href = sanitize_href(&pass.stash.restore(&caps[2]));
            if options.links_open_in_new_window {
                format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    href, &caps[1]
                )
            } else {
                format!("<a href=\"{}\">{}</a>", href, &caps[1])
            }
        })
        .into_owned();
    pass.text = replaced;
}

/// Make an already entity-escaped URL safe to place in a quoted attribute.
fn sanitize_href(url: &str) -> String {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        return "#".to_string();
    }
    url.trim().replace('"', "&quot;")
}

fn is_list_item(line: &str) -> bool {
    line.starts_with("<li>") && line.ends_with("</li>")
}

fn lists(pass: &mut Pass) {
    let re = static_regex!(r"(?m)^- (.*)$");
    let text = re.replace_all(&pass.text, "<li>${1}</li>").into_owned();

    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut idx = 0;
    while idx < lines.len() {
        if is_list_item(lines[idx]) {
            let start = idx;
            while idx < lines.len() && is_list_item(lines[idx]) {
                idx += 1;
            }
            out.push(format!("<ul>{}</ul>", lines[start..idx].join("\n")));
        } else {
            out.push(lines[idx].to_string());
            idx += 1;
        }
    }
    pass.text = out.join("\n");
}

fn is_block_level(block: &str) -> bool {
    block.starts_with(BLOCK_TOKEN)
        || BLOCK_LEVEL_PREFIXES
            .iter()
            .any(|prefix| block.starts_with(prefix))
}

fn paragraphs(pass: &mut Pass) {
    pass.text = pass
        .text
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if is_block_level(block) {
                block.to_string()
            } else {
                format!("<p>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
