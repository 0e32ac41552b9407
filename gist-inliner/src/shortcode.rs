//! Gist shortcode scanning, link extraction and code block rendering.
//!
//! A shortcode is a single-line token of the form `{% gist <text> %}`. The
//! first URL-shaped substring inside it names the gist; its raw body is
//! fetched and rendered as a fenced code block in place of the token.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one shortcode token. `.` stops at newlines, so tokens never span lines.
static SHORTCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{% gist .*? %\}").unwrap());

/// Permissive URL pattern: `http(s)://` or `www.` followed by URL characters,
/// allowing balanced parentheses and refusing trailing punctuation.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?:https?://|www\.)",
        r"(?:\([\-A-Z0-9+\&@\#/%=\~_|$?!:,.]*\)|[\-A-Z0-9+\&@\#/%=\~_|$?!:,.])*",
        r"(?:\([\-A-Z0-9+\&@\#/%=\~_|$?!:,.]*\)|[A-Z0-9+\&@\#/%=\~_|$])",
    ))
    .unwrap()
});

/// A gist shortcode found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcode {
    /// Exact source text of the token, delimiters included.
    pub text: String,
    /// Byte offset of the token in the scanned text.
    pub start: usize,
    /// Byte offset one past the end of the token.
    pub end: usize,
    /// 1-based line number of the token.
    pub line: usize,
}

impl Shortcode {
    /// Extracts the first link inside this shortcode.
    pub fn link(&self) -> Option<Link> {
        Link::extract(&self.text)
    }
}

/// Finds all gist shortcodes in `text`, in document order.
pub fn find_shortcodes(text: &str) -> Vec<Shortcode> {
    let mut line = 1;
    let mut scanned = 0;

    SHORTCODE_RE
        .find_iter(text)
        .map(|m| {
            line += text[scanned..m.start()].matches('\n').count();
            scanned = m.start();
            Shortcode {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                line,
            }
        })
        .collect()
}

/// A link extracted from a shortcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link(String);

impl Link {
    /// Extracts the first URL-shaped substring from `text`.
    ///
    /// Links written as `www.host/...` are given an `https://` scheme.
    pub fn extract(text: &str) -> Option<Self> {
        let found = LINK_RE.find(text)?.as_str();
        let has_scheme = found.len() >= 4 && found[..4].eq_ignore_ascii_case("http");
        if has_scheme {
            Some(Self(found.to_string()))
        } else {
            Some(Self(format!("https://{}", found)))
        }
    }

    /// Returns the link as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URL of the raw body: the link with `/<suffix>` appended.
    pub fn raw_url(&self, suffix: &str) -> String {
        let base = self.0.trim_end_matches('/');
        let suffix = suffix.trim_matches('/');
        if suffix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, suffix)
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders a fenced code block with the given language tag.
pub fn render_code_block(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}
