//! Article-code representation.
//!
//! Codes are stored and compared in canonical form (no hyphens, no
//! whitespace) and shown in display form (`123-456-789`). Barcodes always
//! encode the canonical form.

use std::fmt;

use serde::{Deserialize, Serialize};

const GROUP_LEN: usize = 3;

/// Canonical article code. Construction always goes through [`canonicalize`],
/// so two codes are equal exactly when their canonical strings are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ArticleCode(String);

impl ArticleCode {
    pub fn new(raw: &str) -> Self {
        canonicalize(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn display(&self) -> String {
        format(self)
    }
}

impl fmt::Display for ArticleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleCode {
    fn from(raw: &str) -> Self {
        canonicalize(raw)
    }
}

impl From<String> for ArticleCode {
    fn from(raw: String) -> Self {
        canonicalize(&raw)
    }
}

impl From<ArticleCode> for String {
    fn from(code: ArticleCode) -> Self {
        code.0
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c.is_whitespace()
}

/// Strips every hyphen and whitespace character. Case and order of the
/// remaining characters are untouched.
pub fn canonicalize(raw: &str) -> ArticleCode {
    ArticleCode(raw.chars().filter(|c| !is_separator(*c)).collect())
}

pub fn is_valid(raw: &str) -> bool {
    !canonicalize(raw).is_empty()
}

/// Inserts a hyphen after every full group of three characters that is
/// followed by more input: `1234` becomes `123-4`.
pub fn format(code: &ArticleCode) -> String {
    let chars: Vec<char> = code.as_str().chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / GROUP_LEN);
    for (index, group) in chars.chunks(GROUP_LEN).enumerate() {
        if index > 0 {
            out.push('-');
        }
        out.extend(group);
    }
    out
}

/// Formats a raw, possibly already hyphenated, code for display.
pub fn format_raw(raw: &str) -> String {
    format(&canonicalize(raw))
}

/// Payload for a standard label's barcode. Separators must never reach the
/// encoder.
pub fn for_barcode(raw: &str) -> String {
    canonicalize(raw).0
}
