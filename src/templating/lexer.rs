//! Minimal tokenizer for Tera / Django template syntax.
//!
//! The lexer only distinguishes the four token shapes both engines share:
//! plain text, `{{ variable }}`, `{% block tag %}` and `{# comment #}`. It does not
//! parse expressions. Every token keeps its raw source slice, so concatenating the
//! raw slices reproduces the input byte for byte; this is what lets a JSX block body
//! be re-emitted verbatim for fingerprinting.
//!
//! `{% raw %} … {% endraw %}` sections are kept as text, as Tera does.
//!
//! Inside a JSX block, a `{{` or `{#` is often just JSX text (`{'{{'}`). Such an
//! opener never produces a token that reaches past the block's `{% endjsx %}`.

use super::blocks::{END_TAG, START_TAG};

/// Kind of a template token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text between tags
    Text,
    /// `{{ … }}`
    Variable,
    /// `{% … %}`
    Block,
    /// `{# … #}`
    Comment,
}

/// A token borrowed from the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind
    pub kind: TokenKind,
    /// Exact source text, delimiters included
    pub raw: &'a str,
    /// Byte offset of `raw` in the source
    pub offset: usize,
    /// 1-based line on which the token starts
    pub line: usize,
}

impl<'a> Token<'a> {
    /// Inner contents with delimiters, whitespace-control dashes and surrounding
    /// whitespace removed. For text tokens this is the raw text.
    #[must_use]
    pub fn contents(&self) -> &'a str {
        if self.kind == TokenKind::Text {
            return self.raw;
        }
        let inner = &self.raw[2..self.raw.len() - 2];
        let inner = inner.strip_prefix('-').unwrap_or(inner);
        let inner = inner.strip_suffix('-').unwrap_or(inner);
        inner.trim()
    }

    /// For block tokens, the tag name (first word of the contents).
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        if self.kind != TokenKind::Block {
            return None;
        }
        self.contents().split_whitespace().next()
    }

    /// Byte offset one past the end of the token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.raw.len()
    }
}

fn closing_delimiter(opener: u8) -> Option<(TokenKind, &'static str)> {
    match opener {
        b'{' => Some((TokenKind::Variable, "}}")),
        b'%' => Some((TokenKind::Block, "%}")),
        b'#' => Some((TokenKind::Comment, "#}")),
        _ => None,
    }
}

/// Whether `inner` contains a complete `{% endjsx %}` tag.
fn contains_end_tag(inner: &str) -> bool {
    let mut rest = inner;
    while let Some(start) = rest.find("{%") {
        rest = &rest[start + 2..];
        let Some(close) = rest.find("%}") else {
            return false;
        };
        let tag = &rest[..close];
        let tag = tag.strip_prefix('-').unwrap_or(tag);
        let tag = tag.strip_suffix('-').unwrap_or(tag);
        if tag.trim() == END_TAG {
            return true;
        }
    }
    false
}

/// Split `source` into tokens.
///
/// An opening delimiter without its matching closer is a single character of text,
/// and scanning resumes right after it. The error (if any) is left to the template
/// engine. While a JSX block is open, a variable or comment opener whose closer lies
/// beyond the block's end tag is text as well.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;
    let mut line = 1;
    let mut text_line = 1;
    let mut raw_section = false;
    let mut jsx_open = false;

    while pos + 1 < bytes.len() {
        let tag = if bytes[pos] == b'{' {
            closing_delimiter(bytes[pos + 1])
        } else {
            None
        };

        let Some((kind, closer)) = tag else {
            if bytes[pos] == b'\n' {
                line += 1;
            }
            pos += 1;
            continue;
        };

        let Some(close_rel) = source[pos + 2..].find(closer) else {
            // Unterminated tag: only the opening brace is text.
            pos += 1;
            continue;
        };
        let end = pos + 2 + close_rel + closer.len();
        if jsx_open && kind != TokenKind::Block && contains_end_tag(&source[pos + 2..end]) {
            pos += 1;
            continue;
        }
        let token = Token {
            kind,
            raw: &source[pos..end],
            offset: pos,
            line,
        };

        if raw_section && !(kind == TokenKind::Block && token.contents() == "endraw") {
            // Inside {% raw %}: skip just the opening brace and keep scanning.
            pos += 1;
            continue;
        }

        if text_start < pos {
            tokens.push(Token {
                kind: TokenKind::Text,
                raw: &source[text_start..pos],
                offset: text_start,
                line: text_line,
            });
        }

        match token.tag_name() {
            Some("raw") => raw_section = true,
            Some("endraw") => raw_section = false,
            _ if kind == TokenKind::Block && token.contents() == START_TAG => jsx_open = true,
            _ if kind == TokenKind::Block && token.contents() == END_TAG => jsx_open = false,
            _ => {}
        }

        line += token.raw.matches('\n').count();
        tokens.push(token);
        pos = end;
        text_start = pos;
        text_line = line;
    }

    if text_start < source.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            raw: &source[text_start..],
            offset: text_start,
            line: text_line,
        });
    }

    tokens
}
