//! Discovery of `{% jsx %} … {% endjsx %}` blocks in template source.
//!
//! Both halves of the hydration scheme go through [`scan_blocks`]: the renderer
//! when it prepares a template, and the registry compiler when it scans the
//! template corpus. Since the body, fingerprint and expressions all derive from the
//! same verbatim slice of source text, a marker produced at render time always finds
//! its registry entry.

use sha2::{Digest, Sha256};
use std::ops::Range;

use super::expressions::{Expression, extract_expressions};
use super::lexer::{Token, TokenKind, tokenize};
use crate::core::JsxError;

/// Tag opening a JSX block.
pub const START_TAG: &str = "jsx";

/// Tag closing a JSX block.
pub const END_TAG: &str = "endjsx";

/// Content fingerprint of a block body: lowercase hex SHA-256 of its bytes.
#[must_use]
pub fn fingerprint(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

/// A JSX block found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxBlock {
    body: String,
    fingerprint: String,
    expressions: Vec<Expression>,
    line: usize,
    span: Range<usize>,
}

impl JsxBlock {
    /// Build a block from its body text alone (no location information).
    pub fn new(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::located(body, 1, 0..0)
    }

    fn located(body: String, line: usize, span: Range<usize>) -> Self {
        Self {
            fingerprint: fingerprint(&body),
            expressions: extract_expressions(&body),
            body,
            line,
            span,
        }
    }

    /// Verbatim body between the start and end tags.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Hex digest of [`JsxBlock::body`].
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// `ctx.` expressions referenced by the body, in first-occurrence order.
    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// 1-based line of the start tag.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Byte range of the whole block, tags included, in the scanned source.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// A template split into pass-through tokens and JSX blocks.
#[derive(Debug)]
pub enum Segment<'a> {
    /// Any token outside a JSX block
    Token(Token<'a>),
    /// A complete JSX block
    Block(JsxBlock),
}

fn is_tag(token: &Token<'_>, name: &str) -> bool {
    token.kind == TokenKind::Block && token.contents() == name
}

/// Split a template into tokens and JSX blocks.
///
/// `template` names the source in error messages.
///
/// # Errors
///
/// - [`JsxError::NestedBlock`] when a start tag appears inside a block body
/// - [`JsxError::UnclosedBlock`] when a block is never closed
pub fn segment_template<'a>(source: &'a str, template: &str) -> Result<Vec<Segment<'a>>, JsxError> {
    let mut segments = Vec::new();
    let mut open: Option<Token<'a>> = None;

    for token in tokenize(source) {
        match open {
            None if is_tag(&token, START_TAG) => open = Some(token),
            None => segments.push(Segment::Token(token)),
            Some(_) if is_tag(&token, START_TAG) => {
                return Err(JsxError::NestedBlock {
                    template: template.to_string(),
                    line: token.line,
                });
            }
            Some(start) if is_tag(&token, END_TAG) => {
                let body = source[start.end()..token.offset].to_string();
                let block = JsxBlock::located(body, start.line, start.offset..token.end());
                tracing::trace!(
                    "Found jsx block {} at {}:{}",
                    block.fingerprint(),
                    template,
                    block.line()
                );
                segments.push(Segment::Block(block));
                open = None;
            }
            Some(_) => {}
        }
    }

    if let Some(start) = open {
        return Err(JsxError::UnclosedBlock {
            template: template.to_string(),
            line: start.line,
        });
    }

    Ok(segments)
}

/// All JSX blocks of a template, in source order.
///
/// # Errors
///
/// Same as [`segment_template`].
pub fn scan_blocks(source: &str, template: &str) -> Result<Vec<JsxBlock>, JsxError> {
    Ok(segment_template(source, template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Block(block) => Some(block),
            Segment::Token(_) => None,
        })
        .collect())
}
