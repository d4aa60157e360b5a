//! Lexical extraction of `ctx.<path>` references from JSX block bodies.
//!
//! A block body refers to server-side data through expressions such as
//! `{ctx.location.full_name}` or `{ctx.list.0}`. The extractor finds those
//! references without attempting any resolution; the result drives both the
//! render-time projection and, indirectly, the build-time registry (both sides scan
//! the same verbatim body, so they always agree).

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// `ctx.` at a word boundary, then an identifier and any number of
/// `.identifier` / `.digits` segments. A run of dots before `ctx` is tolerated
/// because the boundary sits between the last dot and the `c`.
const CTX_REFERENCE_PATTERN: &str = r"\bctx\.([A-Za-z_]\w*(?:\.\w+)*)";

fn ctx_reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CTX_REFERENCE_PATTERN).expect("static pattern is valid"))
}

/// A dotted path into the rendering context, e.g. `location.full_name`.
///
/// Segments are mapping keys, sequence indices (numeric strings) or attribute
/// names. An expression always has at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expression {
    segments: Vec<String>,
}

impl Expression {
    /// Parse a dotted path. Returns `None` for an empty path or one with an empty
    /// segment (`"a..b"`, `".a"`).
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self {
            segments,
        })
    }

    /// The individual path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The dotted path, without the `ctx.` prefix.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Extract every distinct `ctx.` reference in `text`, in first-occurrence order.
#[must_use]
pub fn extract_expressions(text: &str) -> Vec<Expression> {
    let mut seen = HashSet::new();
    ctx_reference_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| seen.insert(m.as_str()))
        .filter_map(|m| Expression::parse(m.as_str()))
        .collect()
}

/// Like [`extract_expressions`], returning the dotted path strings.
#[must_use]
pub fn extract_paths(text: &str) -> Vec<String> {
    extract_expressions(text).iter().map(Expression::path).collect()
}
