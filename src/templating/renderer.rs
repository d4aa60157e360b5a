//! Template rendering with Tera and JSX block placeholders.
//!
//! Tera has no extension API for custom block tags, so the renderer rewrites the
//! template before handing it over:
//!
//! - `{% load jsx %}` tags are removed (they only exist for Django compatibility)
//! - each `{% jsx %} … {% endjsx %}` block becomes a call to an internal function
//!   that receives the block fingerprint and the full rendering context, including
//!   loop variables, and returns the marker element
//!
//! Block bodies never reach Tera, so `{{ … }}` or `{% … %}` inside a block are
//! kept verbatim for the client.
//!
//! # Limitations
//!
//! - Tera hands the context to the marker function as a JSON dump, which is parsed
//!   again before projection. Each marker pays for the whole context, not only the
//!   values its block references, so a block inside a loop over a large context is
//!   correspondingly slower.
//! - The dump holds the values bound by `{% for %}` and `{% set %}`, but not Tera's
//!   `loop` helper. `ctx.loop.index` and its siblings resolve as missing and fall
//!   back like any other unknown path. Bind the value first
//!   (`{% set n = loop.index %}`) and reference `ctx.n` instead.

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tera::{Context as TeraContext, Tera};

use super::blocks::{JsxBlock, Segment, segment_template};
use super::lexer::Token;
use super::marker::Marker;
use super::projection::ProjectionConfig;
use crate::core::JsxError;

/// Name of the function standing in for JSX blocks in prepared templates.
const MARKER_FUNCTION: &str = "__jsx_marker";

/// Tera's magic variable holding the current context as a JSON dump.
///
/// Loop targets are included, the `loop` helper object is not.
const CONTEXT_VARIABLE: &str = "__tera_context";

/// Library name accepted by `{% load %}`.
const LOAD_LIBRARY: &str = "jsx";

/// A template rewritten for Tera, with the blocks it references.
#[derive(Debug, Clone)]
pub struct PreparedTemplate {
    source: String,
    blocks: Vec<JsxBlock>,
}

impl PreparedTemplate {
    /// Tera source with blocks replaced by marker function calls.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Blocks found in the original template, in source order.
    #[must_use]
    pub fn blocks(&self) -> &[JsxBlock] {
        &self.blocks
    }
}

/// The Tera function emitting markers.
struct MarkerFunction {
    blocks: Arc<HashMap<String, JsxBlock>>,
    config: ProjectionConfig,
}

impl tera::Function for MarkerFunction {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let fingerprint = args
            .get("fingerprint")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("jsx marker called without a fingerprint"))?;
        let block = self
            .blocks
            .get(fingerprint)
            .ok_or_else(|| tera::Error::msg(format!("unknown jsx block {fingerprint}")))?;

        // `__tera_context` evaluates to the context dumped as pretty JSON.
        let context = match args.get("context") {
            Some(Value::String(dump)) => serde_json::from_str(dump).map_err(|e| {
                tera::Error::msg(format!("jsx marker received an unreadable context: {e}"))
            })?,
            Some(other) => other.clone(),
            None => Value::Object(serde_json::Map::new()),
        };

        Ok(Value::String(Marker::register(block, &context, &self.config).to_html()))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Renders templates containing JSX blocks.
///
/// A fresh [`Tera`] instance is built per render; the renderer itself only holds the
/// projection settings.
#[derive(Debug, Clone, Default)]
pub struct JsxRenderer {
    config: ProjectionConfig,
}

impl JsxRenderer {
    /// Create a renderer using `config` for context projection.
    #[must_use]
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            config,
        }
    }

    /// Projection settings in use.
    #[must_use]
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Rewrite `source` for Tera.
    ///
    /// # Errors
    ///
    /// Fails on nested or unclosed blocks; `name` identifies the template in the error.
    pub fn prepare(&self, name: &str, source: &str) -> Result<PreparedTemplate, JsxError> {
        let mut prepared = String::with_capacity(source.len());
        let mut blocks = Vec::new();

        for segment in segment_template(source, name)? {
            match segment {
                Segment::Token(token) if is_load_tag(&token) => {
                    // Keep the line count stable for Tera's error positions.
                    prepared.push_str(&"\n".repeat(token.raw.matches('\n').count()));
                }
                Segment::Token(token) => prepared.push_str(token.raw),
                Segment::Block(block) => {
                    prepared.push_str(&marker_call(source, &block));
                    blocks.push(block);
                }
            }
        }

        tracing::debug!("Prepared template {} with {} jsx block(s)", name, blocks.len());
        Ok(PreparedTemplate {
            source: prepared,
            blocks,
        })
    }

    /// Render `source` under `context`, replacing each block with its marker.
    ///
    /// # Errors
    ///
    /// Returns a structural error for nested or unclosed blocks, and
    /// [`JsxError::Render`] for anything Tera rejects.
    pub fn render_template(
        &self,
        name: &str,
        source: &str,
        context: &TeraContext,
    ) -> Result<String, JsxError> {
        let prepared = self.prepare(name, source)?;
        tracing::trace!("Rendering {} with context: {}", name, context.clone().into_json());

        let blocks: HashMap<String, JsxBlock> = prepared
            .blocks
            .iter()
            .map(|block| (block.fingerprint().to_string(), block.clone()))
            .collect();

        let mut tera = Tera::default();
        tera.register_function(
            MARKER_FUNCTION,
            MarkerFunction {
                blocks: Arc::new(blocks),
                config: self.config.clone(),
            },
        );

        let render_error = |e: tera::Error| JsxError::Render {
            template: name.to_string(),
            message: format_tera_error(&e, name),
            line: extract_line_from_tera_error(&e),
        };

        tera.add_raw_template(name, &prepared.source).map_err(render_error)?;
        let rendered = tera.render(name, context).map_err(render_error)?;

        tracing::debug!("Rendered template {}", name);
        Ok(rendered)
    }
}

fn is_load_tag(token: &Token<'_>) -> bool {
    if token.tag_name() != Some("load") {
        return false;
    }
    let libraries: Vec<&str> = token.contents().split_whitespace().skip(1).collect();
    !libraries.is_empty() && libraries.iter().all(|lib| *lib == LOAD_LIBRARY)
}

/// The Tera expression replacing `block`, carrying over whitespace control and
/// the number of lines the block occupied.
fn marker_call(source: &str, block: &JsxBlock) -> String {
    let whole = &source[block.span()];
    let open = if whole.starts_with("{%-") { "{{-" } else { "{{" };
    let close = if whole.ends_with("-%}") { "-}}" } else { "}}" };
    let newlines = "\n".repeat(whole.matches('\n').count());
    format!(
        r#"{open} {MARKER_FUNCTION}(fingerprint="{}", context={CONTEXT_VARIABLE}){newlines} {close}"#,
        block.fingerprint()
    )
}

/// Line number Tera reported, if any.
///
/// Parse errors carry a `line:column` position in their message.
fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    static POSITION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = POSITION.get_or_init(|| Regex::new(r"(\d+):(\d+)").ok()).as_ref()?;
    let message = format!("{error:?}");
    re.captures(&message)?.get(1)?.as_str().parse().ok()
}

/// Flatten a Tera error chain into one readable message.
///
/// Internal names (the marker function and the template registration wrapper
/// messages) are removed.
pub fn format_tera_error(error: &tera::Error, template: &str) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        all_messages.push(err.to_string());
        current = err.source();
    }

    let quoted = format!("'{template}'");
    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace(&format!("Failed to render {quoted}"), "")
                .replace(&format!("Failed to parse {quoted}"), "")
                .replace(&format!("Function call '{MARKER_FUNCTION}' failed"), "")
                .trim()
                .to_string()
        })
        .filter(|msg| !msg.is_empty())
        .collect();

    if messages.is_empty() {
        "Template syntax error".to_string()
    } else {
        messages.join("\n  → ")
    }
}
