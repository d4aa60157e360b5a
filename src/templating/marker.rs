//! Placeholder markers emitted in place of JSX blocks at render time.
//!
//! A marker is an empty, non-visual `<script>` element carrying the block's
//! fingerprint and its projected context:
//!
//! ```html
//! <script type="script/django-jsx" data-sha1="…" data-ctx="{&quot;i&quot;:1}"></script>
//! ```
//!
//! The element type and the two attribute names are a contract with the bootstrap
//! code generated by [`crate::compiler`]; change them on both sides or not at all.

use serde_json::{Map, Value};
use std::fmt;

use super::blocks::JsxBlock;
use super::projection::{ProjectionConfig, project};
use super::resolve::Lookup;

/// `type` attribute of the marker element.
pub const MARKER_TYPE: &str = "script/django-jsx";

/// Attribute carrying the block fingerprint.
pub const FINGERPRINT_ATTR: &str = "data-sha1";

/// Attribute carrying the serialized projected context.
pub const CONTEXT_ATTR: &str = "data-ctx";

/// A rendered JSX block instance: fingerprint plus the context it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    fingerprint: String,
    context: Map<String, Value>,
}

impl Marker {
    /// Build the marker for `block` rendered under `context`.
    pub fn register<L: Lookup + ?Sized>(
        block: &JsxBlock,
        context: &L,
        config: &ProjectionConfig,
    ) -> Self {
        let projected = project(context, block.expressions(), config);
        tracing::debug!(
            "Registered jsx block {} with {} expression(s)",
            block.fingerprint(),
            block.expressions().len()
        );
        Self {
            fingerprint: block.fingerprint().to_string(),
            context: projected,
        }
    }

    /// The block fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// The projected context.
    #[must_use]
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Compact JSON of the projected context, before HTML escaping.
    #[must_use]
    pub fn serialized_context(&self) -> String {
        Value::Object(self.context.clone()).to_string()
    }

    /// The marker element as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<script type="{}" {}="{}" {}="{}"></script>"#,
            MARKER_TYPE,
            FINGERPRINT_ATTR,
            self.fingerprint,
            CONTEXT_ATTR,
            tera::escape_html(&self.serialized_context())
        )
    }
}

/// Register raw block text: fingerprint it, extract its expressions and project.
pub fn register_str<L: Lookup + ?Sized>(
    block_text: &str,
    context: &L,
    config: &ProjectionConfig,
) -> Marker {
    Marker::register(&JsxBlock::new(block_text), context, config)
}
