//! Opportunistic context projection.
//!
//! Given a rendering context and the expressions a JSX block references, build the
//! smallest nested mapping that still satisfies every expression:
//!
//! ```text
//! context:     {"location": {"full_name": "New York", "kind": "city"}, "list": [1, 2, 3]}
//! expressions: ["location.full_name", "location", "list.0"]
//! projection:  {"list": {"0": 1}, "location": {"full_name": "New York"}}
//! ```
//!
//! Rules:
//!
//! - Intermediate levels are created as mappings. A non-mapping value already sitting
//!   at an intermediate key is replaced, so a deeper path always wins structurally.
//! - A terminal key that already holds a value is left alone. In particular, once
//!   `location` is a mapping (because `location.full_name` came first), resolving
//!   `location` on its own is dropped instead of clobbering the nested entry.
//! - A path that does not resolve is written as the configured fallback string, and
//!   projection carries on with the next expression.
//!
//! Output keys are sorted, so the serialized form is byte-for-byte stable.

use serde_json::{Map, Value};
use strsim::levenshtein;

use super::expressions::Expression;
use super::resolve::{Lookup, Resolution, resolve};

/// Placeholder in [`ProjectionConfig::string_if_invalid`] replaced by the dotted path.
pub const PATH_PLACEHOLDER: &str = "%s";

/// Maximum Levenshtein distance, as a percentage of the key length, for a candidate
/// to be offered as a suggestion in missing-path diagnostics.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Settings controlling projection, passed explicitly at call time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionConfig {
    string_if_invalid: String,
}

impl ProjectionConfig {
    /// Create a configuration with the given missing-value string.
    pub fn new(string_if_invalid: impl Into<String>) -> Self {
        Self {
            string_if_invalid: string_if_invalid.into(),
        }
    }

    /// The raw missing-value string, possibly containing [`PATH_PLACEHOLDER`].
    #[must_use]
    pub fn string_if_invalid(&self) -> &str {
        &self.string_if_invalid
    }

    /// Value written for an expression that cannot be resolved.
    #[must_use]
    pub fn missing_value(&self, expression: &Expression) -> Value {
        if self.string_if_invalid.contains(PATH_PLACEHOLDER) {
            Value::String(self.string_if_invalid.replacen(PATH_PLACEHOLDER, &expression.path(), 1))
        } else {
            Value::String(self.string_if_invalid.clone())
        }
    }
}

/// Project `context` down to the values referenced by `expressions`.
pub fn project<L: Lookup + ?Sized>(
    context: &L,
    expressions: &[Expression],
    config: &ProjectionConfig,
) -> Map<String, Value> {
    let mut projected = Map::new();

    for expression in expressions {
        let value = match resolve(context, expression) {
            Resolution::Found(value) => value.into_json(),
            Resolution::Missing {
                segment,
                candidates,
            } => {
                log_missing(expression, segment, &candidates);
                config.missing_value(expression)
            }
        };
        set_nested(&mut projected, expression.segments(), value);
    }

    projected
}

/// Project and serialize to compact JSON.
pub fn serialize_projection<L: Lookup + ?Sized>(
    context: &L,
    expressions: &[Expression],
    config: &ProjectionConfig,
) -> String {
    Value::Object(project(context, expressions, config)).to_string()
}

/// Write `value` at the nested location named by `segments`.
///
/// Intermediate non-mappings are replaced by mappings; an existing terminal entry is
/// never overwritten.
pub fn set_nested(target: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((key, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        if target.contains_key(key) {
            tracing::trace!("Keeping existing value at '{}'", key);
        } else {
            target.insert(key.clone(), value);
        }
        return;
    }

    let slot = target.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(child) = slot {
        set_nested(child, rest, value);
    }
}

fn log_missing(expression: &Expression, segment: usize, candidates: &[String]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let missing = expression.segments().get(segment).map(String::as_str).unwrap_or_default();
    let suggestions = find_similar(missing, candidates);
    if suggestions.is_empty() {
        tracing::debug!(
            "Context path '{}' not found (stopped at '{}'), using fallback",
            expression,
            missing
        );
    } else {
        tracing::debug!(
            "Context path '{}' not found (stopped at '{}'), using fallback. Did you mean: {}?",
            expression,
            missing,
            suggestions.join(", ")
        );
    }
}

/// Closest candidates by edit distance, at most three.
fn find_similar(target: &str, candidates: &[String]) -> Vec<String> {
    let mut scored: Vec<_> =
        candidates.iter().map(|candidate| (candidate, levenshtein(target, candidate))).collect();
    scored.sort_by_key(|(candidate, dist)| (*dist, (*candidate).clone()));

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(candidate, _)| candidate.clone())
        .collect()
}
