//! Context values and the resolution primitive used by the projector.
//!
//! A rendering context is modelled as a tagged tree, [`ContextValue`], rather than
//! being inspected at runtime: scalars, mappings, sequences, opaque objects exposing
//! attributes, and zero-argument callables. Resolution walks a dotted
//! [`Expression`] through that tree one segment at a time using the [`Lookup`]
//! capabilities in a fixed order:
//!
//! 1. item access (mapping key, or sequence index for numeric segments)
//! 2. attribute access
//!
//! A callable reached at any step is invoked and its result replaces it.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::expressions::Expression;

/// A zero-argument callable stored in the context.
pub type Callable = Arc<dyn Fn() -> ContextValue + Send + Sync>;

/// An object that exposes named attributes to templates.
///
/// Objects are resolvable but never serialized themselves: when a projection ends
/// on an object, it is written as `null`. Reference one of its attributes instead.
pub trait ContextObject: fmt::Debug + Send + Sync {
    /// Return the attribute called `name`, if the object has one.
    fn attribute(&self, name: &str) -> Option<ContextValue>;

    /// Attribute names, used only for "did you mean" diagnostics.
    fn attribute_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A node of the rendering context.
#[derive(Clone)]
pub enum ContextValue {
    /// `null`, booleans, numbers and strings
    Scalar(Value),
    /// String-keyed mapping
    Mapping(BTreeMap<String, ContextValue>),
    /// Ordered sequence, addressed by numeric segments
    Sequence(Vec<ContextValue>),
    /// Attribute bag
    Object(Arc<dyn ContextObject>),
    /// Invoked on access; the result substitutes for the callable
    Callable(Callable),
}

impl ContextValue {
    /// An empty mapping, the neutral root context.
    #[must_use]
    pub fn empty() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// Build a mapping from key/value pairs.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Wrap a closure as a context callable.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn() -> ContextValue + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Wrap an attribute-bearing object.
    pub fn object<O: ContextObject + 'static>(object: O) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Invoke a callable once; any other value is returned unchanged.
    #[must_use]
    pub fn invoke(self) -> Self {
        match self {
            Self::Callable(f) => f(),
            other => other,
        }
    }

    /// Convert into JSON for transport.
    ///
    /// Callables are invoked, objects become `null`.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Scalar(value) => value,
            Self::Mapping(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into_json())).collect())
            }
            Self::Sequence(items) => {
                Value::Array(items.into_iter().map(ContextValue::into_json).collect())
            }
            Self::Callable(f) => f().into_json(),
            Self::Object(_) => Value::Null,
        }
    }

    /// Whether this value is a mapping.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<tera::Context> for ContextValue {
    fn from(context: tera::Context) -> Self {
        Self::from(context.into_json())
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Scalar(Value::String(value))
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Segment-wise access capabilities of a context node.
pub trait Lookup {
    /// Mapping key or sequence index access.
    fn lookup_item(&self, key: &str) -> Option<ContextValue>;

    /// Attribute access.
    fn lookup_attr(&self, name: &str) -> Option<ContextValue>;

    /// Names reachable from this node, for diagnostics only.
    fn known_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Item access first, then attribute access.
    fn lookup(&self, segment: &str) -> Option<ContextValue> {
        self.lookup_item(segment).or_else(|| self.lookup_attr(segment))
    }
}

impl Lookup for ContextValue {
    fn lookup_item(&self, key: &str) -> Option<ContextValue> {
        match self {
            Self::Mapping(map) => map.get(key).cloned(),
            Self::Sequence(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            _ => None,
        }
    }

    fn lookup_attr(&self, name: &str) -> Option<ContextValue> {
        match self {
            Self::Object(object) => object.attribute(name),
            _ => None,
        }
    }

    fn known_keys(&self) -> Vec<String> {
        match self {
            Self::Mapping(map) => map.keys().cloned().collect(),
            Self::Object(object) => object.attribute_names(),
            _ => Vec::new(),
        }
    }
}

impl Lookup for Value {
    fn lookup_item(&self, key: &str) -> Option<ContextValue> {
        match self {
            Value::Object(map) => map.get(key).cloned().map(ContextValue::from),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .map(ContextValue::from),
            _ => None,
        }
    }

    fn lookup_attr(&self, _name: &str) -> Option<ContextValue> {
        None
    }

    fn known_keys(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

impl Lookup for tera::Context {
    fn lookup_item(&self, key: &str) -> Option<ContextValue> {
        self.get(key).cloned().map(ContextValue::from)
    }

    fn lookup_attr(&self, _name: &str) -> Option<ContextValue> {
        None
    }
}

/// Outcome of resolving an expression.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Every segment resolved
    Found(ContextValue),
    /// Resolution stopped at `segment` (0-based index into the expression)
    Missing {
        /// Index of the first segment that could not be resolved
        segment: usize,
        /// Names available where resolution stopped
        candidates: Vec<String>,
    },
}

/// Resolve `expression` against `root`.
///
/// Never fails loudly: an unresolvable segment yields [`Resolution::Missing`].
pub fn resolve<L: Lookup + ?Sized>(root: &L, expression: &Expression) -> Resolution {
    let segments = expression.segments();
    let Some((first, rest)) = segments.split_first() else {
        return Resolution::Missing {
            segment: 0,
            candidates: Vec::new(),
        };
    };

    let mut current = match root.lookup(first) {
        Some(value) => value.invoke(),
        None => {
            return Resolution::Missing {
                segment: 0,
                candidates: root.known_keys(),
            };
        }
    };

    for (offset, segment) in rest.iter().enumerate() {
        current = match current.lookup(segment) {
            Some(value) => value.invoke(),
            None => {
                return Resolution::Missing {
                    segment: offset + 1,
                    candidates: current.known_keys(),
                };
            }
        };
    }

    Resolution::Found(current)
}
