//! `Value` and `MatchingData` — The document model patterns are evaluated against
//!
//! Documents arrive as arbitrary JSON. They are converted once into [`Value`], a closed
//! tagged union, so every resolution and comparison point matches over a fixed set of
//! variants instead of probing dynamically-shaped data.
//!
//! [`MatchingData`] is what flows from path resolution into the comparators: either a
//! borrowed [`Value`] or [`MatchingData::Absent`] when the path does not exist.
//! `Absent` is distinct from an explicit `null`.

use indexmap::IndexMap;
use serde::Deserialize;

/// An insertion-ordered object. Order is preserved from the serialized input so that
/// wildcard path expansion yields values in encounter order.
pub type Document = IndexMap<String, Value>;

/// A document value.
///
/// # Example
///
/// ```
/// use evmatch::Value;
///
/// let value = Value::from(serde_json::json!({ "price": 15, "tags": ["a", "b"] }));
/// let doc = value.as_document().unwrap();
/// assert_eq!(doc["price"].as_number(), Some(15.0));
/// assert!(doc["tags"].is_array());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    /// Explicit JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Any JSON number, widened to `f64`.
    Number(f64),
    /// String value.
    String(String),
    /// Ordered sequence; elements may be heterogeneous.
    Array(Vec<Value>),
    /// Nested document.
    Object(Document),
}

impl Value {
    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is the `Array` variant.
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` if this is the `Object` variant.
    #[inline]
    #[must_use]
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a number. Strings are not coerced here;
    /// see [`coerce`](crate::numeric::coerce) for that.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an array slice.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a nested document.
    #[inline]
    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns a static string describing the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            // Without `arbitrary_precision` every serde_json number has an f64 view.
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The result of resolving one pattern key against a document.
///
/// # Example
///
/// ```
/// use evmatch::{MatchingData, Value};
///
/// let value = Value::from("hello");
/// let data = MatchingData::Present(&value);
/// assert_eq!(data.as_str(), Some("hello"));
/// assert!(!data.is_absent());
/// assert!(MatchingData::Absent.is_absent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchingData<'a> {
    /// The path does not exist in the document.
    Absent,
    /// The path resolved to a value (which may itself be `null`).
    Present(&'a Value),
}

impl<'a> MatchingData<'a> {
    /// Returns `true` if the path did not resolve.
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the resolved value, if any.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Absent => None,
            Self::Present(v) => Some(v),
        }
    }

    /// Try to get the resolved value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    /// Try to get the resolved value as a number, without coercion.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        self.value().and_then(Value::as_number)
    }

    /// Try to get the resolved value as an array slice.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&'a [Value]> {
        self.value().and_then(Value::as_array)
    }

    /// Try to get the resolved value as a nested document.
    #[inline]
    #[must_use]
    pub fn as_document(&self) -> Option<&'a Document> {
        self.value().and_then(Value::as_document)
    }
}

impl<'a> From<&'a Value> for MatchingData<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Present(value)
    }
}

/// A scalar a pattern can compare against by strict equality.
///
/// Arrays and documents never appear as literals: in a pattern an array is a list of
/// alternatives and an object is either a comparison or a nested pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(f64),
    /// String literal.
    String(String),
}

impl Literal {
    /// Strict equality against a single document value.
    ///
    /// Same variant and equal payload; numbers compare as `f64`. Arrays and
    /// documents are never equal to a literal.
    #[must_use]
    pub fn strict_eq(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Bool(a), Value::Bool(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => a == b,
            (Self::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Convert a JSON scalar into a literal. Returns `None` for arrays and objects.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}
