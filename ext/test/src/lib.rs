//! evmatch-test: Test helpers and conformance fixtures
//!
//! Provides a small event builder for hand-written tests and, behind the `fixtures`
//! feature, the YAML fixture runner used by the conformance suite.
//!
//! # Example
//!
//! ```
//! use evmatch_test::prelude::*;
//!
//! // Dotted keys build nested documents
//! let event = TestEvent::new()
//!     .with("source", "aws.ec2")
//!     .with("detail.state", "running");
//!
//! let pattern: Pattern = r#"{ "detail": { "state": ["running"] } }"#.parse().unwrap();
//! assert!(matches(event.document(), &pattern));
//! ```

use evmatch::{Document, Value, PATH_SEPARATOR};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Test event: a document assembled key by key.
///
/// Keys containing `.` create (or reuse) intermediate documents, so
/// `with("detail.state", "running")` yields `{"detail": {"state": "running"}}`.
#[derive(Debug, Clone, Default)]
pub struct TestEvent {
    root: Document,
}

impl TestEvent {
    /// Create an empty test event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dotted path (builder pattern).
    ///
    /// A non-document value in the way is replaced by an empty document.
    #[must_use]
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        insert(&mut self.root, path, value.into());
        self
    }

    /// Borrow the assembled document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.root
    }

    /// Take the assembled document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.root
    }
}

fn insert(doc: &mut Document, path: &str, value: Value) {
    let Some((head, rest)) = path.split_once(PATH_SEPARATOR) else {
        doc.insert(path.to_string(), value);
        return;
    };

    let child = doc
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Document::new()));
    if !child.is_document() {
        *child = Value::Object(Document::new());
    }
    if let Value::Object(inner) = child {
        insert(inner, rest, value);
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::TestEvent;
    pub use evmatch::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use evmatch::{matches, FieldPath, MatchingData, Pattern};

    #[test]
    fn test_event_builder() {
        let event = TestEvent::new()
            .with("source", "aws.ec2")
            .with("detail.state", "running")
            .with("detail.cpu", 4.0);

        let doc = event.document();
        assert_eq!(doc.get("source"), Some(&Value::from("aws.ec2")));

        let detail = doc.get("detail").and_then(Value::as_document).unwrap();
        assert_eq!(detail.get("state"), Some(&Value::from("running")));
        assert_eq!(detail.get("cpu"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn test_event_overwrites_scalar_on_the_path() {
        let event = TestEvent::new().with("a", "x").with("a.b", true);
        let path = FieldPath::parse("a.b").unwrap();
        assert_eq!(
            path.resolve_single(event.document()),
            MatchingData::Present(&Value::Bool(true))
        );
    }

    #[test]
    fn test_event_keeps_insertion_order() {
        let doc = TestEvent::new()
            .with("z", 1.0)
            .with("a", 2.0)
            .into_document();
        let keys: Vec<_> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn test_full_pattern() {
        let event = TestEvent::new()
            .with("source", "com.example.orders")
            .with("detail.total", "250")
            .with("detail.currency", "EUR");

        let pattern: Pattern = r#"{
            "source": [{ "prefix": "com.example." }],
            "detail": {
                "total": [{ "numeric": [">", 100] }],
                "currency": [{ "anything-but": ["USD"] }]
            }
        }"#
        .parse()
        .unwrap();

        assert!(matches(event.document(), &pattern));

        let cheap = event.with("detail.total", "99.5");
        assert!(!matches(cheap.document(), &pattern));
    }
}
