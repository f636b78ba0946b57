//! Pattern — Recursive evaluation of a pattern tree against a document
//!
//! A [`Pattern`] is a list of entries that must all match (implicit AND):
//!
//! - [`PatternEntry::Field`] resolves a key path and matches the candidate value(s)
//!   against a [`FieldRule`]: a leaf array of alternatives, or a nested pattern.
//! - [`PatternEntry::OrGroup`] matches if any alternative pattern matches the same scope.
//!
//! Evaluation is pure and total: it never allocates beyond candidate lists, never
//! mutates its inputs, and always returns a boolean.

use crate::{
    CandidateTrace, Document, EntryTrace, FieldPath, InputMatcher, MatchingData, PatternTrace,
    ValueMatch,
};
use log::{debug, trace};

/// A compiled pattern.
///
/// # Example
///
/// ```
/// use evmatch::{Pattern, Value};
///
/// let pattern: Pattern = r#"{ "detail": { "state": ["running"] } }"#.parse().unwrap();
/// let event = Value::from(serde_json::json!({ "detail": { "state": "running" } }));
/// assert!(pattern.matches(event.as_document().unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    entries: Vec<PatternEntry>,
}

/// One constraint in a [`Pattern`].
#[derive(Debug, Clone)]
pub enum PatternEntry {
    /// Resolve `path` and match the candidate value(s) against `rule`.
    Field {
        /// The key path, possibly containing wildcards.
        path: FieldPath,
        /// How to match the resolved value(s).
        rule: FieldRule,
    },
    /// At least one alternative must match the enclosing document.
    OrGroup(Vec<Pattern>),
}

/// How a resolved field is matched.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Leaf array: any alternative may match.
    AnyOf(Vec<ValueMatch>),
    /// Nested pattern: the value must be a document matching the pattern.
    Nested(Pattern),
}

impl Pattern {
    /// Create a pattern from entries.
    #[must_use]
    pub fn new(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    /// A pattern with no entries; matches every document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The entries of this pattern, in pattern order.
    #[must_use]
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this pattern constrains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for a top-level field key, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldRule> {
        self.entries.iter().find_map(|entry| match entry {
            PatternEntry::Field { path, rule } if path.as_str() == key => Some(rule),
            _ => None,
        })
    }

    /// Evaluate this pattern against a document.
    ///
    /// All entries must match; evaluation stops at the first failing entry.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.entries.iter().all(|entry| entry.matches(doc))
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`matches()`](Self::matches), this does NOT short-circuit: every entry,
    /// candidate and `$or` alternative is evaluated. A candidate's value list still
    /// stops at its first hit, so leaf alternatives are not itemized. The `matched`
    /// result is still identical.
    #[must_use]
    pub fn evaluate_with_trace(&self, doc: &Document) -> PatternTrace {
        let entries: Vec<EntryTrace> = self
            .entries
            .iter()
            .map(|entry| entry.evaluate_with_trace(doc))
            .collect();
        PatternTrace {
            matched: entries.iter().all(EntryTrace::matched),
            entries,
        }
    }

    /// Depth of the pattern tree. An empty pattern has depth 1.
    ///
    /// Informational only; evaluation imposes no depth limit.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .entries
            .iter()
            .map(|entry| match entry {
                PatternEntry::Field {
                    rule: FieldRule::Nested(p),
                    ..
                } => p.depth(),
                PatternEntry::Field { .. } => 0,
                PatternEntry::OrGroup(alternatives) => {
                    alternatives.iter().map(Pattern::depth).max().unwrap_or(0)
                }
            })
            .max()
            .unwrap_or(0)
    }
}

impl PatternEntry {
    /// Create a field entry.
    #[must_use]
    pub fn field(path: FieldPath, rule: FieldRule) -> Self {
        Self::Field { path, rule }
    }

    /// Evaluate this entry against a document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Field { path, rule } => {
                let matched = path
                    .resolve(doc)
                    .into_iter()
                    .any(|candidate| rule.matches(candidate));
                trace!("field {path}: matched={matched}");
                matched
            }
            Self::OrGroup(alternatives) => {
                let matched = alternatives.iter().any(|p| p.matches(doc));
                trace!("$or of {}: matched={matched}", alternatives.len());
                matched
            }
        }
    }

    fn evaluate_with_trace(&self, doc: &Document) -> EntryTrace {
        match self {
            Self::Field { path, rule } => {
                let candidates: Vec<_> = path
                    .resolve(doc)
                    .into_iter()
                    .map(|candidate| rule.evaluate_with_trace(candidate))
                    .collect();
                EntryTrace::Field {
                    matched: candidates.iter().any(|c| c.matched),
                    key: path.to_string(),
                    candidates,
                }
            }
            Self::OrGroup(alternatives) => {
                let alternatives: Vec<PatternTrace> = alternatives
                    .iter()
                    .map(|p| p.evaluate_with_trace(doc))
                    .collect();
                EntryTrace::OrGroup {
                    matched: alternatives.iter().any(PatternTrace::matched),
                    alternatives,
                }
            }
        }
    }
}

impl FieldRule {
    /// Match one candidate value.
    ///
    /// A nested pattern requires the candidate to be a document; anything else,
    /// including an absent field, fails.
    #[must_use]
    pub fn matches(&self, candidate: MatchingData<'_>) -> bool {
        match self {
            Self::AnyOf(alternatives) => alternatives.iter().any(|m| m.matches(candidate)),
            Self::Nested(pattern) => candidate.as_document().is_some_and(|d| pattern.matches(d)),
        }
    }

    fn evaluate_with_trace(&self, candidate: MatchingData<'_>) -> CandidateTrace {
        let data = format!("{candidate:?}");
        match self {
            Self::AnyOf(_) => CandidateTrace {
                matched: self.matches(candidate),
                data,
                nested: None,
            },
            Self::Nested(pattern) => {
                let nested = candidate.as_document().map(|d| pattern.evaluate_with_trace(d));
                CandidateTrace {
                    matched: nested.as_ref().is_some_and(PatternTrace::matched),
                    data,
                    nested,
                }
            }
        }
    }
}

/// Direct match: does `pattern` match `doc`?
///
/// # Example
///
/// ```
/// use evmatch::{matches, Pattern, Value};
///
/// let doc = Value::from(serde_json::json!({ "price": 15 }));
/// let pattern: Pattern = r#"{ "price": [{ "numeric": [">", 10, "<=", 20] }] }"#.parse().unwrap();
/// assert!(matches(doc.as_document().unwrap(), &pattern));
/// ```
#[must_use]
pub fn matches(doc: &Document, pattern: &Pattern) -> bool {
    let matched = pattern.matches(doc);
    debug!("pattern with {} entries: matched={matched}", pattern.len());
    matched
}
