//! Evaluation trace types for debugging pattern behavior.
//!
//! Trace types mirror the [`Pattern`](crate::Pattern) structure but capture evaluation
//! results instead of constraints. Use
//! [`Pattern::evaluate_with_trace()`](crate::Pattern::evaluate_with_trace) to see which
//! keys resolved to what and which alternatives matched.
//!
//! # Example
//!
//! ```
//! use evmatch::{Pattern, Value};
//!
//! let pattern: Pattern = r#"{ "a": [1], "b": [2] }"#.parse().unwrap();
//! let doc = Value::from(serde_json::json!({ "a": 1, "b": 3 }));
//! let trace = pattern.evaluate_with_trace(doc.as_document().unwrap());
//! assert!(!trace.matched());
//! assert!(trace.entries[0].matched());
//! assert!(!trace.entries[1].matched());
//! ```

use std::fmt;

/// Trace of a [`Pattern`](crate::Pattern) evaluation.
///
/// # INV: `matched` == `matches()` result
///
/// All entries are evaluated (no short-circuit), but `matched` always equals what
/// [`Pattern::matches()`](crate::Pattern::matches) returns for the same document.
#[derive(Debug, Clone)]
pub struct PatternTrace {
    /// Whether every entry matched.
    pub matched: bool,
    /// Trace of each entry, in pattern order.
    pub entries: Vec<EntryTrace>,
}

impl PatternTrace {
    /// Get the overall match result.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for entry in &self.entries {
            entry.write_indented(f, depth)?;
        }
        Ok(())
    }
}

/// Trace of one pattern entry.
#[derive(Debug, Clone)]
pub enum EntryTrace {
    /// A field key.
    Field {
        /// Whether any candidate matched.
        matched: bool,
        /// The key as written in the pattern.
        key: String,
        /// One trace per resolved candidate (a single `Absent` when nothing resolved).
        candidates: Vec<CandidateTrace>,
    },
    /// An `$or` group.
    OrGroup {
        /// Whether any alternative matched.
        matched: bool,
        /// Trace of each alternative (all evaluated, no short-circuit).
        alternatives: Vec<PatternTrace>,
    },
}

impl EntryTrace {
    /// Get the match result of this entry.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Field { matched, .. } | Self::OrGroup { matched, .. } => *matched,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Self::Field {
                matched,
                key,
                candidates,
            } => {
                writeln!(f, "{pad}{} {key}", mark(*matched))?;
                for candidate in candidates {
                    writeln!(f, "{pad}  {} {}", mark(candidate.matched), candidate.data)?;
                    if let Some(nested) = &candidate.nested {
                        nested.write_indented(f, depth + 2)?;
                    }
                }
            }
            Self::OrGroup {
                matched,
                alternatives,
            } => {
                writeln!(f, "{pad}{} $or", mark(*matched))?;
                for (index, alternative) in alternatives.iter().enumerate() {
                    writeln!(f, "{pad}  {} [{index}]", mark(alternative.matched))?;
                    alternative.write_indented(f, depth + 2)?;
                }
            }
        }
        Ok(())
    }
}

/// Trace of one candidate value for a field key.
#[derive(Debug, Clone)]
pub struct CandidateTrace {
    /// Whether the field rule matched this candidate.
    pub matched: bool,
    /// The candidate (Debug format).
    pub data: String,
    /// Trace of the nested pattern, when the rule is nested and the candidate is a document.
    pub nested: Option<PatternTrace>,
}

fn mark(matched: bool) -> &'static str {
    if matched {
        "+"
    } else {
        "-"
    }
}

impl fmt::Display for PatternTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} pattern", mark(self.matched))?;
        self.write_indented(f, 1)
    }
}
