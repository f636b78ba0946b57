//! evmatch - Content-based event pattern matching
//!
//! Decides whether a structured event satisfies a declarative pattern, the question a
//! publish/subscribe router asks for every (subscription, event) pair.
//!
//! # Architecture
//!
//! - [`Value`] / [`Document`] — The event, converted once into a closed tagged union
//! - [`FieldPath`] — Resolves a pattern key (dotted, optionally wildcarded) to
//!   [`MatchingData`] candidates, where `Absent` is a normal outcome
//! - [`InputMatcher`] — One comparator per operator, never fails on type mismatch
//! - [`Comparison`] / [`ValueMatch`] — Closed union over the operators
//! - [`Pattern`] — Recursive AND over entries, with explicit `$or` groups
//! - [`EnvelopeSchema`] — Serialized event + pattern entry point with envelope validation
//!
//! # Key Invariants
//!
//! 1. **Evaluation is total**: once a pattern compiles, [`Pattern::matches`] always
//!    returns a boolean. Errors exist only at compile and envelope-validation time.
//!
//! 2. **Absent is not null**: a missing path resolves to [`MatchingData::Absent`].
//!    `exists` distinguishes the two; a `null` literal matches both.
//!
//! 3. **Arrays fan out**: a literal or comparison matches an array value when it
//!    matches the whole value or any element.
//!
//! # Example
//!
//! ```
//! use evmatch::prelude::*;
//!
//! let pattern: Pattern = r#"{
//!     "source": ["aws.ec2"],
//!     "detail": { "state": ["running"], "cpu": [{ "numeric": [">=", 2] }] }
//! }"#.parse().unwrap();
//!
//! let event = Value::from(serde_json::json!({
//!     "source": "aws.ec2",
//!     "detail": { "state": "running", "cpu": 4 }
//! }));
//!
//! assert!(matches(event.as_document().unwrap(), &pattern));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod comparison;
mod compiler;
mod envelope;
mod field_path;
mod input_matcher;
mod matching_data;
pub mod numeric;
mod pattern;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use comparison::{Comparison, ValueMatch, OPERATOR_KEYS};
pub use compiler::OR_KEY;
pub use field_path::{FieldPath, PATH_SEPARATOR, WILDCARD_MARKER};
pub use input_matcher::InputMatcher;
pub use matching_data::{Document, Literal, MatchingData, Value};
pub use pattern::{matches, FieldRule, Pattern, PatternEntry};

// Envelope entry point
pub use envelope::{match_envelope, EnvelopeRequest, EnvelopeSchema, DETAIL_FIELD};

// Trace types
pub use trace::{CandidateTrace, EntryTrace, PatternTrace};

// Concrete matchers
pub use input_matcher::{
    AnythingButMatcher, EqualsIgnoreCaseMatcher, ExistsMatcher, LiteralMatcher, NumericMatcher,
    PrefixMatcher, SuffixMatcher, WildcardMatcher,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use evmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Entry points
        match_envelope,
        matches,
        // Core types
        Comparison,
        Document,
        EnvelopeRequest,
        EnvelopeSchema,
        FieldPath,
        FieldRule,
        InputMatcher,
        Literal,
        // Errors
        MatcherError,
        MatchingData,
        Pattern,
        PatternEntry,
        // Trace types
        PatternTrace,
        Value,
        ValueMatch,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from pattern compilation and envelope validation.
///
/// Evaluation itself never fails: a comparator applied to the wrong type simply does
/// not match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// Input text is not valid JSON.
    #[error("{input} is not valid JSON: {reason}")]
    InvalidJson {
        /// Which input failed (`"event"` or `"pattern"`).
        input: &'static str,
        /// The parser's message.
        reason: String,
    },

    /// Input is valid JSON but not an object.
    #[error("{input} must be a JSON object, found {found}")]
    NotAnObject {
        /// Which input failed (`"event"` or `"pattern"`).
        input: &'static str,
        /// The JSON type found instead.
        found: &'static str,
    },

    /// A pattern key has a structurally invalid value.
    #[error("invalid pattern at \"{key}\": {reason}")]
    InvalidRule {
        /// Dotted location of the key in the pattern.
        key: String,
        /// What was wrong.
        reason: String,
    },

    /// A comparison object names more than one operator.
    #[error(
        "comparison at \"{key}\" has several operators ({}); use one operator per object",
        operators.join(", ")
    )]
    AmbiguousComparison {
        /// Dotted location of the key in the pattern.
        key: String,
        /// The operator keys found, in pattern order.
        operators: Vec<String>,
    },

    /// A glob could not be compiled.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The glob or key that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// The event lacks mandatory envelope fields.
    #[error("event is missing required fields: {}", missing.join(", "))]
    MissingEventFields {
        /// Every missing (or `null`) field, in schema order.
        missing: Vec<String>,
    },

    /// The pattern lacks mandatory keys.
    #[error("pattern is missing required fields: {}", missing.join(", "))]
    MissingPatternFields {
        /// Every missing key, in schema order.
        missing: Vec<String>,
    },

    /// The event's `detail` field is not an object.
    #[error("event \"detail\" must be an object, found {found}")]
    InvalidDetail {
        /// The type found instead.
        found: &'static str,
    },
}
