//! `InputMatcher` — The comparator suite
//!
//! Every comparator takes one resolved value ([`MatchingData`], possibly `Absent`) and
//! returns a boolean. Comparators never fail: a value of the wrong type simply does not
//! match.
//!
//! # Available Matchers
//!
//! - [`LiteralMatcher`] — Strict equality with a scalar (or any element of an array)
//! - [`ExistsMatcher`] — Presence / absence of the field
//! - [`AnythingButMatcher`] — Exclusion list
//! - [`EqualsIgnoreCaseMatcher`] — Case-insensitive string equality
//! - [`NumericMatcher`] — Numeric range
//! - [`PrefixMatcher`] — String prefix
//! - [`SuffixMatcher`] — String suffix
//! - [`WildcardMatcher`] — Anchored glob with `*` and `?`

use crate::numeric::{coerce, NumericCondition};
use crate::{Literal, MatcherError, MatchingData, Value};
use std::fmt::Debug;

/// Matches against one resolved value.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so compiled patterns can be shared
/// across threads.
///
/// # Example
///
/// ```
/// use evmatch::{InputMatcher, MatchingData, PrefixMatcher, Value};
///
/// let matcher = PrefixMatcher::new("Will");
/// assert!(matcher.matches(MatchingData::Present(&Value::from("William"))));
/// assert!(!matcher.matches(MatchingData::Absent));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `InputMatcher`",
    label = "this type cannot match against MatchingData",
    note = "implement `matches(&self, MatchingData<'_>) -> bool`"
)]
pub trait InputMatcher: Send + Sync + Debug {
    /// Check if the given value matches.
    ///
    /// Returns `false` if the value type is incompatible with this matcher.
    fn matches(&self, value: MatchingData<'_>) -> bool;
}

// Blanket implementation for boxed InputMatchers
#[diagnostic::do_not_recommend]
impl InputMatcher for Box<dyn InputMatcher> {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        (**self).matches(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Literal equality
// ═══════════════════════════════════════════════════════════════════════════════

/// Strict equality with a scalar literal.
///
/// Matches when the value equals the literal, or when the value is an array containing
/// an element equal to the literal. A `null` literal also matches an absent field.
///
/// # Example
///
/// ```
/// use evmatch::{InputMatcher, Literal, LiteralMatcher, MatchingData, Value};
///
/// let matcher = LiteralMatcher::new(Literal::String("John".into()));
/// let tags = Value::Array(vec![Value::from("Jane"), Value::from("John")]);
/// assert!(matcher.matches(MatchingData::Present(&Value::from("John"))));
/// assert!(matcher.matches(MatchingData::Present(&tags)));
/// assert!(!matcher.matches(MatchingData::Present(&Value::from("john"))));
///
/// let null = LiteralMatcher::new(Literal::Null);
/// assert!(null.matches(MatchingData::Absent));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMatcher {
    expected: Literal,
}

impl LiteralMatcher {
    /// Create a new literal matcher.
    #[must_use]
    pub fn new(expected: Literal) -> Self {
        Self { expected }
    }

    /// Returns the expected literal.
    #[must_use]
    pub fn expected(&self) -> &Literal {
        &self.expected
    }
}

impl InputMatcher for LiteralMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        match value {
            MatchingData::Absent => self.expected == Literal::Null,
            MatchingData::Present(v) => {
                self.expected.strict_eq(v)
                    || v.as_array()
                        .is_some_and(|items| items.iter().any(|item| self.expected.strict_eq(item)))
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Presence
// ═══════════════════════════════════════════════════════════════════════════════

/// `exists`: matches when presence of the field equals `expected`.
///
/// An explicit `null` counts as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistsMatcher {
    expected: bool,
}

impl ExistsMatcher {
    /// Create a new exists matcher.
    #[must_use]
    pub fn new(expected: bool) -> Self {
        Self { expected }
    }
}

impl InputMatcher for ExistsMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        self.expected != value.is_absent()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Exclusion
// ═══════════════════════════════════════════════════════════════════════════════

/// `anything-but`: matches unless the value strictly equals one of the excluded literals.
///
/// Only strings, numbers and booleans can be excluded. `null`, arrays, documents and
/// absent fields always pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AnythingButMatcher {
    excluded: Vec<Literal>,
}

impl AnythingButMatcher {
    /// Create a new exclusion matcher.
    #[must_use]
    pub fn new(excluded: Vec<Literal>) -> Self {
        Self { excluded }
    }

    /// Returns the excluded literals.
    #[must_use]
    pub fn excluded(&self) -> &[Literal] {
        &self.excluded
    }
}

impl InputMatcher for AnythingButMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        match value.value() {
            Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                !self.excluded.iter().any(|literal| literal.strict_eq(v))
            }
            _ => true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// String Matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// `equals-ignore-case`: case-folded string equality.
///
/// The expected value is folded once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsIgnoreCaseMatcher {
    folded: String,
}

impl EqualsIgnoreCaseMatcher {
    /// Create a new case-insensitive equality matcher.
    pub fn new(expected: impl AsRef<str>) -> Self {
        Self {
            folded: expected.as_ref().to_lowercase(),
        }
    }
}

impl InputMatcher for EqualsIgnoreCaseMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        value.as_str().is_some_and(|s| s.to_lowercase() == self.folded)
    }
}

/// `prefix`: case-sensitive string prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    /// Create a new prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the prefix being matched.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl InputMatcher for PrefixMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        value.as_str().is_some_and(|s| s.starts_with(&self.prefix))
    }
}

/// `suffix`: case-sensitive string suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatcher {
    suffix: String,
}

impl SuffixMatcher {
    /// Create a new suffix matcher.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Returns the suffix being matched.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl InputMatcher for SuffixMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        value.as_str().is_some_and(|s| s.ends_with(&self.suffix))
    }
}

/// `wildcard`: glob match over the entire string.
///
/// `*` matches zero or more characters and `?` exactly one. Every other character is
/// literal. The glob is compiled once into an anchored regex (linear-time matching).
///
/// # Example
///
/// ```
/// use evmatch::{InputMatcher, MatchingData, Value, WildcardMatcher};
///
/// let matcher = WildcardMatcher::new("*.i*.l/*i.?.m").unwrap();
/// assert!(matcher.matches(MatchingData::Present(&Value::from("w.i.l.l//i.a.m"))));
///
/// let anchored = WildcardMatcher::new("i.*.l/*i.?.m").unwrap();
/// assert!(!anchored.matches(MatchingData::Present(&Value::from("w.i.l.l//i.a.m"))));
/// ```
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    glob: String,
    regex: regex::Regex,
}

impl WildcardMatcher {
    /// Compile a glob.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if the compiled regex is rejected
    /// (for example when it exceeds the regex size limit).
    pub fn new(glob: &str) -> Result<Self, MatcherError> {
        let regex = regex::Regex::new(&glob_to_regex(glob)).map_err(|e| {
            MatcherError::InvalidPattern {
                pattern: glob.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// Returns the glob as written.
    #[must_use]
    pub fn glob(&self) -> &str {
        &self.glob
    }
}

impl PartialEq for WildcardMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}

impl InputMatcher for WildcardMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        value.as_str().is_some_and(|s| self.regex.is_match(s))
    }
}

/// Escape every regex metacharacter, then substitute the two glob wildcards.
///
/// `(?s)` lets both wildcards match line breaks, as key-segment globs do.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 12);
    out.push_str("(?s)^");
    let mut literal = String::new();
    for c in glob.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// Numeric Matcher
// ═══════════════════════════════════════════════════════════════════════════════

/// `numeric`: every condition must hold for the coerced value.
///
/// If the value cannot be coerced to a finite number the matcher fails, regardless of
/// the conditions.
///
/// # Example
///
/// ```
/// use evmatch::numeric::{NumericCondition, NumericOp};
/// use evmatch::{InputMatcher, MatchingData, NumericMatcher, Value};
///
/// let range = NumericMatcher::new(vec![
///     NumericCondition::new(NumericOp::Gt, Some(10.0)),
///     NumericCondition::new(NumericOp::Le, Some(20.0)),
/// ]);
/// assert!(range.matches(MatchingData::Present(&Value::Number(20.0))));
/// assert!(!range.matches(MatchingData::Present(&Value::Number(10.0))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NumericMatcher {
    conditions: Vec<NumericCondition>,
}

impl NumericMatcher {
    /// Create a new numeric matcher.
    #[must_use]
    pub fn new(conditions: Vec<NumericCondition>) -> Self {
        Self { conditions }
    }

    /// Returns the conditions, in evaluation order.
    #[must_use]
    pub fn conditions(&self) -> &[NumericCondition] {
        &self.conditions
    }
}

impl InputMatcher for NumericMatcher {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        let Some(n) = coerce(value) else {
            return false;
        };
        self.conditions.iter().all(|c| c.holds(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericOp;

    fn s(value: &str) -> Value {
        Value::from(value)
    }

    fn present(value: &Value) -> MatchingData<'_> {
        MatchingData::Present(value)
    }

    #[test]
    fn test_literal_matcher() {
        let m = LiteralMatcher::new(Literal::String("John".into()));
        assert!(m.matches(present(&s("John"))));
        assert!(!m.matches(present(&s("john"))));
        assert!(!m.matches(present(&s("doe"))));
        assert!(!m.matches(MatchingData::Absent));
        assert!(!m.matches(present(&Value::Null)));
    }

    #[test]
    fn test_literal_matcher_array_element() {
        let m = LiteralMatcher::new(Literal::String("John".into()));
        assert!(m.matches(present(&Value::Array(vec![s("John")]))));
        assert!(!m.matches(present(&Value::Array(vec![s("Jane")]))));
        assert!(!m.matches(present(&Value::Array(vec![]))));
    }

    #[test]
    fn test_null_literal() {
        let m = LiteralMatcher::new(Literal::Null);
        assert!(m.matches(present(&Value::Null)));
        assert!(m.matches(MatchingData::Absent));
        assert!(m.matches(present(&Value::Array(vec![s("x"), Value::Null]))));
        assert!(!m.matches(present(&s(""))));
        assert!(!m.matches(present(&Value::Bool(false))));
        assert!(!m.matches(present(&Value::Number(0.0))));
    }

    #[test]
    fn test_numeric_literal() {
        let m = LiteralMatcher::new(Literal::Number(987.0));
        assert!(m.matches(present(&Value::Number(987.0))));
        assert!(!m.matches(present(&s("987"))));
    }

    #[test]
    fn test_exists_matcher() {
        let yes = ExistsMatcher::new(true);
        let no = ExistsMatcher::new(false);
        assert!(yes.matches(present(&s("John"))));
        assert!(yes.matches(present(&Value::Null)));
        assert!(!yes.matches(MatchingData::Absent));
        assert!(no.matches(MatchingData::Absent));
        assert!(!no.matches(present(&s("John"))));
    }

    #[test]
    fn test_anything_but_matcher() {
        let m = AnythingButMatcher::new(vec![Literal::String("John".into()), Literal::Number(7.0)]);
        assert!(!m.matches(present(&s("John"))));
        assert!(!m.matches(present(&Value::Number(7.0))));
        assert!(m.matches(present(&s("Doe"))));
        assert!(m.matches(present(&s("7"))));
        assert!(m.matches(present(&Value::Bool(true))));
    }

    #[test]
    fn test_anything_but_passes_non_scalars() {
        let m = AnythingButMatcher::new(vec![Literal::Null, Literal::String("a".into())]);
        assert!(m.matches(present(&Value::Null)));
        assert!(m.matches(MatchingData::Absent));
        assert!(m.matches(present(&Value::Array(vec![s("a")]))));
    }

    #[test]
    fn test_equals_ignore_case_matcher() {
        let m = EqualsIgnoreCaseMatcher::new("JohN");
        assert!(m.matches(present(&s("john"))));
        assert!(m.matches(present(&s("JOHN"))));
        assert!(!m.matches(present(&s("jahn"))));
        assert!(!m.matches(MatchingData::Absent));

        let unicode = EqualsIgnoreCaseMatcher::new("ÉCOLE");
        assert!(unicode.matches(present(&s("école"))));
    }

    #[test]
    fn test_prefix_matcher() {
        let m = PrefixMatcher::new("Will");
        assert!(m.matches(present(&s("William"))));
        assert!(!m.matches(present(&s("william"))));
        assert!(!m.matches(present(&s("Joh"))));
        assert!(!m.matches(present(&Value::Number(1.0))));
    }

    #[test]
    fn test_suffix_matcher() {
        let m = SuffixMatcher::new("iam");
        assert!(m.matches(present(&s("William"))));
        assert!(!m.matches(present(&s("John"))));
        assert!(!m.matches(MatchingData::Absent));
    }

    #[test]
    fn test_wildcard_matcher() {
        let m = WildcardMatcher::new("*.i*.l/*i.?.m").unwrap();
        assert!(m.matches(present(&s("w.i.l.l//i.a.m"))));
        let m = WildcardMatcher::new("i.*.l/*i.?.m").unwrap();
        assert!(!m.matches(present(&s("w.i.l.l//i.a.m"))));
    }

    #[test]
    fn test_wildcard_escapes_metacharacters() {
        let m = WildcardMatcher::new("a+b(c)[d]{e}|^$\\").unwrap();
        assert!(m.matches(present(&s("a+b(c)[d]{e}|^$\\"))));
        assert!(!m.matches(present(&s("aab(c)[d]{e}|^$\\"))));

        let dot = WildcardMatcher::new("a.c").unwrap();
        assert!(!dot.matches(present(&s("abc"))));
    }

    #[test]
    fn test_wildcard_question_mark_is_one_char() {
        let m = WildcardMatcher::new("process?d").unwrap();
        assert!(m.matches(present(&s("processed"))));
        assert!(!m.matches(present(&s("processd"))));
        assert!(WildcardMatcher::new("process*").unwrap().matches(present(&s("process"))));
    }

    #[test]
    fn test_wildcard_spans_line_breaks() {
        let star = WildcardMatcher::new("x*y").unwrap();
        assert!(star.matches(present(&s("x\ny"))));
        assert!(star.matches(present(&s("x\r\n\ny"))));

        let one = WildcardMatcher::new("x?y").unwrap();
        assert!(one.matches(present(&s("x\ny"))));
        assert!(!one.matches(present(&s("x\n\ny"))));
    }

    #[test]
    fn test_numeric_matcher() {
        let eq = NumericMatcher::new(vec![NumericCondition::new(NumericOp::Eq, Some(15.0))]);
        assert!(eq.matches(present(&Value::Number(15.0))));
        assert!(eq.matches(present(&s("15"))));
        assert!(!eq.matches(present(&Value::Number(20.0))));
        assert!(!eq.matches(present(&s("fifteen"))));
        assert!(!eq.matches(MatchingData::Absent));
    }

    #[test]
    fn test_numeric_range() {
        let range = NumericMatcher::new(vec![
            NumericCondition::new(NumericOp::Gt, Some(10.0)),
            NumericCondition::new(NumericOp::Le, Some(20.0)),
        ]);
        assert!(range.matches(present(&Value::Number(15.0))));
        assert!(range.matches(present(&Value::Number(20.0))));
        assert!(!range.matches(present(&Value::Number(10.0))));
        assert!(!range.matches(present(&Value::Number(21.0))));
    }

    #[test]
    fn test_numeric_unknown_operator_fails() {
        let m = NumericMatcher::new(vec![
            NumericCondition::new(NumericOp::Gt, Some(1.0)),
            NumericCondition::new(NumericOp::parse("!="), Some(5.0)),
        ]);
        assert!(!m.matches(present(&Value::Number(3.0))));
    }

    #[test]
    fn test_numeric_empty_conditions_require_number() {
        let m = NumericMatcher::new(vec![]);
        assert!(m.matches(present(&Value::Number(3.0))));
        assert!(!m.matches(present(&s("x"))));
    }

    #[test]
    fn test_boxed_matcher() {
        let boxed: Box<dyn InputMatcher> = Box::new(PrefixMatcher::new("a"));
        assert!(boxed.matches(present(&s("abc"))));
    }

    #[test]
    fn test_matchers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn InputMatcher>>();
        assert_send_sync::<WildcardMatcher>();
    }
}
