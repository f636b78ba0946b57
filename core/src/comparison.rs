//! `Comparison` and `ValueMatch` — The closed set of leaf matchers
//!
//! A pattern leaf is an array of alternatives. Each alternative is a [`ValueMatch`]:
//! a literal, exactly one [`Comparison`] operator, or an object the compiler did not
//! recognize as an operator (which never matches).

use crate::{
    AnythingButMatcher, EqualsIgnoreCaseMatcher, ExistsMatcher, InputMatcher, LiteralMatcher,
    MatchingData, NumericMatcher, PrefixMatcher, SuffixMatcher, WildcardMatcher,
};

/// Operator keys recognized inside a comparison object.
pub const OPERATOR_KEYS: [&str; 7] = [
    "exists",
    "anything-but",
    "equals-ignore-case",
    "numeric",
    "prefix",
    "suffix",
    "wildcard",
];

/// A single named operator applied to one resolved value.
///
/// Exactly one variant per operator. When the resolved value is an array, the
/// comparison matches if it holds for the whole value or for any element.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `{"exists": bool}`
    Exists(ExistsMatcher),
    /// `{"anything-but": [...]}`
    AnythingBut(AnythingButMatcher),
    /// `{"equals-ignore-case": "..."}`
    EqualsIgnoreCase(EqualsIgnoreCaseMatcher),
    /// `{"numeric": [op, operand, ...]}`
    Numeric(NumericMatcher),
    /// `{"prefix": "..."}`
    Prefix(PrefixMatcher),
    /// `{"suffix": "..."}`
    Suffix(SuffixMatcher),
    /// `{"wildcard": "..."}`
    Wildcard(WildcardMatcher),
}

impl Comparison {
    /// The operator key as written in a pattern.
    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Exists(_) => "exists",
            Self::AnythingBut(_) => "anything-but",
            Self::EqualsIgnoreCase(_) => "equals-ignore-case",
            Self::Numeric(_) => "numeric",
            Self::Prefix(_) => "prefix",
            Self::Suffix(_) => "suffix",
            Self::Wildcard(_) => "wildcard",
        }
    }

    fn matcher(&self) -> &dyn InputMatcher {
        match self {
            Self::Exists(m) => m,
            Self::AnythingBut(m) => m,
            Self::EqualsIgnoreCase(m) => m,
            Self::Numeric(m) => m,
            Self::Prefix(m) => m,
            Self::Suffix(m) => m,
            Self::Wildcard(m) => m,
        }
    }
}

impl InputMatcher for Comparison {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        let matcher = self.matcher();
        if matcher.matches(value) {
            return true;
        }
        value.as_array().is_some_and(|items| {
            items
                .iter()
                .any(|item| matcher.matches(MatchingData::Present(item)))
        })
    }
}

/// One alternative inside a pattern leaf array.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMatch {
    /// A scalar compared by strict equality.
    Literal(LiteralMatcher),
    /// A comparison operator.
    Comparison(Comparison),
    /// An object without any recognized operator key. Never matches.
    Unrecognized,
}

impl InputMatcher for ValueMatch {
    fn matches(&self, value: MatchingData<'_>) -> bool {
        match self {
            Self::Literal(m) => m.matches(value),
            Self::Comparison(c) => c.matches(value),
            Self::Unrecognized => false,
        }
    }
}
