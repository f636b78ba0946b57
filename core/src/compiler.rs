//! Compiler: JSON pattern text → [`Pattern`]
//!
//! Translates the EventBridge-style JSON pattern shape into the closed runtime types:
//!
//! | JSON | Runtime |
//! |------|---------|
//! | `"$or": [ {...}, ... ]` | [`PatternEntry::OrGroup`] |
//! | `"key": [ ... ]` | [`FieldRule::AnyOf`] |
//! | `"key": { ... }` | [`FieldRule::Nested`] |
//! | `"str"`, `1`, `true`, `null` inside an array | [`ValueMatch::Literal`] |
//! | `{ "prefix": "..." }` inside an array | [`ValueMatch::Comparison`] |
//!
//! Structural problems are rejected with the dotted location of the offending key.
//! A comparison object with no recognized operator is kept as
//! [`ValueMatch::Unrecognized`] (it never matches); one with several operators is
//! rejected as ambiguous.

use crate::comparison::OPERATOR_KEYS;
use crate::numeric::NumericCondition;
use crate::{
    AnythingButMatcher, Comparison, EqualsIgnoreCaseMatcher, ExistsMatcher, FieldPath, FieldRule,
    Literal, LiteralMatcher, MatcherError, NumericMatcher, Pattern, PatternEntry, PrefixMatcher,
    SuffixMatcher, ValueMatch, WildcardMatcher,
};
use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as Json};
use std::str::FromStr;

/// The reserved key introducing an `$or` group.
pub const OR_KEY: &str = "$or";

impl Pattern {
    /// Compile a pattern from parsed JSON.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::NotAnObject`] if the top level is not an object.
    /// - [`MatcherError::InvalidRule`] for a structurally invalid key or operator argument.
    /// - [`MatcherError::AmbiguousComparison`] for an object with several operator keys.
    /// - [`MatcherError::InvalidPattern`] if a glob cannot be compiled.
    pub fn from_json(value: &Json) -> Result<Self, MatcherError> {
        let map = value.as_object().ok_or_else(|| MatcherError::NotAnObject {
            input: "pattern",
            found: json_type(value),
        })?;
        compile_object(map, "")
    }
}

impl FromStr for Pattern {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Json = serde_json::from_str(s).map_err(|e| MatcherError::InvalidJson {
            input: "pattern",
            reason: e.to_string(),
        })?;
        Self::from_json(&value)
    }
}

impl TryFrom<Json> for Pattern {
    type Error = MatcherError;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn compile_object(map: &Map<String, Json>, scope: &str) -> Result<Pattern, MatcherError> {
    let mut entries = Vec::with_capacity(map.len());

    for (key, value) in map {
        let location = join(scope, key);

        if key == OR_KEY {
            entries.push(PatternEntry::OrGroup(compile_or(value, &location)?));
            continue;
        }

        let rule = match value {
            Json::Array(items) => FieldRule::AnyOf(
                items
                    .iter()
                    .map(|item| compile_value_match(item, &location))
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(nested) => FieldRule::Nested(compile_object(nested, &location)?),
            other => {
                return Err(MatcherError::InvalidRule {
                    key: location,
                    reason: format!(
                        "expected an array of values or a nested pattern, found {}",
                        json_type(other)
                    ),
                })
            }
        };

        entries.push(PatternEntry::field(FieldPath::parse(key)?, rule));
    }

    Ok(Pattern::new(entries))
}

fn compile_or(value: &Json, location: &str) -> Result<Vec<Pattern>, MatcherError> {
    let alternatives = value.as_array().ok_or_else(|| MatcherError::InvalidRule {
        key: location.to_string(),
        reason: format!("expected an array of patterns, found {}", json_type(value)),
    })?;

    alternatives
        .iter()
        .enumerate()
        .map(|(index, alternative)| {
            let at = format!("{location}[{index}]");
            match alternative.as_object() {
                Some(map) => compile_object(map, &at),
                None => Err(MatcherError::InvalidRule {
                    reason: format!("expected a pattern object, found {}", json_type(alternative)),
                    key: at,
                }),
            }
        })
        .collect()
}

fn compile_value_match(item: &Json, location: &str) -> Result<ValueMatch, MatcherError> {
    match item {
        Json::Object(map) => compile_comparison(map, location),
        Json::Array(_) => Err(MatcherError::InvalidRule {
            key: location.to_string(),
            reason: "nested arrays are not allowed in a value list".into(),
        }),
        scalar => literal(scalar, location).map(|l| ValueMatch::Literal(LiteralMatcher::new(l))),
    }
}

fn compile_comparison(map: &Map<String, Json>, location: &str) -> Result<ValueMatch, MatcherError> {
    let operators: Vec<(&str, &Json)> = map
        .iter()
        .filter(|(key, _)| OPERATOR_KEYS.contains(&key.as_str()))
        .map(|(key, arg)| (key.as_str(), arg))
        .collect();

    let (operator, arg) = match operators.as_slice() {
        [] => {
            warn!(
                "{location}: object without a recognized operator ({}) never matches",
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            );
            return Ok(ValueMatch::Unrecognized);
        }
        [single] => *single,
        several => {
            return Err(MatcherError::AmbiguousComparison {
                key: location.to_string(),
                operators: several.iter().map(|(op, _)| (*op).to_string()).collect(),
            })
        }
    };

    let invalid = |expected: &str| MatcherError::InvalidRule {
        key: location.to_string(),
        reason: format!(
            "\"{operator}\" expects {expected}, found {}",
            json_type(arg)
        ),
    };

    let comparison = match operator {
        "exists" => Comparison::Exists(ExistsMatcher::new(
            arg.as_bool().ok_or_else(|| invalid("a boolean"))?,
        )),
        "anything-but" => {
            let excluded = match arg {
                Json::Array(items) => items
                    .iter()
                    .map(|item| literal(item, location))
                    .collect::<Result<Vec<_>, _>>()?,
                Json::Object(_) => return Err(invalid("an array of values")),
                scalar => vec![literal(scalar, location)?],
            };
            Comparison::AnythingBut(AnythingButMatcher::new(excluded))
        }
        "equals-ignore-case" => Comparison::EqualsIgnoreCase(EqualsIgnoreCaseMatcher::new(
            arg.as_str().ok_or_else(|| invalid("a string"))?,
        )),
        "numeric" => Comparison::Numeric(NumericMatcher::new(NumericCondition::from_flattened(
            arg.as_array().ok_or_else(|| invalid("an array"))?,
        ))),
        "prefix" => Comparison::Prefix(PrefixMatcher::new(
            arg.as_str().ok_or_else(|| invalid("a string"))?,
        )),
        "suffix" => Comparison::Suffix(SuffixMatcher::new(
            arg.as_str().ok_or_else(|| invalid("a string"))?,
        )),
        "wildcard" => Comparison::Wildcard(WildcardMatcher::new(
            arg.as_str().ok_or_else(|| invalid("a string"))?,
        )?),
        other => unreachable!("operator {other} is not in OPERATOR_KEYS"),
    };

    Ok(ValueMatch::Comparison(comparison))
}

fn literal(value: &Json, location: &str) -> Result<Literal, MatcherError> {
    Literal::from_json(value).ok_or_else(|| MatcherError::InvalidRule {
        key: location.to_string(),
        reason: format!("expected a string, number, boolean or null, found {}", json_type(value)),
    })
}

fn join(scope: &str, key: &str) -> String {
    if scope.is_empty() {
        key.to_string()
    } else {
        format!("{scope}.{key}")
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
