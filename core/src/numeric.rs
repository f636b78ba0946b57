//! Numeric coercion and relational conditions for the `numeric` comparison.

use crate::{MatchingData, Value};
use std::fmt;

/// Best-effort conversion of a resolved value to a finite number.
///
/// - Numbers pass through unchanged.
/// - Strings are trimmed and parsed as a numeric literal; an empty or all-whitespace
///   string is `0`. Unsigned `0x`, `0o` and `0b` integer literals are accepted.
///   `NaN`, `inf` and anything non-numeric fail.
/// - Every other type, and `Absent`, fails.
///
/// # Example
///
/// ```
/// use evmatch::{numeric::coerce, MatchingData, Value};
///
/// assert_eq!(coerce(MatchingData::Present(&Value::from(" 42.5 "))), Some(42.5));
/// assert_eq!(coerce(MatchingData::Present(&Value::from("0x10"))), Some(16.0));
/// assert_eq!(coerce(MatchingData::Present(&Value::from("Infinity"))), None);
/// assert_eq!(coerce(MatchingData::Absent), None);
/// ```
#[must_use]
pub fn coerce(data: MatchingData<'_>) -> Option<f64> {
    match data.value()? {
        Value::Number(n) => Some(*n).filter(|n| n.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .or_else(|| parse_radix(trimmed))
                .filter(|n| n.is_finite())
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse `0x`/`0o`/`0b` integer literals. Signs and separators are rejected.
fn parse_radix(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = s.get(2..).filter(|d| !d.is_empty())?;
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// A relational operator token in a `numeric` comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericOp {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// Any other token. Never satisfied.
    Unknown(String),
}

impl NumericOp {
    /// Parse an operator token. Unrecognized tokens become [`NumericOp::Unknown`].
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "=" => Self::Eq,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Apply this operator with `lhs` on the left.
    #[must_use]
    #[allow(clippy::float_cmp)] // `=` is exact equality by definition
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
            Self::Ge => lhs >= rhs,
            Self::Le => lhs <= rhs,
            Self::Unknown(_) => false,
        }
    }
}

impl fmt::Display for NumericOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Unknown(t) => t.as_str(),
        };
        f.write_str(token)
    }
}

/// One `(operator, operand)` pair.
///
/// `operand` is `None` when the pattern supplied no operand or a non-numeric one;
/// such a pair is never satisfied.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericCondition {
    /// The relational operator.
    pub op: NumericOp,
    /// The right-hand side.
    pub operand: Option<f64>,
}

impl NumericCondition {
    /// Create a condition.
    #[must_use]
    pub fn new(op: NumericOp, operand: Option<f64>) -> Self {
        Self { op, operand }
    }

    /// Check the condition against an already-coerced value.
    #[must_use]
    pub fn holds(&self, value: f64) -> bool {
        self.operand.is_some_and(|rhs| self.op.apply(value, rhs))
    }

    /// Build conditions from the flattened `[op, operand, op, operand, ...]` form.
    ///
    /// A non-string operator token becomes [`NumericOp::Unknown`]; a trailing operator
    /// without an operand gets `operand: None`.
    #[must_use]
    pub fn from_flattened(items: &[serde_json::Value]) -> Vec<Self> {
        items
            .chunks(2)
            .map(|pair| {
                let op = match &pair[0] {
                    serde_json::Value::String(token) => NumericOp::parse(token),
                    other => NumericOp::Unknown(other.to_string()),
                };
                let operand = pair.get(1).and_then(serde_json::Value::as_f64);
                Self::new(op, operand)
            })
            .collect()
    }
}

impl fmt::Display for NumericCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(rhs) => write!(f, "{} {rhs}", self.op),
            None => write!(f, "{} ?", self.op),
        }
    }
}
