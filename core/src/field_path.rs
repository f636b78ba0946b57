//! `FieldPath` — Resolving pattern keys against a document
//!
//! A pattern key is a dot-separated path (`"detail.bucket.name"`). Resolution walks the
//! document one segment at a time and yields [`MatchingData::Absent`] when a segment is
//! missing or an intermediate value is not a document. Absence is an ordinary outcome,
//! never an error.
//!
//! # Wildcard keys
//!
//! A key containing `*` is a wildcard path. Within a single segment, `*` matches zero or
//! more characters of one key name, so `"detail.*.name"` visits every direct child of
//! `detail` and `"detail.item_*"` visits every child whose name starts with `item_`.
//!
//! - A wildcard never crosses a `.` boundary and never descends into arrays.
//! - All other characters, including `?`, are literal.
//! - Matches are collected depth-first in document insertion order.
//! - When nothing matches, the resolution is a single `Absent` candidate so that
//!   absence checks (`exists: false`, `null`) behave exactly as for plain paths.

use crate::{Document, MatcherError, MatchingData, Value};
use log::trace;
use std::fmt;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Marker that turns a pattern key into a wildcard path.
pub const WILDCARD_MARKER: char = '*';

/// One segment of a [`FieldPath`].
#[derive(Debug, Clone)]
enum Segment {
    /// Exact key name.
    Key(String),
    /// Key name glob, compiled to an anchored regex.
    Glob(regex::Regex),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, MatcherError> {
        if !raw.contains(WILDCARD_MARKER) {
            return Ok(Self::Key(raw.to_string()));
        }
        let body = raw
            .split(WILDCARD_MARKER)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        regex::Regex::new(&format!("(?s)^{body}$"))
            .map(Self::Glob)
            .map_err(|e| MatcherError::InvalidPattern {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })
    }

    fn accepts(&self, key: &str) -> bool {
        match self {
            Self::Key(k) => k == key,
            Self::Glob(re) => re.is_match(key),
        }
    }
}

/// A parsed pattern key.
///
/// # Example
///
/// ```
/// use evmatch::{FieldPath, Value};
///
/// let doc = Value::from(serde_json::json!({
///     "detail": { "a": { "name": "x" }, "b": { "name": "y" } }
/// }));
/// let doc = doc.as_document().unwrap();
///
/// let plain = FieldPath::parse("detail.a.name").unwrap();
/// assert_eq!(plain.resolve(doc)[0].as_str(), Some("x"));
///
/// let wild = FieldPath::parse("detail.*.name").unwrap();
/// let names: Vec<_> = wild.resolve(doc).iter().filter_map(|d| d.as_str()).collect();
/// assert_eq!(names, ["x", "y"]);
/// ```
#[derive(Debug, Clone)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
}

impl FieldPath {
    /// Parse a pattern key into a path.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidPattern`] if a wildcard segment cannot be compiled.
    pub fn parse(key: &str) -> Result<Self, MatcherError> {
        let segments = key
            .split(PATH_SEPARATOR)
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            raw: key.to_string(),
            wildcard: key.contains(WILDCARD_MARKER),
            segments,
        })
    }

    /// The key as written in the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if this key contains the wildcard marker.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Resolve this path to its candidate values.
    ///
    /// Never empty: a plain path yields exactly one candidate (possibly `Absent`), a
    /// wildcard path yields every match or a single `Absent` when there are none.
    #[must_use]
    pub fn resolve<'a>(&self, doc: &'a Document) -> Vec<MatchingData<'a>> {
        if !self.wildcard {
            return vec![self.resolve_single(doc)];
        }

        let mut found = Vec::new();
        expand(doc, &self.segments, &mut found);
        trace!("wildcard path {:?} expanded to {} value(s)", self.raw, found.len());
        if found.is_empty() {
            found.push(MatchingData::Absent);
        }
        found
    }

    /// Resolve a plain path to a single value.
    ///
    /// A wildcard segment never resolves here; use [`FieldPath::resolve`] for those.
    #[must_use]
    pub fn resolve_single<'a>(&self, doc: &'a Document) -> MatchingData<'a> {
        let mut current = doc;
        let mut value: Option<&'a Value> = None;
        for segment in &self.segments {
            if value.is_some() {
                match value.and_then(Value::as_document) {
                    Some(d) => current = d,
                    None => return MatchingData::Absent,
                }
            }
            let key = match segment {
                Segment::Key(k) => k.as_str(),
                Segment::Glob(_) => return MatchingData::Absent,
            };
            match current.get(key) {
                Some(v) => value = Some(v),
                None => return MatchingData::Absent,
            }
        }
        value.map_or(MatchingData::Absent, MatchingData::Present)
    }
}

fn expand<'a>(doc: &'a Document, segments: &[Segment], out: &mut Vec<MatchingData<'a>>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match head {
        Segment::Key(k) => {
            if let Some(value) = doc.get(k.as_str()) {
                descend(value, rest, out);
            }
        }
        Segment::Glob(_) => {
            for (key, value) in doc {
                if head.accepts(key) {
                    descend(value, rest, out);
                }
            }
        }
    }
}

fn descend<'a>(value: &'a Value, rest: &[Segment], out: &mut Vec<MatchingData<'a>>) {
    if rest.is_empty() {
        out.push(MatchingData::Present(value));
    } else if let Some(child) = value.as_document() {
        expand(child, rest, out);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
