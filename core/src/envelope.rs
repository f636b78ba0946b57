//! Envelope matching: serialized event + serialized pattern → bool
//!
//! The envelope entry point accepts the wire shape used by EventBridge's
//! `TestEventPattern` API — two JSON strings — validates that the event carries the
//! mandatory envelope fields and that the pattern carries `detail`, then delegates to
//! [`Pattern::matches`].
//!
//! The mandatory field sets are configuration ([`EnvelopeSchema`]) and can be loaded
//! from JSON or YAML.

use crate::compiler::json_type;
use crate::{Document, MatcherError, Pattern, Value};
use log::debug;
use serde::Deserialize;

/// A request carrying a serialized event and a serialized pattern.
///
/// Field names follow the EventBridge API:
///
/// ```json
/// { "Event": "{\"id\": ...}", "EventPattern": "{\"detail\": {}}" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeRequest {
    /// The event, as JSON text.
    #[serde(rename = "Event")]
    pub event: String,
    /// The pattern, as JSON text.
    #[serde(rename = "EventPattern")]
    pub event_pattern: String,
}

impl EnvelopeRequest {
    /// Create a request from the two JSON texts.
    pub fn new(event: impl Into<String>, event_pattern: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            event_pattern: event_pattern.into(),
        }
    }
}

/// Mandatory fields for envelope matching.
///
/// `Default` is the EventBridge envelope. YAML example:
///
/// ```yaml
/// required_event_fields: [id, source, detail]
/// required_pattern_fields: []
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvelopeSchema {
    /// Top-level keys every event must carry with a non-null value.
    pub required_event_fields: Vec<String>,
    /// Top-level keys every pattern must carry.
    pub required_pattern_fields: Vec<String>,
}

/// The event field that must additionally be a document.
pub const DETAIL_FIELD: &str = "detail";

impl Default for EnvelopeSchema {
    fn default() -> Self {
        Self {
            required_event_fields: [
                "id",
                "detail-type",
                "source",
                "account",
                "time",
                "region",
                DETAIL_FIELD,
            ]
            .map(String::from)
            .to_vec(),
            required_pattern_fields: vec![DETAIL_FIELD.to_string()],
        }
    }
}

impl EnvelopeSchema {
    /// Parse and validate both texts, then match.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::InvalidJson`] if either text is not valid JSON.
    /// - [`MatcherError::NotAnObject`] if either text is not a JSON object.
    /// - [`MatcherError::MissingEventFields`] / [`MatcherError::MissingPatternFields`]
    ///   if mandatory fields are missing or `null`.
    /// - [`MatcherError::InvalidDetail`] if the event's `detail` is not an object.
    /// - Any pattern compilation error.
    pub fn match_envelope(&self, request: &EnvelopeRequest) -> Result<bool, MatcherError> {
        let event: Document = parse_object("event", &request.event)?
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();
        let pattern_json = serde_json::Value::Object(parse_object("pattern", &request.event_pattern)?);

        self.validate_event(&event)?;
        self.validate_pattern(&pattern_json)?;

        let pattern = Pattern::from_json(&pattern_json)?;
        let matched = pattern.matches(&event);
        debug!("envelope matched={matched}");
        Ok(matched)
    }

    /// Check that `event` carries every required field with a non-null value, and that
    /// `detail`, when required, is a document. Empty strings, `0` and `false` count as
    /// present.
    ///
    /// # Errors
    ///
    /// [`MatcherError::MissingEventFields`] listing every missing field, or
    /// [`MatcherError::InvalidDetail`].
    pub fn validate_event(&self, event: &Document) -> Result<(), MatcherError> {
        let missing: Vec<String> = self
            .required_event_fields
            .iter()
            .filter(|field| event.get(field.as_str()).map_or(true, Value::is_null))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!("event rejected, missing fields: {missing:?}");
            return Err(MatcherError::MissingEventFields { missing });
        }

        if self.required_event_fields.iter().any(|f| f == DETAIL_FIELD) {
            if let Some(detail) = event.get(DETAIL_FIELD).filter(|d| !d.is_document()) {
                return Err(MatcherError::InvalidDetail {
                    found: detail.type_name(),
                });
            }
        }
        Ok(())
    }

    /// Check that the pattern JSON carries every required top-level key.
    ///
    /// # Errors
    ///
    /// [`MatcherError::MissingPatternFields`] listing every missing key.
    pub fn validate_pattern(&self, pattern: &serde_json::Value) -> Result<(), MatcherError> {
        let missing: Vec<String> = self
            .required_pattern_fields
            .iter()
            .filter(|field| pattern.get(field.as_str()).map_or(true, serde_json::Value::is_null))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            debug!("pattern rejected, missing fields: {missing:?}");
            Err(MatcherError::MissingPatternFields { missing })
        }
    }
}

/// Envelope match with the default EventBridge [`EnvelopeSchema`].
///
/// # Errors
///
/// See [`EnvelopeSchema::match_envelope`].
///
/// # Example
///
/// ```
/// use evmatch::{match_envelope, EnvelopeRequest};
///
/// let event = r#"{
///     "id": "1", "account": "123", "time": "2023-11-05T08:14:33Z",
///     "region": "eu-central-1", "source": "aws.ec2",
///     "detail-type": "EC2 Instance State-change Notification",
///     "detail": { "state": "running" }
/// }"#;
/// let pattern = r#"{ "source": ["aws.ec2"], "detail": { "state": ["running"] } }"#;
/// assert!(match_envelope(&EnvelopeRequest::new(event, pattern)).unwrap());
/// ```
pub fn match_envelope(request: &EnvelopeRequest) -> Result<bool, MatcherError> {
    EnvelopeSchema::default().match_envelope(request)
}

fn parse_object(
    input: &'static str,
    text: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, MatcherError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| MatcherError::InvalidJson {
            input,
            reason: e.to_string(),
        })?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(MatcherError::NotAnObject {
            input,
            found: json_type(&other),
        }),
    }
}
