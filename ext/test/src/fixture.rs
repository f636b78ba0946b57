//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the evmatch engine. Two shapes exist:
//!
//! - [`Fixture`]: one pattern (given as YAML, compiled through JSON) plus documents,
//!   or an expected compile error.
//! - [`EnvelopeFixture`]: raw `Event` / `EventPattern` strings through the envelope
//!   entry point, with an expected boolean or error.

use evmatch::prelude::*;
use serde::Deserialize;

/// A pattern fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: serde_json::Value,
    /// Substring of the compile error message, when the pattern must be rejected.
    #[serde(default)]
    pub expect_error: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case: one document and the expected verdict
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub document: serde_json::Value,
    pub expect: bool,
}

/// An envelope fixture
#[derive(Debug, Deserialize)]
pub struct EnvelopeFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Overrides the default EventBridge schema.
    #[serde(default)]
    pub schema: Option<EnvelopeSchema>,
    pub cases: Vec<EnvelopeCase>,
}

/// Envelope case: serialized inputs and either a verdict or an error substring
#[derive(Debug, Deserialize)]
pub struct EnvelopeCase {
    pub name: String,
    pub event: String,
    pub pattern: String,
    #[serde(default)]
    pub expect: Option<bool>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    fn new(case_name: &str, expected: String, actual: String, passed: bool) -> Self {
        Self {
            case_name: case_name.to_string(),
            passed,
            expected,
            actual,
        }
    }
}

/// Parse every `---`-separated document in `yaml` as a `T`.
fn from_yaml_multi<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<Vec<T>, serde_yaml::Error> {
    let mut fixtures = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(yaml) {
        fixtures.push(T::deserialize(doc)?);
    }
    Ok(fixtures)
}

fn describe(outcome: &Result<bool, MatcherError>) -> String {
    match outcome {
        Ok(verdict) => verdict.to_string(),
        Err(e) => format!("error: {e}"),
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        from_yaml_multi(yaml)
    }

    /// Compile the pattern and evaluate every case.
    ///
    /// A fixture expecting a compile error yields one synthetic case named `compile`.
    pub fn run(&self) -> Vec<CaseResult> {
        let compiled = Pattern::from_json(&self.pattern);

        if let Some(expected) = &self.expect_error {
            let (actual, passed) = match &compiled {
                Ok(_) => ("compiled".to_string(), false),
                Err(e) => (e.to_string(), e.to_string().contains(expected.as_str())),
            };
            return vec![CaseResult::new("compile", expected.clone(), actual, passed)];
        }

        let pattern = match compiled {
            Ok(pattern) => pattern,
            Err(e) => {
                return vec![CaseResult::new(
                    "compile",
                    "compiled".into(),
                    e.to_string(),
                    false,
                )]
            }
        };

        self.cases
            .iter()
            .map(|case| {
                let document = Value::from(case.document.clone());
                let outcome = match document.as_document() {
                    Some(doc) => Ok(pattern.matches(doc)),
                    None => Err(MatcherError::NotAnObject {
                        input: "event",
                        found: document.type_name(),
                    }),
                };
                let passed = matches!(outcome, Ok(verdict) if verdict == case.expect);
                CaseResult::new(&case.name, case.expect.to_string(), describe(&outcome), passed)
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

impl EnvelopeFixture {
    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        from_yaml_multi(yaml)
    }

    /// Run every case through the envelope entry point.
    pub fn run(&self) -> Vec<CaseResult> {
        let schema = self.schema.clone().unwrap_or_default();

        self.cases
            .iter()
            .map(|case| {
                let request = EnvelopeRequest::new(case.event.as_str(), case.pattern.as_str());
                let outcome = schema.match_envelope(&request);
                let (expected, passed) = match (&case.expect_error, case.expect) {
                    (Some(fragment), _) => (
                        format!("error containing {fragment:?}"),
                        matches!(&outcome, Err(e) if e.to_string().contains(fragment.as_str())),
                    ),
                    (None, Some(verdict)) => {
                        (verdict.to_string(), matches!(outcome, Ok(v) if v == verdict))
                    }
                    (None, None) => ("an expectation".into(), false),
                };
                CaseResult::new(&case.name, expected, describe(&outcome), passed)
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Envelope fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multi_document_fixtures() {
        let yaml = r#"
name: first
pattern:
  source: ["a"]
cases:
  - name: hit
    document: { source: a }
    expect: true
---
name: second
pattern:
  source: "a"
expect_error: expected an array
"#;
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        fixtures[0].run_and_assert();
        fixtures[1].run_and_assert();
    }

    #[test]
    fn reports_failing_case() {
        let fixture = Fixture::from_yaml(
            r#"
name: wrong
pattern:
  source: ["a"]
cases:
  - name: miss
    document: { source: b }
    expect: true
"#,
        )
        .unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "false");
    }

    #[test]
    fn non_object_document_fails_the_case() {
        let fixture = Fixture::from_yaml(
            r#"
name: scalar document
pattern: {}
cases:
  - name: scalar
    document: 5
    expect: true
"#,
        )
        .unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
        assert!(results[0].actual.contains("must be a JSON object"));
    }

    #[test]
    fn envelope_case_without_expectation_fails() {
        let fixture = EnvelopeFixture {
            name: "empty".into(),
            description: String::new(),
            schema: None,
            cases: vec![EnvelopeCase {
                name: "no expectation".into(),
                event: "{}".into(),
                pattern: "{}".into(),
                expect: None,
                expect_error: None,
            }],
        };
        assert!(!fixture.run()[0].passed);
    }
}
