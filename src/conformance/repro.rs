//! Reproduction bundle for debugging conformance mismatches.

use super::ConformanceResult;
use serde::Serialize;
use std::path::Path;

/// Outcome of decoding one input with one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Decoded; the payload is the value rendered as text.
    Ok(String),
    /// Rejected; the payload is the error name or message.
    Err(String),
}

impl Outcome {
    /// Check if this is an Ok outcome.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Check if this is an Err outcome.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// The rendered value or the error text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok(s) | Self::Err(s) => s,
        }
    }
}

/// Everything needed to reproduce a mismatch.
#[derive(Debug, Clone, Serialize)]
pub struct ReproBundle {
    /// Test name that failed.
    pub test_name: String,
    /// Operation under test (e.g. "decode").
    pub operation: String,
    /// Input document, lossily converted to text.
    pub input: String,
    /// Outcome from this crate.
    pub ours: Outcome,
    /// Outcome from the reference decoder.
    pub reference: Outcome,
}

impl ReproBundle {
    /// Create a new repro bundle.
    pub fn new(
        test_name: impl Into<String>,
        operation: impl Into<String>,
        input: &[u8],
        ours: Outcome,
        reference: Outcome,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            operation: operation.into(),
            input: String::from_utf8_lossy(input).into_owned(),
            ours,
            reference,
        }
    }

    /// Format as a human-readable report.
    pub fn to_report(&self) -> String {
        format!(
            r#"=== Conformance Mismatch Report ===
Test: {}
Operation: {}
Input: {}

simjson:   {:?}
reference: {:?}

To reproduce:
  echo '{}' | simjson check
"#,
            self.test_name,
            self.operation,
            self.input,
            self.ours,
            self.reference,
            self.input,
        )
    }

    /// Save the report to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConformanceResult<()> {
        std::fs::write(path, self.to_report())?;
        Ok(())
    }

    /// Format as JSON for machine parsing.
    pub fn to_json(&self) -> ConformanceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ReproBundle {
        ReproBundle::new(
            "dup_key",
            "decode",
            br#"{"a": 1, "a": 2}"#,
            Outcome::Err("E202_DuplicateKey".to_string()),
            Outcome::Ok(r#"{"a":2}"#.to_string()),
        )
    }

    #[test]
    fn test_repro_bundle_report() {
        let report = bundle().to_report();
        assert!(report.contains("dup_key"));
        assert!(report.contains("decode"));
        assert!(report.contains("E202_DuplicateKey"));
        assert!(report.contains("simjson check"));
    }

    #[test]
    fn test_repro_bundle_json() {
        let json = bundle().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["test_name"], "dup_key");
        assert_eq!(parsed["ours"]["err"], "E202_DuplicateKey");
        assert_eq!(parsed["reference"]["ok"], r#"{"a":2}"#);
    }

    #[test]
    fn test_repro_bundle_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repro.txt");
        bundle().save(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.starts_with("=== Conformance Mismatch Report ==="));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = Outcome::Ok("1".to_string());
        assert!(ok.is_ok());
        assert!(!ok.is_err());
        assert_eq!(ok.as_str(), "1");
    }
}
