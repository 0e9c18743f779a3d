//! Differential test harness comparing `decode` with `serde_json`.

use super::repro::{Outcome, ReproBundle};
use crate::json::{decode_with_limits, encode, DecodeLimits};
use crate::value::{Number, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of a differential test.
#[derive(Debug)]
pub enum DiffResult {
    /// Both decoders agree (same tree, or both reject).
    Match {
        /// Our rendering of the agreed value.
        value: String,
    },
    /// The decoders disagree.
    Mismatch {
        /// Our outcome.
        ours: Outcome,
        /// Reference outcome.
        reference: Outcome,
        /// Repro bundle for debugging.
        repro: ReproBundle,
    },
    /// Input is outside the grammar both decoders share.
    Skipped {
        /// Why the input was not compared.
        reason: String,
    },
}

impl DiffResult {
    /// Check if the result is a match.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// Check if the result is a mismatch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

/// Differential test harness.
pub struct DiffTestHarness {
    limits: DecodeLimits,
    /// Where mismatch reports are written during batch runs.
    repro_dir: Option<PathBuf>,
}

impl DiffTestHarness {
    /// Create a harness using the standard decode limits.
    pub fn new() -> Self {
        Self {
            limits: DecodeLimits::standard(),
            repro_dir: None,
        }
    }

    /// Use custom decode limits for our side of the comparison.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Save a report for every mismatch found by [`run_batch`](Self::run_batch).
    pub fn with_repro_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.repro_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Decode `input` with both decoders and compare the trees.
    pub fn compare(&self, test_name: &str, input: &[u8]) -> DiffResult {
        // Escapes are kept raw here and interpreted by the reference.
        if input.contains(&b'\\') {
            return DiffResult::Skipped {
                reason: "input contains escape sequences".to_string(),
            };
        }

        let ours = decode_with_limits(input, self.limits);
        let reference = serde_json::from_slice::<serde_json::Value>(input);

        match (ours, reference) {
            (Ok(ours), Ok(reference)) => {
                let rendered = render(&ours);
                if to_reference_form(&ours) == normalize_reference(reference.clone()) {
                    DiffResult::Match { value: rendered }
                } else {
                    self.mismatch(
                        test_name,
                        input,
                        Outcome::Ok(rendered),
                        Outcome::Ok(reference.to_string()),
                    )
                }
            }
            (Err(ours), Err(_)) => DiffResult::Match {
                value: ours.name().to_string(),
            },
            (Ok(ours), Err(reference)) => self.mismatch(
                test_name,
                input,
                Outcome::Ok(render(&ours)),
                Outcome::Err(reference.to_string()),
            ),
            (Err(ours), Ok(reference)) => self.mismatch(
                test_name,
                input,
                Outcome::Err(ours.name().to_string()),
                Outcome::Ok(reference.to_string()),
            ),
        }
    }

    fn mismatch(
        &self,
        test_name: &str,
        input: &[u8],
        ours: Outcome,
        reference: Outcome,
    ) -> DiffResult {
        debug!(test = test_name, ?ours, ?reference, "decoder mismatch");
        let repro = ReproBundle::new(test_name, "decode", input, ours.clone(), reference.clone());
        DiffResult::Mismatch {
            ours,
            reference,
            repro,
        }
    }

    /// Run a batch of differential tests.
    pub fn run_batch<'a>(&self, tests: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> BatchResult {
        let mut results = BatchResult::new();

        for (name, input) in tests {
            match self.compare(name, input) {
                DiffResult::Match { .. } => results.record_pass(name),
                DiffResult::Mismatch {
                    ours,
                    reference,
                    repro,
                } => {
                    if let Some(dir) = &self.repro_dir {
                        let path = dir.join(format!("{}.txt", name));
                        if let Err(e) = repro.save(&path) {
                            warn!(path = %path.display(), error = %e, "failed to save repro bundle");
                        }
                    }
                    results.record_fail(name, ours, reference, repro);
                }
                DiffResult::Skipped { reason } => results.record_skip(name, &reason),
            }
        }

        results
    }
}

impl Default for DiffTestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn render(value: &Value) -> String {
    match encode(value) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => e.name().to_string(),
    }
}

/// Convert a decoded tree into the reference decoder's value type.
fn to_reference_form(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(String::from_utf8_lossy(s.as_bytes()).into_owned()),
        Value::Number(Number::Integer(i)) => serde_json::Value::from(*i),
        Value::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::Array(array) => array.iter().map(|(_, v)| to_reference_form(v)).collect(),
        Value::Object(object) => serde_json::Value::Object(
            object
                .iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), to_reference_form(v)))
                .collect(),
        ),
    }
}

/// Integers beyond `i64` decode as floats here; mirror that on the reference side.
fn normalize_reference(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Number(n) if n.as_i64().is_none() && n.as_u64().is_some() => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        serde_json::Value::Array(items) => items.into_iter().map(normalize_reference).collect(),
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_reference(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Results from running a batch of differential tests.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Details of failures.
    pub failures: Vec<FailureDetail>,
}

/// Details about a test failure.
#[derive(Debug)]
pub struct FailureDetail {
    /// Test name.
    pub name: String,
    /// Our outcome.
    pub ours: Outcome,
    /// Reference outcome.
    pub reference: Outcome,
    /// Repro bundle.
    pub repro: ReproBundle,
}

impl BatchResult {
    /// Create a new empty batch result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a passing test.
    pub fn record_pass(&mut self, _name: &str) {
        self.passed += 1;
    }

    /// Record a failing test.
    pub fn record_fail(&mut self, name: &str, ours: Outcome, reference: Outcome, repro: ReproBundle) {
        self.failed += 1;
        self.failures.push(FailureDetail {
            name: name.to_string(),
            ours,
            reference,
            repro,
        });
    }

    /// Record a skipped test.
    pub fn record_skip(&mut self, name: &str, reason: &str) {
        debug!(test = name, reason, "skipped");
        self.skipped += 1;
    }

    /// Check if all tests passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Format a summary string.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.total()
        )
    }
}
