//! Conformance testing against recorded vectors and a reference decoder.
//!
//! Two kinds of check live here:
//!
//! - [`CorpusRunner`] executes a JSON corpus of decode/round-trip vectors and
//!   compares byte-exact encoder output or error codes.
//! - [`DiffTestHarness`] decodes the same input with this crate and with
//!   `serde_json`, and compares the resulting trees. A mismatch carries a
//!   [`ReproBundle`] that can be written to disk.
//!
//! The reference decoder only agrees with this crate inside the shared
//! grammar: strings without escapes, no duplicate or empty keys, standard
//! whitespace. Inputs containing a backslash are reported as skipped.

pub mod corpus;
mod harness;
mod repro;

pub use corpus::{Corpus, CorpusManifest, CorpusResults, CorpusRunner, TestResult, TestVector};
pub use harness::{BatchResult, DiffResult, DiffTestHarness, FailureDetail};
pub use repro::{Outcome, ReproBundle};

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while loading or saving conformance artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The corpus file is not valid corpus JSON
    #[error("invalid corpus: {0}")]
    InvalidCorpus(#[from] serde_json::Error),
}
