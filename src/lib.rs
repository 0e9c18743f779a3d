//! simjson - an in-memory JSON value model with a decoder and an encoder.
//!
//! Decoding turns a byte buffer into a tree of [`Value`]s; encoding walks a
//! tree back into compact text. The tree can be built and edited directly
//! through the container types.
//!
//! # Architecture
//!
//! - [`value`] - The value model: strings, numbers, arrays (index-addressed
//!   doubly linked list) and objects (fixed-bucket chained hash table)
//! - [`json`] - Decoder, encoder, limits and float formatting
//! - [`error`] - Error codes shared by every fallible operation
//! - [`conformance`] - Corpus runner and differential harness
//!
//! # Example
//!
//! ```
//! use simjson::{json, Array, Object, Value};
//!
//! let mut info = Array::new();
//! info.push(Value::integer(170));
//! info.push(Value::float(65.5));
//!
//! let mut person = Object::new();
//! person.add("city", Value::string("Shenzhen")).unwrap();
//! person.add("info", Value::Array(info)).unwrap();
//!
//! let text = json::encode(&Value::Object(person)).unwrap();
//! let back = json::decode(&text).unwrap();
//! assert_eq!(back.get("city").and_then(|v| v.as_str()), Some("Shenzhen"));
//! ```

// Library code reports failures through error codes, never by panicking.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod conformance;
pub mod error;
pub mod json;
pub mod value;

// Re-export commonly used types
pub use conformance::{CorpusRunner, DiffResult, DiffTestHarness};
pub use error::{ErrorCode, SimjsonResult};
pub use json::{
    decode, decode_with_limits, encode, encode_to_string, encode_with_options, DecodeLimits,
    EncodeOptions,
};
pub use value::{Array, JsonString, Kind, Number, Object, Value};
