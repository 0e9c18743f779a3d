//! JSON decoding and encoding.
//!
//! The decoder turns a byte buffer into a [`Value`] tree; the encoder walks a
//! tree back into bytes.
//!
//! # Architecture
//!
//! - [`cursor`] - Read position over the input buffer
//! - [`decoder`] - Scannerless recursive-descent decoder
//! - [`encoder`] - Tree-walking encoder with a growable output buffer
//! - [`float`] - General-format float rendering
//! - [`limits`] - Decode limits and encode options
//!
//! # Format notes
//!
//! - Whitespace between tokens is any byte `<= 0x20`.
//! - Strings are stored raw: escapes are validated but not decoded, and the
//!   encoder writes string bytes back unchanged. `\u` escapes are rejected.
//! - Integers that fit `i64` stay integers; anything else numeric is a float.
//! - Floats are encoded with six significant digits by default, so decoding
//!   an encoded float may lose precision.
//!
//! # Example
//!
//! ```
//! use simjson::json::{decode, encode_to_string};
//!
//! let value = decode(br#"{"age": 30, "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(value.get("age").and_then(|v| v.as_i64()), Some(30));
//!
//! let text = encode_to_string(value.get("tags").unwrap()).unwrap();
//! assert_eq!(text, r#"["a", "b"]"#);
//! ```

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod float;
pub mod limits;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use limits::{DecodeLimits, EncodeOptions};

use crate::error::{ErrorCode, SimjsonResult};
use crate::value::Value;

/// Decode a complete JSON document with the standard limits.
pub fn decode(input: impl AsRef<[u8]>) -> SimjsonResult<Value> {
    decode_with_limits(input, DecodeLimits::standard())
}

/// Decode a complete JSON document with custom limits.
pub fn decode_with_limits(input: impl AsRef<[u8]>, limits: DecodeLimits) -> SimjsonResult<Value> {
    Decoder::new(input.as_ref(), limits)?.decode()
}

/// Encode a value tree with the default options.
pub fn encode(value: &Value) -> SimjsonResult<Vec<u8>> {
    encode_with_options(value, EncodeOptions::standard())
}

/// Encode a value tree with custom options.
pub fn encode_with_options(value: &Value, options: EncodeOptions) -> SimjsonResult<Vec<u8>> {
    Encoder::new(options)?.encode(value)
}

/// Encode a value tree into a `String`.
///
/// Fails with `E205_NotUtf8` if any string in the tree holds bytes that are
/// not valid UTF-8.
pub fn encode_to_string(value: &Value) -> SimjsonResult<String> {
    String::from_utf8(encode(value)?).map_err(|_| ErrorCode::E205_NotUtf8)
}
