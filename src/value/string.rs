//! Owned byte-string leaf value.

use std::fmt;

/// A JSON string payload.
///
/// Holds an owned byte buffer with an explicit length. Contents are not
/// required to be UTF-8 and may contain embedded zero bytes. Escape sequences
/// read by the decoder are kept verbatim (`\"` stays two bytes).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonString {
    bytes: Box<[u8]>,
}

impl JsonString {
    /// Copy `bytes` into a new string.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: bytes.as_ref().into(),
        }
    }

    /// Raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Contents as `&str`, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the string has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the string and return its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }
}

impl fmt::Debug for JsonString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.bytes))
    }
}

impl From<&str> for JsonString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JsonString {
    fn from(s: String) -> Self {
        Self {
            bytes: s.into_bytes().into_boxed_slice(),
        }
    }
}

impl From<&[u8]> for JsonString {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for JsonString {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_exact_length() {
        let source = b"Hello World!";
        let s = JsonString::new(&source[..5]);
        assert_eq!(s.as_bytes(), b"Hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_str(), Some("Hello"));
    }

    #[test]
    fn embedded_nul_is_kept() {
        let s = JsonString::new(b"a\0b");
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_bytes()[1], 0);
    }

    #[test]
    fn non_utf8_has_no_str_view() {
        let s = JsonString::new([0xFF, 0xFE]);
        assert_eq!(s.as_str(), None);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn empty_string() {
        let s = JsonString::new("");
        assert!(s.is_empty());
    }
}
