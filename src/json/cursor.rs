//! Read cursor over a decode input buffer.
//!
//! The buffer has an explicit length; nothing relies on a terminating byte.

/// Any byte at or below ASCII space counts as whitespace between tokens.
pub const WHITESPACE_MAX: u8 = 0x20;

/// Forward-only cursor over a borrowed byte buffer.
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once every byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at the current byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consume and return the current byte.
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Move forward by `n` bytes, stopping at the end of input.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.input.len());
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Input between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.pos]
    }

    /// Returns true if the unconsumed input begins with `literal`.
    pub fn starts_with(&self, literal: &[u8]) -> bool {
        self.rest().starts_with(literal)
    }

    /// Skip whitespace (every byte `<= 0x20`).
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b > WHITESPACE_MAX {
                break;
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_advance() {
        let mut cursor = Cursor::new(b"ab");
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.advance(), Some(b'a'));
        assert_eq!(cursor.advance(), Some(b'b'));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.at_end());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn whitespace_includes_control_bytes() {
        let mut cursor = Cursor::new(b" \t\r\n\x01\x00x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some(b'x'));
    }

    #[test]
    fn high_bytes_are_not_whitespace() {
        let mut cursor = Cursor::new(&[0x80, b' ']);
        cursor.skip_whitespace();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn skip_clamps_to_end() {
        let mut cursor = Cursor::new(b"abc");
        cursor.skip(10);
        assert!(cursor.at_end());
        assert!(cursor.rest().is_empty());
    }

    #[test]
    fn literal_prefix() {
        let mut cursor = Cursor::new(b"  true]");
        cursor.skip_whitespace();
        assert!(cursor.starts_with(b"true"));
        assert!(!cursor.starts_with(b"true]x"));
        let start = cursor.position();
        cursor.skip(4);
        assert_eq!(cursor.slice_from(start), b"true");
    }
}
