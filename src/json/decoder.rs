//! Recursive-descent decoder.
//!
//! Dispatches on the first non-whitespace byte:
//!
//! | Lookahead       | Production |
//! |-----------------|------------|
//! | `"`             | string     |
//! | `-` or digit    | number     |
//! | `t` / `f`       | boolean    |
//! | `n`             | null       |
//! | `[`             | array      |
//! | `{`             | object     |
//!
//! Any syntax failure, at any depth, aborts the whole decode. Partially built
//! containers are owned by the stack frames that are unwinding through `?`,
//! so they are released before the error reaches the caller.

use tracing::{debug, trace};

use super::cursor::Cursor;
use super::limits::DecodeLimits;
use crate::error::{ErrorCode, SimjsonResult};
use crate::value::{Array, JsonString, Number, Object, Value};

/// Bytes allowed after a backslash inside a string.
const ESCAPABLE: &[u8] = b"\"\\/bnrt";

/// Remaining stack below which a nested value is decoded on a fresh segment.
pub(crate) const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each fresh stack segment.
pub(crate) const STACK_SEGMENT: usize = 1024 * 1024;

/// Decoder over one input buffer.
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
    limits: DecodeLimits,
    depth: u64,
}

impl<'a> Decoder<'a> {
    /// Create a decoder for the given input.
    pub fn new(input: &'a [u8], limits: DecodeLimits) -> SimjsonResult<Self> {
        if input.len() as u64 > limits.max_input_size {
            debug!(size = input.len(), limit = limits.max_input_size, "input too large");
            return Err(ErrorCode::E110_InputTooLarge(
                input.len() as u64,
                limits.max_input_size,
            ));
        }

        Ok(Self {
            cursor: Cursor::new(input),
            limits,
            depth: 0,
        })
    }

    /// Decode exactly one value; anything but whitespace after it fails.
    pub fn decode(&mut self) -> SimjsonResult<Value> {
        let value = self.decode_value()?;

        self.cursor.skip_whitespace();
        if !self.cursor.at_end() {
            return Err(self.syntax(ErrorCode::E109_TrailingContent));
        }

        Ok(value)
    }

    fn syntax(&self, code: ErrorCode) -> ErrorCode {
        debug!(offset = self.cursor.position(), error = %code, "syntax error");
        code
    }

    fn decode_value(&mut self) -> SimjsonResult<Value> {
        // Nesting is bounded by the limits, not by the caller's thread stack.
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.dispatch())
    }

    fn dispatch(&mut self) -> SimjsonResult<Value> {
        self.cursor.skip_whitespace();

        match self.cursor.peek() {
            None => Err(self.syntax(ErrorCode::E105_UnexpectedEnd)),
            Some(b'"') => self.decode_string(),
            Some(b'-') | Some(b'0'..=b'9') => self.decode_number(),
            Some(b't') | Some(b'f') => self.decode_boolean(),
            Some(b'n') => self.decode_null(),
            Some(b'[') => self.decode_array(),
            Some(b'{') => self.decode_object(),
            Some(_) => Err(self.syntax(ErrorCode::E100_InvalidJSON)),
        }
    }

    /// Scan a quoted string and return its raw bytes, borrowed from the input.
    ///
    /// Escape pairs are validated but kept as two bytes each.
    fn scan_string(&mut self) -> SimjsonResult<&'a [u8]> {
        // Consume opening quote
        self.cursor.advance();
        let start = self.cursor.position();

        loop {
            match self.cursor.peek() {
                None => return Err(self.syntax(ErrorCode::E101_UnterminatedString)),
                Some(b'"') => break,
                Some(b'\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        None => return Err(self.syntax(ErrorCode::E101_UnterminatedString)),
                        Some(b) if ESCAPABLE.contains(&b) => {
                            self.cursor.advance();
                        }
                        Some(b) => {
                            return Err(self.syntax(ErrorCode::E102_InvalidEscape(u64::from(b))))
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        let raw = self.cursor.slice_from(start);
        // Consume closing quote
        self.cursor.advance();
        Ok(raw)
    }

    fn decode_string(&mut self) -> SimjsonResult<Value> {
        let raw = self.scan_string()?;
        trace!(len = raw.len(), "string");
        Ok(Value::String(JsonString::new(raw)))
    }

    fn decode_number(&mut self) -> SimjsonResult<Value> {
        let rest = self.cursor.rest();

        let (number, consumed) = match scan_integer(rest) {
            Some((integer, consumed)) => (Number::Integer(integer), consumed),
            None => match scan_float(rest) {
                Some((float, consumed)) => (Number::Float(float), consumed),
                None => return Err(self.syntax(ErrorCode::E103_InvalidNumber)),
            },
        };

        self.cursor.skip(consumed);
        trace!(?number, "number");
        Ok(Value::Number(number))
    }

    fn decode_boolean(&mut self) -> SimjsonResult<Value> {
        if self.cursor.starts_with(b"true") {
            self.cursor.skip(4);
            Ok(Value::Boolean(true))
        } else if self.cursor.starts_with(b"false") {
            self.cursor.skip(5);
            Ok(Value::Boolean(false))
        } else {
            Err(self.syntax(ErrorCode::E104_InvalidLiteral))
        }
    }

    fn decode_null(&mut self) -> SimjsonResult<Value> {
        if self.cursor.starts_with(b"null") {
            self.cursor.skip(4);
            Ok(Value::Null)
        } else {
            Err(self.syntax(ErrorCode::E104_InvalidLiteral))
        }
    }

    fn enter(&mut self) -> SimjsonResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(self.syntax(ErrorCode::E111_NestingTooDeep(
                self.depth,
                self.limits.max_nesting_depth,
            )));
        }
        Ok(())
    }

    fn decode_array(&mut self) -> SimjsonResult<Value> {
        self.enter()?;

        // Consume opening bracket
        self.cursor.advance();
        let mut array = Array::new();

        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b']') {
            self.cursor.advance();
            self.depth -= 1;
            return Ok(Value::Array(array));
        }

        loop {
            let value = self.decode_value()?;
            array.push(value);

            self.cursor.skip_whitespace();
            match self.cursor.advance() {
                Some(b',') => continue,
                Some(b']') => break,
                Some(b) => return Err(self.syntax(ErrorCode::E106_MissingSeparator(u64::from(b)))),
                None => return Err(self.syntax(ErrorCode::E105_UnexpectedEnd)),
            }
        }

        trace!(len = array.len(), "array");
        self.depth -= 1;
        Ok(Value::Array(array))
    }

    fn decode_object(&mut self) -> SimjsonResult<Value> {
        self.enter()?;

        // Consume opening brace
        self.cursor.advance();
        let mut object = Object::with_buckets(self.limits.object_bucket_count);

        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b'}') {
            self.cursor.advance();
            self.depth -= 1;
            return Ok(Value::Object(object));
        }

        loop {
            // Expect string key; it stays borrowed until `add` copies it
            self.cursor.skip_whitespace();
            let key = match self.cursor.peek() {
                Some(b'"') => self.scan_string()?,
                Some(_) => return Err(self.syntax(ErrorCode::E108_NonStringKey)),
                None => return Err(self.syntax(ErrorCode::E105_UnexpectedEnd)),
            };

            self.cursor.skip_whitespace();
            match self.cursor.advance() {
                Some(b':') => {}
                Some(_) => return Err(self.syntax(ErrorCode::E107_MissingColon)),
                None => return Err(self.syntax(ErrorCode::E105_UnexpectedEnd)),
            }

            let value = self.decode_value()?;
            object.add(key, value)?;

            self.cursor.skip_whitespace();
            match self.cursor.advance() {
                Some(b',') => continue,
                Some(b'}') => break,
                Some(b) => return Err(self.syntax(ErrorCode::E106_MissingSeparator(u64::from(b)))),
                None => return Err(self.syntax(ErrorCode::E105_UnexpectedEnd)),
            }
        }

        trace!(len = object.len(), "object");
        self.depth -= 1;
        Ok(Value::Object(object))
    }
}

/// Base-10 integer prefix: optional `-` then at least one digit.
///
/// Returns `None` when there are no digits, when the value overflows `i64`,
/// or when the digits run into `.`, `e` or `E` (the caller then tries a float).
fn scan_integer(input: &[u8]) -> Option<(i64, usize)> {
    let sign = usize::from(input.first() == Some(&b'-'));
    let digits = count_digits(&input[sign..]);
    if digits == 0 {
        return None;
    }
    let end = sign + digits;
    if matches!(input.get(end), Some(b'.') | Some(b'e') | Some(b'E')) {
        return None;
    }

    let text = std::str::from_utf8(&input[..end]).ok()?;
    let value = text.parse::<i64>().ok()?;
    Some((value, end))
}

/// Floating-point prefix: `-? digits* (. digits*)? ([eE] [+-]? digits+)?`
/// with at least one mantissa digit.
///
/// An exponent marker not followed by digits is left unconsumed. Results
/// out of the normal `f64` range are rejected: overflow to infinity,
/// underflow to zero from a non-zero mantissa, and subnormal magnitudes.
fn scan_float(input: &[u8]) -> Option<(f64, usize)> {
    let mut end = usize::from(input.first() == Some(&b'-'));

    let int_digits = count_digits(&input[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if input.get(end) == Some(&b'.') {
        frac_digits = count_digits(&input[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    let mantissa_nonzero = input[..end].iter().any(|b| (b'1'..=b'9').contains(b));

    if matches!(input.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(input.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&input[exp_end.min(input.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let text = std::str::from_utf8(&input[..end]).ok()?;
    let value = text.parse::<f64>().ok()?;
    if value.is_infinite() || (value == 0.0 && mantissa_nonzero) || is_subnormal(value) {
        return None;
    }
    Some((value, end))
}

fn is_subnormal(value: f64) -> bool {
    value != 0.0 && value.abs() < f64::MIN_POSITIVE
}

fn count_digits(input: &[u8]) -> usize {
    input.iter().take_while(|b| b.is_ascii_digit()).count()
}
