//! Tree-walking encoder.
//!
//! Output format:
//!
//! - strings are written as `"` + raw bytes + `"` with no escaping
//! - integers in plain decimal; floats in general format (see [`super::float`])
//! - arrays as `[a, b]`, objects as `{"k": v, "l": w}` in iteration order
//!
//! The output buffer starts at [`EncodeOptions::initial_capacity`] and grows to
//! `(capacity + requested) * 2` whenever an append does not fit. Growing the
//! output buffer and copying out the final result are fallible allocations;
//! a failure aborts the encode with E300 and frees the scratch buffer.
//! Integers are formatted straight into the output buffer. Floats are
//! rendered into a short scratch string first, which uses the ordinary
//! infallible allocator.

use std::fmt;

use tracing::{debug, trace};

use super::decoder::{STACK_RED_ZONE, STACK_SEGMENT};
use super::float::{format_general, looks_integral};
use super::limits::EncodeOptions;
use crate::error::{ErrorCode, SimjsonResult};
use crate::value::{Array, Number, Object, Value};

const GROW_FACTOR: usize = 2;

/// Growable scratch buffer with the encoder's growth policy.
struct OutputBuffer {
    buf: Vec<u8>,
    capacity: usize,
    /// Failure raised inside a `fmt::Write` call.
    failed: Option<ErrorCode>,
}

impl OutputBuffer {
    fn new(initial_capacity: usize) -> SimjsonResult<Self> {
        let mut buf = Vec::new();
        reserve(&mut buf, initial_capacity)?;
        Ok(Self {
            buf,
            capacity: initial_capacity,
            failed: None,
        })
    }

    fn append(&mut self, bytes: &[u8]) -> SimjsonResult<()> {
        if self.buf.len() + bytes.len() > self.capacity {
            self.grow(bytes.len())?;
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn grow(&mut self, needed: usize) -> SimjsonResult<()> {
        let capacity = self
            .capacity
            .checked_add(needed)
            .and_then(|n| n.checked_mul(GROW_FACTOR))
            .ok_or(ErrorCode::E300_OutOfMemory(u64::MAX))?;
        reserve(&mut self.buf, capacity)?;
        trace!(from = self.capacity, to = capacity, "output buffer grown");
        self.capacity = capacity;
        Ok(())
    }

    /// Format `value` directly into the buffer.
    fn append_display(&mut self, value: impl fmt::Display) -> SimjsonResult<()> {
        use fmt::Write;
        write!(self, "{}", value)
            .map_err(|_| self.failed.take().unwrap_or(ErrorCode::E300_OutOfMemory(0)))
    }

    /// Copy the contents into an exactly sized buffer.
    fn finish(self) -> SimjsonResult<Vec<u8>> {
        let mut out = Vec::new();
        reserve(&mut out, self.buf.len())?;
        out.extend_from_slice(&self.buf);
        Ok(out)
    }
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes()).map_err(|e| {
            self.failed = Some(e);
            fmt::Error
        })
    }
}

/// Ensure `buf` can hold `capacity` bytes in total.
fn reserve(buf: &mut Vec<u8>, capacity: usize) -> SimjsonResult<()> {
    let additional = capacity.saturating_sub(buf.len());
    buf.try_reserve_exact(additional).map_err(|e| {
        debug!(capacity, error = %e, "allocation failed");
        ErrorCode::E300_OutOfMemory(capacity as u64)
    })
}

/// Encoder for one value tree.
pub struct Encoder {
    out: OutputBuffer,
    options: EncodeOptions,
}

impl Encoder {
    /// Create an encoder with an empty output buffer.
    pub fn new(options: EncodeOptions) -> SimjsonResult<Self> {
        Ok(Self {
            out: OutputBuffer::new(options.initial_capacity)?,
            options,
        })
    }

    /// Encode `value` and return the exactly sized output.
    pub fn encode(mut self, value: &Value) -> SimjsonResult<Vec<u8>> {
        if let Err(e) = self.encode_value(value) {
            debug!(error = %e, "encode failed");
            return Err(e);
        }
        self.out.finish()
    }

    fn encode_value(&mut self, value: &Value) -> SimjsonResult<()> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.dispatch(value))
    }

    fn dispatch(&mut self, value: &Value) -> SimjsonResult<()> {
        match value {
            Value::String(s) => self.encode_string(s.as_bytes()),
            Value::Number(n) => self.encode_number(n),
            Value::Boolean(true) => self.out.append(b"true"),
            Value::Boolean(false) => self.out.append(b"false"),
            Value::Null => self.out.append(b"null"),
            Value::Array(array) => self.encode_array(array),
            Value::Object(object) => self.encode_object(object),
        }
    }

    fn encode_string(&mut self, bytes: &[u8]) -> SimjsonResult<()> {
        self.out.append(b"\"")?;
        self.out.append(bytes)?;
        self.out.append(b"\"")
    }

    fn encode_number(&mut self, number: &Number) -> SimjsonResult<()> {
        match number {
            Number::Integer(i) => self.out.append_display(i),
            Number::Float(f) => {
                let text = format_general(*f, self.options.float_precision);
                self.out.append(text.as_bytes())?;
                // Keep the float variant visible to the decoder.
                if looks_integral(&text) {
                    self.out.append(b".0")?;
                }
                Ok(())
            }
        }
    }

    fn encode_array(&mut self, array: &Array) -> SimjsonResult<()> {
        self.out.append(b"[")?;
        for (index, value) in array.iter() {
            if index > 0 {
                self.out.append(b", ")?;
            }
            self.encode_value(value)?;
        }
        self.out.append(b"]")
    }

    fn encode_object(&mut self, object: &Object) -> SimjsonResult<()> {
        self.out.append(b"{")?;
        for (i, (key, value)) in object.iter().enumerate() {
            if i > 0 {
                self.out.append(b", ")?;
            }
            self.encode_string(key)?;
            self.out.append(b": ")?;
            self.encode_value(value)?;
        }
        self.out.append(b"}")
    }
}
