//! Numeric leaf value holding either an integer or a float.

use tracing::debug;

use crate::error::{ErrorCode, SimjsonResult};

/// A JSON number: exactly one of a signed 64-bit integer or a 64-bit float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integral value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
}

impl Number {
    /// Build a number from optional integer and float payloads.
    ///
    /// Exactly one of the two must be present; supplying both or neither is
    /// rejected with `E204_InvalidNumberPayload`.
    pub fn new(integer: Option<i64>, float: Option<f64>) -> SimjsonResult<Self> {
        match (integer, float) {
            (Some(i), None) => Ok(Number::Integer(i)),
            (None, Some(f)) => Ok(Number::Float(f)),
            (Some(_), Some(_)) => {
                debug!("one of integer/float must be absent");
                Err(ErrorCode::E204_InvalidNumberPayload)
            }
            (None, None) => {
                debug!("integer and float can't both be absent");
                Err(ErrorCode::E204_InvalidNumberPayload)
            }
        }
    }

    /// Returns true if the integer payload is set.
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns true if the float payload is set.
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// The float payload, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(_) => None,
            Number::Float(f) => Some(*f),
        }
    }

    /// Numeric value widened to `f64` regardless of representation.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Integer(i)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_payload() {
        assert_eq!(Number::new(Some(30), None).unwrap(), Number::Integer(30));
        assert_eq!(Number::new(None, Some(65.5)).unwrap(), Number::Float(65.5));
    }

    #[test]
    fn both_or_neither_rejected() {
        assert_eq!(
            Number::new(Some(1), Some(1.0)),
            Err(ErrorCode::E204_InvalidNumberPayload)
        );
        assert_eq!(
            Number::new(None, None),
            Err(ErrorCode::E204_InvalidNumberPayload)
        );
    }

    #[test]
    fn accessors() {
        let n = Number::from(170);
        assert!(n.is_integer());
        assert_eq!(n.as_i64(), Some(170));
        assert_eq!(n.as_f64(), None);
        assert_eq!(n.to_f64(), 170.0);

        let f = Number::from(-0.25);
        assert!(f.is_float());
        assert_eq!(f.as_f64(), Some(-0.25));
        assert_eq!(f.as_i64(), None);
    }
}
