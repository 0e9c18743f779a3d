//! Decode limits and encode options.
//!
//! The decoder itself accepts any input the grammar allows; these limits only
//! bound resource use (input size, recursion depth) and pick the bucket count
//! for objects built during decoding.

use crate::value::Object;

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum total input size in bytes (E110)
    pub max_input_size: u64,
    /// Maximum nesting depth for arrays/objects (E111)
    pub max_nesting_depth: u64,
    /// Bucket count for every object the decoder creates (0 = default)
    pub object_bucket_count: usize,
}

impl DecodeLimits {
    /// Default limits used by [`decode`](super::decode).
    pub const fn standard() -> Self {
        Self {
            max_input_size: 64 * 1024 * 1024, // 64 MiB
            max_nesting_depth: 512,
            object_bucket_count: Object::DEFAULT_BUCKET_COUNT,
        }
    }

    /// Lenient limits for trusted, very large or deeply nested documents.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: u64::MAX,
            max_nesting_depth: 4096,
            object_bucket_count: Object::DEFAULT_BUCKET_COUNT,
        }
    }

    /// Same limits with a different object bucket count.
    pub const fn with_object_buckets(mut self, bucket_count: usize) -> Self {
        self.object_bucket_count = bucket_count;
        self
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// Options applied while encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Initial capacity of the output buffer in bytes
    pub initial_capacity: usize,
    /// Significant digits used for floats (general format)
    pub float_precision: usize,
}

impl EncodeOptions {
    /// Initial output buffer size.
    pub const INITIAL_CAPACITY: usize = 32;

    /// Significant digits for floats, as in C's `%g`.
    pub const FLOAT_PRECISION: usize = 6;

    /// Default encode options.
    pub const fn standard() -> Self {
        Self {
            initial_capacity: Self::INITIAL_CAPACITY,
            float_precision: Self::FLOAT_PRECISION,
        }
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_limits() {
        let limits = DecodeLimits::standard();
        assert_eq!(limits.max_input_size, 64 * 1024 * 1024);
        assert_eq!(limits.max_nesting_depth, 512);
        assert_eq!(limits.object_bucket_count, 64);
        assert_eq!(DecodeLimits::default(), limits);
    }

    #[test]
    fn lenient_limits() {
        let limits = DecodeLimits::lenient();
        assert!(limits.max_input_size > DecodeLimits::standard().max_input_size);
        assert!(limits.max_nesting_depth > DecodeLimits::standard().max_nesting_depth);
    }

    #[test]
    fn bucket_override() {
        let limits = DecodeLimits::standard().with_object_buckets(128);
        assert_eq!(limits.object_bucket_count, 128);
    }

    #[test]
    fn encode_defaults() {
        let options = EncodeOptions::default();
        assert_eq!(options.initial_capacity, 32);
        assert_eq!(options.float_precision, 6);
    }
}
