//! Error handling for simjson.
//!
//! Every fallible operation in the crate reports failure through an
//! [`ErrorCode`]. Codes are grouped by taxonomy:
//!
//! - `1xx` syntax failures raised by the decoder
//! - `2xx` usage failures raised by the value model (bad index, bad key, ...)
//! - `3xx` resource failures (allocation) raised by the encoder
//!
//! The numeric code and the variant name are stable and are what the CLI
//! prints in its `{"err": ...}` envelope.

use thiserror::Error;

/// All error codes produced by simjson.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// E100_InvalidJSON (code 100): lookahead byte starts no production
    #[error("E100_InvalidJSON")]
    E100_InvalidJSON,

    /// E101_UnterminatedString (code 101)
    #[error("E101_UnterminatedString")]
    E101_UnterminatedString,

    /// E102_InvalidEscape (code 102): byte following the backslash
    #[error("E102_InvalidEscape({0})")]
    E102_InvalidEscape(/* byte */ u64),

    /// E103_InvalidNumber (code 103)
    #[error("E103_InvalidNumber")]
    E103_InvalidNumber,

    /// E104_InvalidLiteral (code 104): `true`, `false` or `null` misspelled
    #[error("E104_InvalidLiteral")]
    E104_InvalidLiteral,

    /// E105_UnexpectedEnd (code 105)
    #[error("E105_UnexpectedEnd")]
    E105_UnexpectedEnd,

    /// E106_MissingSeparator (code 106): expected `,` or a closing bracket
    #[error("E106_MissingSeparator({0})")]
    E106_MissingSeparator(/* byte */ u64),

    /// E107_MissingColon (code 107)
    #[error("E107_MissingColon")]
    E107_MissingColon,

    /// E108_NonStringKey (code 108)
    #[error("E108_NonStringKey")]
    E108_NonStringKey,

    /// E109_TrailingContent (code 109): non-whitespace after the top-level value
    #[error("E109_TrailingContent")]
    E109_TrailingContent,

    /// E110_InputTooLarge (code 110)
    #[error("E110_InputTooLarge({0}, {1})")]
    E110_InputTooLarge(/* size */ u64, /* limit */ u64),

    /// E111_NestingTooDeep (code 111)
    #[error("E111_NestingTooDeep({0}, {1})")]
    E111_NestingTooDeep(/* depth */ u64, /* limit */ u64),

    /// E200_IndexOutOfRange (code 200)
    #[error("E200_IndexOutOfRange({0}, {1})")]
    E200_IndexOutOfRange(/* index */ u64, /* size */ u64),

    /// E201_EmptyKey (code 201)
    #[error("E201_EmptyKey")]
    E201_EmptyKey,

    /// E202_DuplicateKey (code 202)
    #[error("E202_DuplicateKey({0})")]
    E202_DuplicateKey(/* key */ String),

    /// E203_KeyNotFound (code 203)
    #[error("E203_KeyNotFound({0})")]
    E203_KeyNotFound(/* key */ String),

    /// E204_InvalidNumberPayload (code 204): both or neither payload supplied
    #[error("E204_InvalidNumberPayload")]
    E204_InvalidNumberPayload,

    /// E205_NotUtf8 (code 205): encoded text requested as `String`
    #[error("E205_NotUtf8")]
    E205_NotUtf8,

    /// E206_IteratorStartOutOfRange (code 206): iterator must start on an element
    #[error("E206_IteratorStartOutOfRange({0}, {1})")]
    E206_IteratorStartOutOfRange(/* start */ u64, /* size */ u64),

    /// E300_OutOfMemory (code 300): requested bytes
    #[error("E300_OutOfMemory({0})")]
    E300_OutOfMemory(/* requested */ u64),
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::E100_InvalidJSON => 100,
            ErrorCode::E101_UnterminatedString => 101,
            ErrorCode::E102_InvalidEscape(_) => 102,
            ErrorCode::E103_InvalidNumber => 103,
            ErrorCode::E104_InvalidLiteral => 104,
            ErrorCode::E105_UnexpectedEnd => 105,
            ErrorCode::E106_MissingSeparator(_) => 106,
            ErrorCode::E107_MissingColon => 107,
            ErrorCode::E108_NonStringKey => 108,
            ErrorCode::E109_TrailingContent => 109,
            ErrorCode::E110_InputTooLarge(_, _) => 110,
            ErrorCode::E111_NestingTooDeep(_, _) => 111,
            ErrorCode::E200_IndexOutOfRange(_, _) => 200,
            ErrorCode::E201_EmptyKey => 201,
            ErrorCode::E202_DuplicateKey(_) => 202,
            ErrorCode::E203_KeyNotFound(_) => 203,
            ErrorCode::E204_InvalidNumberPayload => 204,
            ErrorCode::E205_NotUtf8 => 205,
            ErrorCode::E206_IteratorStartOutOfRange(_, _) => 206,
            ErrorCode::E300_OutOfMemory(_) => 300,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E100_InvalidJSON => "E100_InvalidJSON",
            ErrorCode::E101_UnterminatedString => "E101_UnterminatedString",
            ErrorCode::E102_InvalidEscape(_) => "E102_InvalidEscape",
            ErrorCode::E103_InvalidNumber => "E103_InvalidNumber",
            ErrorCode::E104_InvalidLiteral => "E104_InvalidLiteral",
            ErrorCode::E105_UnexpectedEnd => "E105_UnexpectedEnd",
            ErrorCode::E106_MissingSeparator(_) => "E106_MissingSeparator",
            ErrorCode::E107_MissingColon => "E107_MissingColon",
            ErrorCode::E108_NonStringKey => "E108_NonStringKey",
            ErrorCode::E109_TrailingContent => "E109_TrailingContent",
            ErrorCode::E110_InputTooLarge(_, _) => "E110_InputTooLarge",
            ErrorCode::E111_NestingTooDeep(_, _) => "E111_NestingTooDeep",
            ErrorCode::E200_IndexOutOfRange(_, _) => "E200_IndexOutOfRange",
            ErrorCode::E201_EmptyKey => "E201_EmptyKey",
            ErrorCode::E202_DuplicateKey(_) => "E202_DuplicateKey",
            ErrorCode::E203_KeyNotFound(_) => "E203_KeyNotFound",
            ErrorCode::E204_InvalidNumberPayload => "E204_InvalidNumberPayload",
            ErrorCode::E205_NotUtf8 => "E205_NotUtf8",
            ErrorCode::E206_IteratorStartOutOfRange(_, _) => "E206_IteratorStartOutOfRange",
            ErrorCode::E300_OutOfMemory(_) => "E300_OutOfMemory",
        }
    }

    /// Returns true for decoder syntax failures (1xx).
    pub fn is_syntax(&self) -> bool {
        (100..200).contains(&self.code())
    }

    /// Returns true for value-model usage failures (2xx).
    pub fn is_usage(&self) -> bool {
        (200..300).contains(&self.code())
    }

    /// Returns true for resource failures (3xx).
    pub fn is_resource(&self) -> bool {
        self.code() >= 300
    }
}

/// Result type for simjson operations.
pub type SimjsonResult<T> = Result<T, ErrorCode>;

/// Render a byte-string key for an error message.
pub(crate) fn key_for_display(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
