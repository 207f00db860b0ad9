use thiserror::Error;

use crate::value::Kind;

/// Alias for a `Result` with the error type [`BencodeError`].
pub type Result<T, E = BencodeError> = std::result::Result<T, E>;

/// Errors produced while decoding bencode, extracting a kind from a value, or
/// writing encoded output to a sink.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// The byte at a value position does not start any value.
    #[error("unexpected type")]
    UnexpectedType,

    /// The input ended before the current value was complete.
    #[error("unexpected end of string")]
    UnexpectedEof,

    /// An integer's digits were not followed by `e`.
    #[error("expected 'e'")]
    ExpectedEnd,

    /// A string's length prefix was not followed by `:`.
    #[error("expected ':'")]
    ExpectedColon,

    /// A dictionary key position holds something other than a string.
    #[error("expected string token")]
    ExpectedStringToken,

    /// The same key appeared twice in one dictionary.
    #[error("duplicated key in dict: {0}")]
    DuplicatedKey(String),

    /// An integer had no digits after `i` or `-`.
    #[error("expected digit")]
    ExpectedDigit,

    /// An integer or length prefix does not fit its target type.
    #[error("integer overflow")]
    IntegerOverflow,

    #[error("nesting too deep")]
    NestingTooDeep,

    /// A value was extracted as the wrong kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BencodeError {
    /// Returns `true` if the error describes malformed input rather than a
    /// failure of the underlying reader or writer.
    pub fn is_syntax(&self) -> bool {
        !matches!(self, BencodeError::Io(_) | BencodeError::TypeMismatch { .. })
    }
}
