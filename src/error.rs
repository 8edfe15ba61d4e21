//! Error Types Module
//!
//! Every fallible boundary of the codec gets its own small error enum rather
//! than one umbrella type, so that callers can match on the failure kind the
//! way the surrounding decode/encode APIs expose it.

use std::fmt;

/// Input exhausted mid-tag during decode.
///
/// This is the sole "needs more input" signal: callers reading from a pipe
/// or socket buffer more bytes and retry the same call. It must never be
/// folded into [`DecodeError`] — a streaming caller depends on telling the
/// two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncompleteData {
    /// Bytes the in-flight read would have needed.
    pub needed: usize,
    /// Bytes actually available when the read was attempted.
    pub available: usize,
}

impl IncompleteData {
    pub(crate) fn new(needed: usize, available: usize) -> Self {
        Self { needed, available }
    }

    /// How many additional bytes the caller should buffer before retrying.
    pub fn shortfall(&self) -> usize {
        self.needed.saturating_sub(self.available)
    }
}

impl fmt::Display for IncompleteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "incomplete data: needed {} bytes, {} available",
            self.needed, self.available
        )
    }
}

impl std::error::Error for IncompleteData {}

/// Well-formed framing but invalid content: unknown tag, bad version byte,
/// compressed length mismatch, non-inflatable payload, and the like.
///
/// This is a value-semantic failure distinct from [`IncompleteData`]: more
/// bytes will never fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The leading byte was not the ETF version magic (0x83).
    InvalidVersion(u8),
    /// No tag byte matched any known ETF wire tag.
    UnknownTag(u8),
    /// A length-prefixed field declared a length inconsistent with its body
    /// (e.g. the compressed envelope's declared uncompressed length).
    LengthMismatch { expected: usize, actual: usize },
    /// Catch-all for malformed structure that does not fit a more specific
    /// variant (e.g. a zero-length `l` tag with a non-nil tail).
    Malformed(String),
}

impl DecodeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        DecodeError::Malformed(message.into())
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidVersion(byte) => {
                write!(f, "invalid version byte: {byte:#04x}")
            }
            DecodeError::UnknownTag(tag) => write!(f, "unknown tag byte: {tag:#04x}"),
            DecodeError::LengthMismatch { expected, actual } => write!(
                f,
                "declared length {expected} does not match actual length {actual}"
            ),
            DecodeError::Malformed(message) => write!(f, "malformed term: {message}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Top-level decode failure: the two kinds a streaming caller needs to tell
/// apart, kept as distinct inner types so a caller can match on
/// `DecodeFailure::Incomplete(_)` separately from `DecodeFailure::Malformed(_)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    Incomplete(IncompleteData),
    Malformed(DecodeError),
}

impl From<IncompleteData> for DecodeFailure {
    fn from(value: IncompleteData) -> Self {
        DecodeFailure::Incomplete(value)
    }
}

impl From<DecodeError> for DecodeFailure {
    fn from(value: DecodeError) -> Self {
        DecodeFailure::Malformed(value)
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::Incomplete(inner) => inner.fmt(f),
            DecodeFailure::Malformed(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for DecodeFailure {}

/// Raised by data-model constructors: wrong argument kind (*type error*) or
/// an out-of-range/empty argument (*value error*).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    TypeError(String),
    ValueError(String),
}

impl ConstructError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ConstructError::TypeError(message.into())
    }

    pub(crate) fn value_error(message: impl Into<String>) -> Self {
        ConstructError::ValueError(message.into())
    }
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructError::TypeError(message) => write!(f, "type error: {message}"),
            ConstructError::ValueError(message) => write!(f, "value error: {message}"),
        }
    }
}

impl std::error::Error for ConstructError {}

/// Returned by every mutator-shaped method on a frozen [`crate::term::Map`]
/// or [`crate::term::ImproperList`]. Carries no payload: the contract is
/// unconditional, not conditional on which mutation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationError;

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot mutate a frozen container")
    }
}

impl std::error::Error for MutationError {}

/// A host value could not be represented in ETF and was not bridged to an
/// opaque carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Unrepresentable(String),
}

impl EncodeError {
    pub(crate) fn unrepresentable(message: impl Into<String>) -> Self {
        EncodeError::Unrepresentable(message.into())
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Unrepresentable(message) => {
                write!(f, "value cannot be encoded: {message}")
            }
        }
    }
}

impl std::error::Error for EncodeError {}
