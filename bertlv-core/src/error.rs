use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TLV and OID codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Empty data")]
    EmptyData,

    #[error("Tag mismatch: expected {expected}, found {found}")]
    TagMismatch { expected: String, found: String },

    #[error("Truncated tag: identifier octets end mid-sequence")]
    TruncatedTag,

    #[error("Truncated length field: need {needed} bytes, have {available}")]
    TruncatedLength { needed: usize, available: usize },

    #[error("Truncated value: need {needed} bytes, have {available}")]
    TruncatedValue { needed: usize, available: usize },

    #[error("Indefinite length encoding not supported")]
    IndefiniteLength,

    #[error("Length encoding too large: {octets} bytes (max {max})")]
    LengthOverflow { octets: usize, max: usize },

    #[error("Incomplete encoding: {0}")]
    IncompleteEncoding(String),

    #[error("Arc overflow: {0}")]
    ArcOverflow(String),

    #[error("Invalid component: {0}")]
    InvalidComponent(String),
}

impl CodecError {
    /// Get the kind of this error, without its details
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Format(_) => ErrorKind::Format,
            CodecError::EmptyData => ErrorKind::EmptyData,
            CodecError::TagMismatch { .. } => ErrorKind::TagMismatch,
            CodecError::TruncatedTag => ErrorKind::TruncatedTag,
            CodecError::TruncatedLength { .. } => ErrorKind::TruncatedLength,
            CodecError::TruncatedValue { .. } => ErrorKind::TruncatedValue,
            CodecError::IndefiniteLength => ErrorKind::IndefiniteLength,
            CodecError::LengthOverflow { .. } => ErrorKind::LengthOverflow,
            CodecError::IncompleteEncoding(_) => ErrorKind::IncompleteEncoding,
            CodecError::ArcOverflow(_) => ErrorKind::ArcOverflow,
            CodecError::InvalidComponent(_) => ErrorKind::InvalidComponent,
        }
    }
}

/// Detail-free classification of a [`CodecError`]
///
/// This is what a parse outcome records next to the rendered error message,
/// so callers can branch on the failure without matching the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Format,
    EmptyData,
    TagMismatch,
    TruncatedTag,
    TruncatedLength,
    TruncatedValue,
    IndefiniteLength,
    LengthOverflow,
    IncompleteEncoding,
    ArcOverflow,
    InvalidComponent,
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
