//! Error types for the scenario codec
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Main error type for codec operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Dictionary construction error
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors while building a built-in dictionary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictionaryError {
    /// More words than two-digit tokens
    #[error("Dictionary overflow: {count} words exceeds maximum {max}")]
    Overflow { count: usize, max: usize },

    /// Empty word in the table
    #[error("Empty word at index {index}")]
    EmptyWord { index: usize },

    /// Same word listed twice
    #[error("Duplicate word: {0}")]
    DuplicateWord(String),
}

/// Errors while decoding a token back into a scenario
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The generic compressor could not restore any text
    #[error("Decompression produced no data")]
    Compression,

    /// The payload delimiter does not appear exactly once
    #[error("Malformed payload: expected exactly 1 delimiter, found {delimiters}")]
    MalformedPayload { delimiters: usize },

    /// The trailing custom word list is unusable
    #[error("Invalid custom word list: {reason}")]
    InvalidWordList { reason: String },

    /// A dictionary token refers to no known word
    #[error("Unknown dictionary token: {token}")]
    UnknownToken { token: String },

    /// The tokenized text could not be split into tokens
    #[error("Malformed token stream at offset {offset}: {reason}")]
    Lex { offset: usize, reason: String },

    /// The restored JSON text is invalid
    #[error("Invalid scenario JSON: {reason}")]
    Parse { reason: String },

    /// The restored JSON is valid but not an object
    #[error("Scenario root is not a JSON object")]
    NotAnObject,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Parse {
            reason: err.to_string(),
        }
    }
}
