//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., identifier)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be parsed
    MalformedBody { reason: String },

    /// Path parameters could not be extracted
    MalformedPath { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::MalformedBody { reason } => write!(f, "invalid JSON body: {}", reason),
            Self::MalformedPath { reason } => write!(f, "invalid path: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
