//! Validation error types for People Intake models
//!
//! This module defines error types specifically for data validation,
//! separate from the general application errors.

use std::fmt;
use thiserror::Error;

use super::validation::Field;

/// A single field that failed its rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error
    pub kind: ValidationErrorKind,
    /// The field that failed validation
    pub field: Field,
    /// Optional additional context
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(kind: ValidationErrorKind, field: Field) -> Self {
        Self {
            kind,
            field,
            context: None,
        }
    }

    /// Create a validation error with additional context
    pub fn with_context(kind: ValidationErrorKind, field: Field, context: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.field.label(), self.kind)
    }
}

/// Specific validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Field is absent or empty
    #[error("is required")]
    Missing,

    /// Field value is too long
    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    /// Field value contains something other than ASCII letters and digits
    #[error("must contain only letters and digits")]
    NotAlphanumeric,

    /// Email does not look like `local@domain.tld`
    #[error("must be an address like name@example.com")]
    InvalidEmail,

    /// Value is not a base-10 integer
    #[error("must be a whole number")]
    NotAnInteger,

    /// Integer outside the accepted range
    #[error("must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    /// Phone is not exactly ten digits
    #[error("must be exactly 10 digits")]
    InvalidPhone,

    /// Eircode matches neither accepted shape
    #[error("must be an Eircode such as D02AF30")]
    InvalidEircode,
}

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convert validation errors to application errors
impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        crate::error::Error::validation(err.to_string())
    }
}
