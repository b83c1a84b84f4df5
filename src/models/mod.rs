//! Data models for People Intake
//!
//! This module contains the person records accepted by the service, the
//! field-format rules they are checked against, and the validation errors
//! those rules produce.

pub mod error;
pub mod person;
pub mod validation;

// Re-export commonly used types
pub use error::{ValidationError, ValidationErrorKind, ValidationResult};
pub use person::{FormSubmission, PersonRecord, PersonRow};
pub use validation::{validate_fields, Field, FieldSource, FORM_FIELDS, PERSON_FIELDS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _row = PersonRow::default();
        let _form = FormSubmission::default();
        let _error = ValidationError::new(ValidationErrorKind::Missing, Field::Email);
        assert_eq!(PERSON_FIELDS.len(), 4);
        assert_eq!(FORM_FIELDS.len(), 5);
    }
}
