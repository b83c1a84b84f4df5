//! Person data models for People Intake
//!
//! `PersonRow` is a CSV row as read, `PersonRecord` is a row that passed
//! every rule and is ready for storage, and `FormSubmission` is the payload
//! posted by the web form.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use validator::Validate;

use super::error::ValidationResult;
use super::validation::{
    validate_age, validate_email_format, validate_eircode_format, validate_fields,
    validate_name_format, validate_phone_format, Field, FieldSource, FORM_FIELDS, PERSON_FIELDS,
};

/// A person that passed validation
///
/// The only way to obtain one is through [`PersonRow::validate`] (or
/// [`PersonRecord::parse`]), so every value of this type satisfies the
/// name, email and age rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    first_name: String,
    last_name: String,
    email: String,
    age: i32,
}

impl PersonRecord {
    /// Validate raw field values into a record
    pub fn parse(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        age: impl Into<String>,
    ) -> ValidationResult<Self> {
        PersonRow {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            age: Some(age.into()),
        }
        .validate()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// One CSV row keyed by header name
///
/// Columns missing from the header (or short rows) leave the field `None`,
/// which fails validation as a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
}

impl PersonRow {
    /// Check every field in order and build the record
    pub fn validate(&self) -> ValidationResult<PersonRecord> {
        validate_fields(self, PERSON_FIELDS)?;

        Ok(PersonRecord {
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            age: validate_age(self.age.as_deref().unwrap_or_default())?,
        })
    }

    /// Boolean form of [`PersonRow::validate`]
    pub fn is_valid(&self) -> bool {
        validate_fields(self, PERSON_FIELDS).is_ok()
    }
}

impl FieldSource for PersonRow {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => self.first_name.as_deref(),
            Field::LastName => self.last_name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Age => self.age.as_deref(),
            Field::Phone | Field::Eircode => None,
        }
    }
}

impl TryFrom<PersonRow> for PersonRecord {
    type Error = super::error::ValidationError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        row.validate()
    }
}

/// Payload of `POST /submit`
///
/// Absent form fields deserialize to empty strings so they are reported by
/// name instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FormSubmission {
    #[validate(custom(function = "validate_name_format"))]
    pub first_name: String,

    #[validate(custom(function = "validate_name_format"))]
    pub last_name: String,

    #[validate(custom(function = "validate_email_format"))]
    pub email: String,

    #[validate(custom(function = "validate_phone_format"))]
    pub phone: String,

    #[validate(custom(function = "validate_eircode_format"))]
    pub eircode: String,
}

impl FormSubmission {
    /// Check fields in form order and report the first failure
    pub fn check(&self) -> ValidationResult<()> {
        validate_fields(self, FORM_FIELDS)
    }
}

impl FieldSource for FormSubmission {
    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => Some(&self.first_name),
            Field::LastName => Some(&self.last_name),
            Field::Email => Some(&self.email),
            Field::Phone => Some(&self.phone),
            Field::Eircode => Some(&self.eircode),
            Field::Age => None,
        }
    }
}
