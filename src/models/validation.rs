//! Field-format rules shared by the CSV import and the web form
//!
//! Every rule is keyed by [`Field`]. An entry point describes itself by the
//! ordered list of fields it requires and a [`FieldSource`] that yields each
//! field's raw value; [`validate_fields`] reports the first failure in that
//! order.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use super::error::{ValidationError, ValidationErrorKind, ValidationResult};

/// Longest accepted first or last name
pub const NAME_MAX_LEN: usize = 20;
/// Youngest accepted age
pub const AGE_MIN: i64 = 0;
/// Oldest accepted age
pub const AGE_MAX: i64 = 150;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static EIRCODE_REGEX: OnceLock<Regex> = OnceLock::new();
static EIRCODE_POSTAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]{1,20}$").expect("Invalid name regex pattern"))
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Invalid email regex pattern"))
}

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("Invalid phone regex pattern"))
}

fn eircode_regex() -> &'static Regex {
    EIRCODE_REGEX
        .get_or_init(|| Regex::new(r"^[0-9][a-zA-Z0-9]{5}$").expect("Invalid eircode regex pattern"))
}

/// Routing key (letter, digit, digit or W) and a four character identifier
fn eircode_postal_regex() -> &'static Regex {
    EIRCODE_POSTAL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][0-9][0-9wW] ?[a-zA-Z0-9]{4}$").expect("Invalid eircode regex pattern")
    })
}

/// A field known to the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Age,
    Phone,
    Eircode,
}

impl Field {
    /// Column or form field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Age => "age",
            Field::Phone => "phone",
            Field::Eircode => "eircode",
        }
    }

    /// Human readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::Email => "email",
            Field::Age => "age",
            Field::Phone => "phone",
            Field::Eircode => "eircode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields required by a CSV person row, in check order
pub const PERSON_FIELDS: &[Field] = &[Field::FirstName, Field::LastName, Field::Email, Field::Age];

/// Fields required by the web form, in check order
pub const FORM_FIELDS: &[Field] = &[
    Field::FirstName,
    Field::LastName,
    Field::Email,
    Field::Phone,
    Field::Eircode,
];

/// Something that can hand the validator a raw field value
pub trait FieldSource {
    /// Raw value of `field`, or `None` when the source does not carry it
    fn field(&self, field: Field) -> Option<&str>;
}

/// Validate `fields` of `source` in order, stopping at the first failure
pub fn validate_fields<S>(source: &S, fields: &[Field]) -> ValidationResult<()>
where
    S: FieldSource + ?Sized,
{
    fields
        .iter()
        .try_for_each(|&field| validate_field(field, source.field(field)))
}

/// Apply the rule for `field` to a raw value
pub fn validate_field(field: Field, value: Option<&str>) -> ValidationResult<()> {
    let value = value.unwrap_or_default();
    match field {
        Field::FirstName | Field::LastName => validate_name(value, field),
        Field::Email => validate_email(value),
        Field::Age => validate_age(value).map(|_| ()),
        Field::Phone => validate_phone(value),
        Field::Eircode => validate_eircode(value),
    }
}

/// 1-20 ASCII letters or digits
pub fn validate_name(value: &str, field: Field) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Missing, field));
    }

    if name_regex().is_match(value) {
        return Ok(());
    }

    let kind = if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        ValidationErrorKind::TooLong { max: NAME_MAX_LEN }
    } else {
        ValidationErrorKind::NotAlphanumeric
    };
    Err(ValidationError::new(kind, field))
}

/// Non-space characters, "@", non-space characters, ".", non-space characters
pub fn validate_email(value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Missing, Field::Email));
    }

    if email_regex().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(ValidationErrorKind::InvalidEmail, Field::Email))
    }
}

/// Base-10 integer in `AGE_MIN..=AGE_MAX`; returns the parsed age
pub fn validate_age(value: &str) -> ValidationResult<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Missing, Field::Age));
    }

    let age: i64 = trimmed.parse().map_err(|e| {
        ValidationError::with_context(
            ValidationErrorKind::NotAnInteger,
            Field::Age,
            format!("Failed to parse {:?}: {}", value, e),
        )
    })?;

    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(ValidationError::with_context(
            ValidationErrorKind::OutOfRange {
                min: AGE_MIN,
                max: AGE_MAX,
            },
            Field::Age,
            format!("got {}", age),
        ));
    }

    // bounded by AGE_MAX above
    Ok(age as i32)
}

/// Exactly ten ASCII digits
pub fn validate_phone(value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Missing, Field::Phone));
    }

    if phone_regex().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(ValidationErrorKind::InvalidPhone, Field::Phone))
    }
}

/// One digit followed by five ASCII letters or digits, or a postal Eircode
/// such as `D02AF30` / `D02 AF30`
pub fn validate_eircode(value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::Missing, Field::Eircode));
    }

    if eircode_regex().is_match(value) || eircode_postal_regex().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(ValidationErrorKind::InvalidEircode, Field::Eircode))
    }
}

/// Name rule for the validator crate
pub fn validate_name_format(value: &str) -> Result<(), validator::ValidationError> {
    validate_name(value, Field::FirstName)
        .map_err(|_| validator::ValidationError::new("Name must be 1-20 letters or digits"))
}

/// Email rule for the validator crate
pub fn validate_email_format(value: &str) -> Result<(), validator::ValidationError> {
    validate_email(value).map_err(|_| validator::ValidationError::new("Invalid email format"))
}

/// Phone rule for the validator crate
pub fn validate_phone_format(value: &str) -> Result<(), validator::ValidationError> {
    validate_phone(value).map_err(|_| validator::ValidationError::new("Phone must be 10 digits"))
}

/// Eircode rule for the validator crate
pub fn validate_eircode_format(value: &str) -> Result<(), validator::ValidationError> {
    validate_eircode(value).map_err(|_| validator::ValidationError::new("Invalid eircode format"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_validate_name_valid() {
        let valid = vec!["A", "Sean", "Obrien", "abc123", "X1", "ABCDEFGHIJKLMNOPQRST"];
        for name in valid {
            assert!(validate_name(name, Field::FirstName).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_validate_name_invalid() {
        let invalid = vec![
            "",
            "O'Brien",
            "Mary Ann",
            "Jean-Luc",
            "Zoë",
            " Sean",
            "ABCDEFGHIJKLMNOPQRSTU",
        ];
        for name in invalid {
            assert!(validate_name(name, Field::LastName).is_err(), "{name}");
        }
    }

    #[test]
    fn test_validate_name_error_kinds() {
        let err = validate_name("", Field::FirstName).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::Missing);

        let err = validate_name(&"a".repeat(21), Field::FirstName).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TooLong { max: 20 });

        let err = validate_name("O'Brien", Field::LastName).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotAlphanumeric);
        assert_eq!(err.field, Field::LastName);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sean@ex.com").is_ok());
        assert!(validate_email("a.b@mail.example.ie").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("sean.ex.com").is_err());
        assert!(validate_email("sean@excom").is_err());
        assert!(validate_email("sean @ex.com").is_err());
        assert!(validate_email("sean@ex .com").is_err());
        assert!(validate_email("sean@ex.com ").is_err());
    }

    #[test]
    fn test_validate_age_range() {
        for age in 0..=150 {
            assert_eq!(validate_age(&age.to_string()).unwrap(), age);
        }
    }

    #[test]
    fn test_validate_age_invalid() {
        let err = validate_age("-1").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange { min: 0, max: 150 });

        let err = validate_age("151").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::OutOfRange { min: 0, max: 150 });

        for value in ["forty", "40.5", "4O", "NaN", "99999999999999999999"] {
            let err = validate_age(value).unwrap_err();
            assert_eq!(err.kind, ValidationErrorKind::NotAnInteger, "{value}");
        }

        assert_eq!(validate_age("").unwrap_err().kind, ValidationErrorKind::Missing);
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0871234567").is_ok());

        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("08712345678").is_err());
        assert!(validate_phone("087 123 456").is_err());
        assert!(validate_phone("087123456a").is_err());
    }

    #[test]
    fn test_validate_eircode() {
        assert!(validate_eircode("2DAF30").is_ok());
        assert!(validate_eircode("012345").is_ok());
        assert!(validate_eircode("D02AF30").is_ok());
        assert!(validate_eircode("D02 AF30").is_ok());
        assert!(validate_eircode("D6WXY12").is_ok());

        assert!(validate_eircode("").is_err());
        assert!(validate_eircode("1234").is_err());
        assert!(validate_eircode("1 2345").is_err());
        assert!(validate_eircode("DD2AF30").is_err());
        assert!(validate_eircode("D02AF3").is_err());
        assert!(validate_eircode("D02-AF30").is_err());
    }

    struct MapSource(HashMap<Field, &'static str>);

    impl FieldSource for MapSource {
        fn field(&self, field: Field) -> Option<&str> {
            self.0.get(&field).copied()
        }
    }

    #[test]
    fn test_validate_fields_reports_first_failure_in_order() {
        let source = MapSource(HashMap::from([
            (Field::FirstName, "Sean"),
            (Field::LastName, "O'Brien"),
            (Field::Email, "not-an-email"),
        ]));

        let err = validate_fields(&source, PERSON_FIELDS).unwrap_err();
        assert_eq!(err.field, Field::LastName);
    }

    #[test]
    fn test_validate_fields_missing_field() {
        let source = MapSource(HashMap::from([
            (Field::FirstName, "Sean"),
            (Field::LastName, "Obrien"),
            (Field::Email, "sean@ex.com"),
        ]));

        let err = validate_fields(&source, PERSON_FIELDS).unwrap_err();
        assert_eq!(err.field, Field::Age);
        assert_eq!(err.kind, ValidationErrorKind::Missing);

        // the same source satisfies a rule set that does not need age
        assert!(validate_fields(&source, &PERSON_FIELDS[..3]).is_ok());
    }

    #[test]
    fn test_validator_crate_adapters() {
        assert!(validate_name_format("Sean").is_ok());
        assert!(validate_name_format("O'Brien").is_err());
        assert!(validate_email_format("sean@ex.com").is_ok());
        assert!(validate_phone_format("12345").is_err());
        assert!(validate_eircode_format("1AB234").is_ok());
        assert!(validate_eircode_format("ABCDEF").is_err());
    }
}
