//! Integration tests for People Intake validation rules
//!
//! These tests check the record and form rules end to end through the
//! public model types.

use people_intake::models::{
    validation::{validate_age, validate_eircode, validate_email, validate_name, validate_phone},
    Field, FormSubmission, PersonRecord, PersonRow, ValidationErrorKind,
};
use validator::Validate;

fn row(first: &str, last: &str, email: &str, age: &str) -> PersonRow {
    PersonRow {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email: Some(email.to_string()),
        age: Some(age.to_string()),
    }
}

#[test]
fn test_valid_row_becomes_record() {
    let record = row("Ann", "Lee", "ann@ex.com", "30").validate().unwrap();

    assert_eq!(record.first_name(), "Ann");
    assert_eq!(record.last_name(), "Lee");
    assert_eq!(record.email(), "ann@ex.com");
    assert_eq!(record.age(), 30);
}

#[test]
fn test_apostrophe_in_name_rejected() {
    let err = row("Sean", "O'Brien", "sean@ex.com", "40").validate().unwrap_err();
    assert_eq!(err.field, Field::LastName);
    assert_eq!(err.kind, ValidationErrorKind::NotAlphanumeric);
}

#[test]
fn test_name_length_boundary() {
    assert!(validate_name(&"a".repeat(20), Field::FirstName).is_ok());

    let err = validate_name(&"a".repeat(21), Field::FirstName).unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::TooLong { max: 20 });

    assert_eq!(
        validate_name("", Field::FirstName).unwrap_err().kind,
        ValidationErrorKind::Missing
    );
}

#[test]
fn test_age_boundaries() {
    assert_eq!(validate_age("0").unwrap(), 0);
    assert_eq!(validate_age("150").unwrap(), 150);
    assert!(validate_age("151").is_err());
    assert!(validate_age("-1").is_err());
    assert_eq!(validate_age("abc").unwrap_err().kind, ValidationErrorKind::NotAnInteger);
}

#[test]
fn test_email_shape() {
    assert!(validate_email("a@b.c").is_ok());
    assert!(validate_email("a@b").is_err());
    assert!(validate_email("a b@c.d").is_err());
}

#[test]
fn test_phone_and_eircode() {
    assert!(validate_phone("0871234567").is_ok());
    assert!(validate_phone("087123456").is_err());
    assert!(validate_phone("08712345678").is_err());

    assert!(validate_eircode("123456").is_ok());
    assert!(validate_eircode("D02AF30").is_ok());
    assert!(validate_eircode("DUBLIN").is_err());
}

#[test]
fn test_missing_column_is_rejected() {
    let mut incomplete = row("Ann", "Lee", "ann@ex.com", "30");
    incomplete.age = None;

    let err = incomplete.validate().unwrap_err();
    assert_eq!(err.field, Field::Age);
    assert_eq!(err.kind, ValidationErrorKind::Missing);
}

#[test]
fn test_validation_is_idempotent() {
    let valid = row("Ann", "Lee", "ann@ex.com", "30");
    assert_eq!(valid.validate(), valid.validate());

    let invalid = row("Ann", "Lee", "ann.ex.com", "30");
    assert_eq!(invalid.validate(), invalid.validate());
}

#[test]
fn test_record_parse_matches_row_validation() {
    let parsed = PersonRecord::parse("Ann", "Lee", "ann@ex.com", "30").unwrap();
    let validated = row("Ann", "Lee", "ann@ex.com", "30").validate().unwrap();
    assert_eq!(parsed, validated);
}

#[test]
fn test_form_submission_first_failure() {
    let form = FormSubmission {
        first_name: "Sean".to_string(),
        last_name: "Obrien".to_string(),
        email: "sean@ex.com".to_string(),
        phone: "12345".to_string(),
        eircode: "bad".to_string(),
    };

    let err = form.check().unwrap_err();
    assert_eq!(err.field, Field::Phone);
    assert!(err.to_string().contains("phone"));

    // the derived validator reports every failing field
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.field_errors().len(), 2);
}

#[test]
fn test_form_submission_deserializes() {
    let form: FormSubmission = serde_json::from_value(serde_json::json!({
        "first_name": "Ann",
        "last_name": "Lee",
        "email": "ann@ex.com",
        "phone": "0123456789",
        "eircode": "123456"
    }))
    .unwrap();

    assert!(form.check().is_ok());
}
