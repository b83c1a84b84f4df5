//! Form submission endpoint
//!
//! Checks one submission against the form rules and answers 200 or 400.
//! Accepted submissions are logged only; nothing is written to storage.

use axum::Form;

use crate::error::Result;
use crate::models::FormSubmission;

/// Body returned for an accepted submission
pub const SUBMIT_SUCCESS: &str = "Form submitted successfully!";

/// `POST /submit`
///
/// Fields are checked in the order first_name, last_name, email, phone,
/// eircode; the first failure is returned as a 400 with a message naming
/// the field.
pub async fn submit_form(Form(submission): Form<FormSubmission>) -> Result<&'static str> {
    submission.check()?;

    tracing::info!(
        first_name = %submission.first_name,
        last_name = %submission.last_name,
        eircode = %submission.eircode,
        "Form submission accepted"
    );

    Ok(SUBMIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn submission(phone: &str, eircode: &str) -> FormSubmission {
        FormSubmission {
            first_name: "Sean".to_string(),
            last_name: "Obrien".to_string(),
            email: "sean@ex.com".to_string(),
            phone: phone.to_string(),
            eircode: eircode.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_accepts_valid_form() {
        let body = submit_form(Form(submission("0871234567", "D02AF30"))).await.unwrap();
        assert_eq!(body, SUBMIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_submit_rejects_short_phone() {
        let err = submit_form(Form(submission("12345", "D02AF30"))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("phone")));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_eircode() {
        let err = submit_form(Form(submission("0871234567", "DUBLIN"))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("eircode")));
    }
}
