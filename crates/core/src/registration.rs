//! Registration input and its validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::CoreError;

/// Body of `POST /register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationInput {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
    #[validate(custom(function = "must_agree"))]
    #[serde(default)]
    pub agree_to_terms: bool,
}

fn must_agree(agreed: &bool) -> Result<(), ValidationError> {
    if *agreed {
        Ok(())
    } else {
        let mut err = ValidationError::new("agree_to_terms");
        err.message = Some("Consent to personal data processing is required".into());
        Err(err)
    }
}

/// Trim the identity fields, then run the derived field checks, flattening
/// failures into one [`CoreError::Validation`]. Returns the input exactly as
/// it should be stored.
pub fn validate_registration(mut input: RegistrationInput) -> Result<RegistrationInput, CoreError> {
    input.full_name = input.full_name.trim().to_string();
    input.username = input.username.trim().to_string();
    input.email = input.email.trim().to_string();

    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    Ok(input)
}
