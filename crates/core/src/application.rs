//! Application submission limits and validation.
//!
//! Lengths are counted in characters, not bytes, since titles and
//! descriptions are routinely written in Cyrillic.

use crate::error::CoreError;

/// Maximum length for an application title (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for an application description (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

/// Maximum number of completed applications shown on the public home page.
pub const RECENT_COMPLETED_LIMIT: i64 = 4;

/// Validate the title: required, at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_text("Title", title, MAX_TITLE_LENGTH)
}

/// Validate the description: required, at most [`MAX_DESCRIPTION_LENGTH`] characters.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    validate_text("Description", description, MAX_DESCRIPTION_LENGTH)
}

/// Validate both text fields of a new application.
pub fn validate_submission(title: &str, description: &str) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_description(description)
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}
