//! Category name validation.

use crate::error::CoreError;

/// Maximum length for a category name (characters).
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a category name: required, at most [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category name exceeds maximum length of {MAX_NAME_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_within_limit_is_valid() {
        assert!(validate_name("Plumbing").is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn empty_or_long_name_is_invalid() {
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
