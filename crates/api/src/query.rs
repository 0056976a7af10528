//! Shared query parameter types for API handlers.

use serde::Deserialize;
use servdesk_core::error::CoreError;
use servdesk_core::status::ApplicationStatus;

/// Optional `?status=` filter on application lists.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    /// Parse the filter; an empty value means "no filter".
    pub fn parse(&self) -> Result<Option<ApplicationStatus>, CoreError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => ApplicationStatus::parse(raw).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn filter(status: Option<&str>) -> StatusFilter {
        StatusFilter {
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn empty_filter_means_all() {
        assert_matches!(filter(None).parse(), Ok(None));
        assert_matches!(filter(Some("")).parse(), Ok(None));
    }

    #[test]
    fn canonical_literals_parse() {
        assert_matches!(
            filter(Some("in_progress")).parse(),
            Ok(Some(ApplicationStatus::InProgress))
        );
    }

    #[test]
    fn unknown_literal_is_validation_error() {
        assert_matches!(filter(Some("n")).parse(), Err(CoreError::Validation(_)));
    }
}
