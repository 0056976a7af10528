//! Application status values.
//!
//! Three canonical literals are persisted and accepted on the wire. Anything
//! else read back from storage is a defect and surfaces as
//! [`CoreError::Internal`]; anything else submitted by a client is a
//! [`CoreError::Validation`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Newly submitted, not yet looked at by staff.
pub const STATUS_NEW: &str = "new";
/// Accepted by staff; carries an admin comment.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Done; carries a design image.
pub const STATUS_COMPLETED: &str = "completed";

/// All valid status literals.
pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_IN_PROGRESS, STATUS_COMPLETED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    InProgress,
    Completed,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => STATUS_NEW,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    /// Parse a client-supplied status literal.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        value.parse()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_NEW => Ok(Self::New),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid application status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

/// Decoding path for stored rows: an unknown literal in the database is a
/// defect, so it maps to `Internal` instead of `Validation`.
impl TryFrom<String> for ApplicationStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|_| {
            CoreError::Internal(format!("Unknown application status '{value}' in storage"))
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn canonical_literals_round_trip() {
        for literal in VALID_STATUSES {
            let status = ApplicationStatus::parse(literal).unwrap();
            assert_eq!(status.as_str(), *literal);
        }
    }

    #[test]
    fn legacy_short_literal_is_rejected() {
        assert_matches!(ApplicationStatus::parse("n"), Err(CoreError::Validation(_)));
        assert_matches!(ApplicationStatus::parse(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_stored_literal_is_internal() {
        let result = ApplicationStatus::try_from("accepted".to_string());
        assert_matches!(result, Err(CoreError::Internal(msg)) if msg.contains("accepted"));
    }

    #[test]
    fn serde_uses_snake_case_literals() {
        let json = serde_json::to_string(&ApplicationStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: ApplicationStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, ApplicationStatus::Completed);
    }
}
