//! Domain logic for the servdesk request tracker.
//!
//! Everything in this crate is pure: no database, no HTTP, no filesystem.
//! The DB and API crates call into it for validation, the application status
//! workflow, and authorization decisions.

pub mod access;
pub mod application;
pub mod category;
pub mod error;
pub mod images;
pub mod registration;
pub mod status;
pub mod types;
pub mod workflow;
