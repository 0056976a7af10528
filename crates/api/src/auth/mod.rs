//! Authentication primitives.
//!
//! - [`credentials`]: password storage and username/password sign-in.
//! - [`jwt`]: access tokens issued after sign-in.

pub mod credentials;
pub mod jwt;
