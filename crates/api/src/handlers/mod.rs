pub mod admin;
pub mod applications;
pub mod auth;
pub mod categories;
pub mod home;
