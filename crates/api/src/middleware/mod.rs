/// Password hashing, bearer tokens and role guards
pub mod auth;
/// Error-to-response mapping
pub mod error_handling;
