//! Utility functions supporting the engine. Password hashing lives here so that both the public API and test
//! fixtures hash credentials the same way.
pub mod password;
