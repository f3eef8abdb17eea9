//! Helpers for wiring up throwaway databases and fixtures in tests.
pub mod prepare_env;

pub use prepare_env::{memory_db, seed_tour, seed_user};
