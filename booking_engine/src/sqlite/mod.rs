//! SQLite database module for the tour booking engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
