//! # Booking engine public API
//!
//! The `tbe_api` module exposes the programmatic API for the booking engine.
//! The API is modular, so that clients can pick and choose the functionality they want; the server composes
//! several of them over a single shared backend.
//!
//! * [`users_api`] covers the credential store: lookups for the auth gate, signup, and password rotation.
//! * [`tours_api`] resolves tours from the catalog mirror for checkout and reconciliation.
//! * [`bookings_api`] answers booking queries (per-user history and totals).
//! * [`booking_flow_api`] is the reconciliation flow: it turns a verified "checkout completed" payment event into
//!   exactly one booking record.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API.
//!
//! For example, to look up a user's bookings:
//!
//! ```rust,ignore
//! use booking_engine::{BookingApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements BookingManagement
//! let api = BookingApi::new(db);
//! let history = api.bookings_for_user(user_id).await?;
//! ```

pub mod booking_flow_api;
pub mod booking_objects;
pub mod bookings_api;
pub mod errors;
pub mod tours_api;
pub mod users_api;
