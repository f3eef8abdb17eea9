//! Tour Booking Engine
//!
//! The booking engine holds the domain types and storage logic for the tour booking gateway. It is
//! HTTP-framework-agnostic: the server crate drives it through the public APIs and never touches the database
//! directly.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the only supported backend at present, but all
//!    access goes through the backend traits in [`mod@traits`], so additional backends only need to implement those.
//!    The data types used in the database are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@tbe_api`]). This provides the public-facing functionality: user credential
//!    management, tour lookups, booking queries, and the checkout reconciliation flow that turns verified payment
//!    events into booking records.
pub mod db_types;
pub mod helpers;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod tbe_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use tbe_api::{
    booking_flow_api::BookingFlowApi,
    booking_objects,
    bookings_api::BookingApi,
    errors::BookingFlowError,
    tours_api::TourApi,
    users_api::UserApi,
};
pub use traits::{
    BookingApiError,
    BookingManagement,
    InsertBookingResult,
    TourApiError,
    TourManagement,
    UserApiError,
    UserManagement,
};
