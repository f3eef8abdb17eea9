//! # Database backend contracts.
//!
//! This module defines the interface contracts that storage *backends* of the booking engine must expose.
//!
//! ## Users
//! The user table is the credential store for the gateway. The authentication path only ever reads it
//! (lookups by id and email); the write operations exist for account provisioning and password rotation and are
//! never called from a request guard.
//!
//! ## Traits
//! * [`UserManagement`] defines credential-store access: user lookups, account creation and password rotation.
//! * [`TourManagement`] defines lookups against the tour catalog mirror used by checkout and reconciliation.
//! * [`BookingManagement`] defines the booking ledger, including the idempotent insert keyed on the payment
//!   provider's event id.
mod booking_management;
mod tour_management;
mod user_management;

mod data_objects;

pub use booking_management::{BookingApiError, BookingManagement};
pub use data_objects::InsertBookingResult;
pub use tour_management::{TourApiError, TourManagement};
pub use user_management::{UserApiError, UserManagement};
