use thiserror::Error;

use crate::{
    db_types::{Booking, NewBooking},
    traits::InsertBookingResult,
};

#[derive(Debug, Clone, Error)]
pub enum BookingApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for BookingApiError {
    fn from(e: sqlx::Error) -> Self {
        BookingApiError::DatabaseError(e.to_string())
    }
}

/// The booking ledger. Bookings are created exclusively by the reconciliation flow and never mutated afterwards.
#[allow(async_fn_in_trait)]
pub trait BookingManagement {
    /// Inserts the booking if no booking with the same event id exists yet. The event id carries a unique
    /// constraint, so redelivery of the same payment event can never produce a second row.
    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertBookingResult, BookingApiError>;

    /// Fetches the booking created by the given payment event, if any.
    async fn fetch_booking_by_event_id(&self, event_id: &str) -> Result<Option<Booking>, BookingApiError>;

    /// Fetches all bookings belonging to the given user, oldest first.
    async fn fetch_bookings_for_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingApiError>;
}
