use serde::{Deserialize, Serialize};

use crate::db_types::Booking;

/// Outcome of an idempotent booking insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InsertBookingResult {
    /// A new booking row was created.
    Inserted(Booking),
    /// A booking with the same event id already existed; the stored row is returned untouched.
    AlreadyExists(Booking),
}

impl InsertBookingResult {
    pub fn booking(&self) -> &Booking {
        match self {
            InsertBookingResult::Inserted(b) | InsertBookingResult::AlreadyExists(b) => b,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, InsertBookingResult::Inserted(_))
    }
}
