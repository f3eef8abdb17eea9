use serde::{Deserialize, Serialize};
use tbs_common::Cents;

use crate::db_types::Booking;

/// A user's booking history with the total they have spent, as returned by the booking query endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResult {
    pub user_id: i64,
    pub total_spent: Cents,
    pub bookings: Vec<Booking>,
}
