//! Unified API for booking queries.

use std::fmt::Debug;

use crate::{
    tbe_api::booking_objects::BookingResult,
    traits::{BookingApiError, BookingManagement},
};

pub struct BookingApi<B> {
    db: B,
}

impl<B: Debug> Debug for BookingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BookingApi ({:?})", self.db)
    }
}

impl<B> BookingApi<B>
where B: BookingManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches all bookings for the given user, wrapped in a [`BookingResult`] that includes the sum of the
    /// booking prices.
    pub async fn bookings_for_user(&self, user_id: i64) -> Result<BookingResult, BookingApiError> {
        let bookings = self.db.fetch_bookings_for_user(user_id).await?;
        let total_spent = bookings.iter().map(|b| b.price).sum();
        Ok(BookingResult { user_id, total_spent, bookings })
    }
}
