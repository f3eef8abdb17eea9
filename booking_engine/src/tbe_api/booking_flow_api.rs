use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Booking, CompletedCheckout, NewBooking},
    tbe_api::errors::BookingFlowError,
    traits::{BookingManagement, InsertBookingResult, TourManagement, UserManagement},
};

/// `BookingFlowApi` is the reconciliation flow: it converts verified "checkout completed" payment events into
/// booking records, exactly once per event.
pub struct BookingFlowApi<B> {
    db: B,
}

impl<B> Debug for BookingFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BookingFlowApi")
    }
}

impl<B> BookingFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> BookingFlowApi<B>
where B: UserManagement + TourManagement + BookingManagement
{
    /// Processes a verified checkout event.
    ///
    /// The paying user is resolved by the customer email the provider captured at checkout; the tour comes from
    /// the reference id this system embedded when it created the session. Both must exist, otherwise the event is
    /// reported as a soft failure for the caller to acknowledge. The insert itself is keyed on the event id, so
    /// redelivery of an already-processed event returns [`BookingFlowError::EventAlreadyProcessed`] instead of a
    /// second booking.
    pub async fn process_completed_checkout(&self, checkout: CompletedCheckout) -> Result<Booking, BookingFlowError> {
        debug!("🥾 Processing {checkout}");
        let email = checkout.customer_email.to_lowercase();
        let user = self
            .db
            .fetch_user_by_email(&email)
            .await?
            .ok_or_else(|| BookingFlowError::UnknownCustomer(email.clone()))?;
        let tour = self
            .db
            .fetch_tour_by_tour_id(&checkout.tour_id)
            .await?
            .ok_or_else(|| BookingFlowError::TourNotFound(checkout.tour_id.clone()))?;
        let booking = NewBooking::new(checkout.event_id.clone(), tour.tour_id.clone(), user.id, checkout.amount);
        match self.db.insert_booking(booking).await? {
            InsertBookingResult::Inserted(booking) => {
                info!(
                    "🥾 Booking #{} created: user #{} on tour [{}] for {}",
                    booking.id, booking.user_id, booking.tour_id, booking.price
                );
                Ok(booking)
            },
            InsertBookingResult::AlreadyExists(existing) => {
                debug!("🥾 Event [{}] was already reconciled into booking #{}", checkout.event_id, existing.id);
                Err(BookingFlowError::EventAlreadyProcessed(checkout.event_id))
            },
        }
    }
}
