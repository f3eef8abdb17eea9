use thiserror::Error;

use crate::db_types::{NewTour, Tour, TourId};

#[derive(Debug, Clone, Error)]
pub enum TourApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Tour {0} does not exist")]
    TourNotFound(TourId),
}

impl From<sqlx::Error> for TourApiError {
    fn from(e: sqlx::Error) -> Self {
        TourApiError::DatabaseError(e.to_string())
    }
}

/// Read access to the tour catalog mirror. Checkout-session creation and reconciliation both resolve tours by
/// their external id; nothing in the request path ever mutates a tour.
#[allow(async_fn_in_trait)]
pub trait TourManagement {
    /// Fetches the tour with the given external id. If no tour exists, `None` is returned.
    async fn fetch_tour_by_tour_id(&self, tour_id: &TourId) -> Result<Option<Tour>, TourApiError>;

    /// Inserts a tour record. Used by provisioning and test fixtures.
    async fn insert_tour(&self, tour: NewTour) -> Result<Tour, TourApiError>;
}
