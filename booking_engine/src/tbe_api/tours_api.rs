//! Unified API for tour catalog lookups.

use std::fmt::Debug;

use crate::{
    db_types::{NewTour, Tour, TourId},
    traits::{TourApiError, TourManagement},
};

pub struct TourApi<B> {
    db: B,
}

impl<B: Debug> Debug for TourApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TourApi ({:?})", self.db)
    }
}

impl<B> TourApi<B>
where B: TourManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the tour with the given external id. If no tour exists, `None` is returned.
    pub async fn fetch_tour(&self, tour_id: &TourId) -> Result<Option<Tour>, TourApiError> {
        self.db.fetch_tour_by_tour_id(tour_id).await
    }

    /// Inserts a tour record. Provisioning and fixtures only; nothing in the request path creates tours.
    pub async fn insert_tour(&self, tour: NewTour) -> Result<Tour, TourApiError> {
        self.db.insert_tour(tour).await
    }
}
