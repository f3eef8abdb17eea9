//! `SqliteDatabase` is a concrete implementation of a booking engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::db::{bookings, new_pool, tours, users};
use crate::{
    db_types::{Booking, NewBooking, NewTour, NewUser, Tour, TourId, User},
    traits::{
        BookingApiError,
        BookingManagement,
        InsertBookingResult,
        TourApiError,
        TourManagement,
        UserApiError,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating the file if it does not exist yet. Migrations are *not*
    /// applied here; call [`super::db::run_migrations`] on the pool for that.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_id(id, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_email(email, &mut conn).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn update_password(
        &self,
        user_id: i64,
        password_hash: String,
        changed_at: DateTime<Utc>,
    ) -> Result<User, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::update_password(user_id, password_hash, changed_at, &mut conn).await
    }
}

impl TourManagement for SqliteDatabase {
    async fn fetch_tour_by_tour_id(&self, tour_id: &TourId) -> Result<Option<Tour>, TourApiError> {
        let mut conn = self.pool.acquire().await?;
        tours::fetch_tour_by_tour_id(tour_id, &mut conn).await
    }

    async fn insert_tour(&self, tour: NewTour) -> Result<Tour, TourApiError> {
        let mut conn = self.pool.acquire().await?;
        tours::insert_tour(tour, &mut conn).await
    }
}

impl BookingManagement for SqliteDatabase {
    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertBookingResult, BookingApiError> {
        let mut conn = self.pool.acquire().await?;
        bookings::idempotent_insert(booking, &mut conn).await
    }

    async fn fetch_booking_by_event_id(&self, event_id: &str) -> Result<Option<Booking>, BookingApiError> {
        let mut conn = self.pool.acquire().await?;
        bookings::fetch_booking_by_event_id(event_id, &mut conn).await
    }

    async fn fetch_bookings_for_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingApiError> {
        let mut conn = self.pool.acquire().await?;
        bookings::fetch_bookings_for_user(user_id, &mut conn).await
    }
}
