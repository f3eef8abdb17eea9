use booking_engine::{
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
use chrono::{DateTime, Utc};
use mockall::mock;
use stripe_tools::{CheckoutProvider, CheckoutSession, NewCheckoutSession, Price, Product, StripeApiError};
use tbs_common::Cents;

// One mock standing in for the whole storage backend, mirroring how the server hands a single database handle to
// every engine API.
mock! {
    pub Backend {}
    impl UserManagement for Backend {
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError>;
        async fn insert_user(&self, user: NewUser) -> Result<User, UserApiError>;
        async fn update_password(&self, user_id: i64, password_hash: String, changed_at: DateTime<Utc>) -> Result<User, UserApiError>;
    }
    impl TourManagement for Backend {
        async fn fetch_tour_by_tour_id(&self, tour_id: &TourId) -> Result<Option<Tour>, TourApiError>;
        async fn insert_tour(&self, tour: NewTour) -> Result<Tour, TourApiError>;
    }
    impl BookingManagement for Backend {
        async fn insert_booking(&self, booking: NewBooking) -> Result<InsertBookingResult, BookingApiError>;
        async fn fetch_booking_by_event_id(&self, event_id: &str) -> Result<Option<Booking>, BookingApiError>;
        async fn fetch_bookings_for_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingApiError>;
    }
}

mock! {
    pub Checkout {}
    impl CheckoutProvider for Checkout {
        async fn create_product(&self, name: &str, description: &str) -> Result<Product, StripeApiError>;
        async fn create_price(&self, product_id: &str, unit_amount: Cents, currency: &str) -> Result<Price, StripeApiError>;
        async fn create_checkout_session(&self, params: NewCheckoutSession) -> Result<CheckoutSession, StripeApiError>;
    }
}
