use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Booking, NewBooking},
    traits::{BookingApiError, InsertBookingResult},
};

/// Inserts the booking unless one already exists for the same payment event. The unique constraint on `event_id`
/// makes this safe under concurrent redelivery: the conflicting insert is a no-op and the surviving row is
/// returned as `AlreadyExists`.
pub async fn idempotent_insert(
    booking: NewBooking,
    conn: &mut SqliteConnection,
) -> Result<InsertBookingResult, BookingApiError> {
    let event_id = booking.event_id.clone();
    match try_insert_booking(booking, conn).await? {
        Some(booking) => {
            debug!("📝️ Booking for event [{}] inserted with id {}", booking.event_id, booking.id);
            Ok(InsertBookingResult::Inserted(booking))
        },
        None => {
            let existing = fetch_booking_by_event_id(&event_id, conn).await?.ok_or_else(|| {
                BookingApiError::DatabaseError(format!(
                    "Insert for event [{event_id}] conflicted but no existing booking was found"
                ))
            })?;
            Ok(InsertBookingResult::AlreadyExists(existing))
        },
    }
}

/// Returns `None` when a booking for the event already exists.
async fn try_insert_booking(
    booking: NewBooking,
    conn: &mut SqliteConnection,
) -> Result<Option<Booking>, BookingApiError> {
    let booking = sqlx::query_as(
        r#"
            INSERT INTO bookings (event_id, tour_id, user_id, price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (event_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(booking.event_id)
    .bind(booking.tour_id)
    .bind(booking.user_id)
    .bind(booking.price)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    Ok(booking)
}

pub async fn fetch_booking_by_event_id(
    event_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Booking>, BookingApiError> {
    let booking =
        sqlx::query_as("SELECT * FROM bookings WHERE event_id = $1").bind(event_id).fetch_optional(conn).await?;
    Ok(booking)
}

/// Bookings for a user, oldest first.
pub async fn fetch_bookings_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Booking>, BookingApiError> {
    let bookings = sqlx::query_as("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(bookings)
}
