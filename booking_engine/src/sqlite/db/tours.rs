use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewTour, Tour, TourId},
    traits::TourApiError,
};

pub async fn fetch_tour_by_tour_id(tour_id: &TourId, conn: &mut SqliteConnection) -> Result<Option<Tour>, TourApiError> {
    let tour = sqlx::query_as("SELECT * FROM tours WHERE tour_id = $1")
        .bind(tour_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(tour)
}

pub async fn insert_tour(tour: NewTour, conn: &mut SqliteConnection) -> Result<Tour, TourApiError> {
    let tour: Tour = sqlx::query_as(
        r#"
            INSERT INTO tours (tour_id, name, slug, summary, price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(tour.tour_id)
    .bind(tour.name)
    .bind(tour.slug)
    .bind(tour.summary)
    .bind(tour.price)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Tour [{}] saved with id {}", tour.tour_id, tour.id);
    Ok(tour)
}
