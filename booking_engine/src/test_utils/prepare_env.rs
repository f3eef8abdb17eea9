use log::*;
use tbs_common::Cents;

use crate::{
    db_types::{NewTour, NewUser, Role, Tour, TourId, User},
    helpers::password::hash_password,
    sqlite::db::run_migrations,
    traits::{TourManagement, UserManagement},
    SqliteDatabase,
};

/// Creates a fresh in-memory database with all migrations applied.
///
/// The pool is capped at a single connection: every acquire hands back the same underlying connection, which is
/// what keeps an in-memory SQLite database alive and visible across calls.
pub async fn memory_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error creating in-memory database");
    run_migrations(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
    db
}

/// Inserts a user with the given role and a real argon2 hash of `password`, so that login flows can be exercised
/// end to end.
pub async fn seed_user(db: &SqliteDatabase, name: &str, email: &str, password: &str, role: Role) -> User {
    let hash = hash_password(password).expect("Error hashing fixture password");
    db.insert_user(NewUser::new(name, email, role, hash)).await.expect("Error seeding user")
}

/// Inserts a tour priced in whole dollars.
pub async fn seed_tour(db: &SqliteDatabase, tour_id: &str, name: &str, dollars: i64) -> Tour {
    let tour = NewTour {
        tour_id: TourId(tour_id.to_string()),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        summary: format!("{name} fixture tour"),
        price: Cents::from_dollars(dollars),
    };
    db.insert_tour(tour).await.expect("Error seeding tour")
}
