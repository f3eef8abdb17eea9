use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use tbs_common::Cents;
use thiserror::Error;

//--------------------------------------        Role         ---------------------------------------------------------
/// The closed set of roles a user can hold. Every user has exactly one role; route guards check membership of an
/// allowed set, so the variants never combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Role {
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Guide => write!(f, "guide"),
            Role::LeadGuide => write!(f, "lead-guide"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "guide" => Ok(Self::Guide),
            "lead-guide" => Ok(Self::LeadGuide),
            "admin" => Ok(Self::Admin),
            s => Err(RoleParseError(s.to_string())),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------
/// A user record as stored in the credential store. Deliberately not `Serialize`: the password hash must never ride
/// along into a response body. Use a public projection in the server layer instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True if the stored password was changed after the given unix timestamp. Tokens issued before a password
    /// change are stale and must be rejected; a change in the same second as issuance does not count.
    pub fn password_changed_after(&self, timestamp: i64) -> bool {
        self.password_changed_at.map(|t| t.timestamp() > timestamp).unwrap_or(false)
    }
}

//--------------------------------------      NewUser        ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// The argon2 PHC string, never the plain password.
    pub password_hash: String,
}

impl NewUser {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, email: S2, role: Role, password_hash: String) -> Self {
        Self { name: name.into(), email: email.into().to_lowercase(), role, password_hash }
    }
}

//--------------------------------------       TourId        ---------------------------------------------------------
/// A lightweight wrapper around the external catalog identifier for a tour. This is the value embedded into checkout
/// sessions as the reconciliation reference.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct TourId(pub String);

impl FromStr for TourId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TourId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for TourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TourId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        Tour         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub tour_id: TourId,
    pub name: String,
    pub slug: String,
    pub summary: String,
    pub price: Cents,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      NewTour        ---------------------------------------------------------
/// Tours are owned by the catalog service; the engine only needs them for checkout and reconciliation lookups.
/// `NewTour` exists for provisioning and test fixtures.
#[derive(Debug, Clone)]
pub struct NewTour {
    pub tour_id: TourId,
    pub name: String,
    pub slug: String,
    pub summary: String,
    pub price: Cents,
}

//--------------------------------------       Booking       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    /// The payment-provider event id that created this booking. Unique: the dedup key for webhook redelivery.
    pub event_id: String,
    pub tour_id: TourId,
    pub user_id: i64,
    pub price: Cents,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     NewBooking      ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub event_id: String,
    pub tour_id: TourId,
    pub user_id: i64,
    pub price: Cents,
}

impl NewBooking {
    pub fn new<S: Into<String>>(event_id: S, tour_id: TourId, user_id: i64, price: Cents) -> Self {
        Self { event_id: event_id.into(), tour_id, user_id, price }
    }
}

//--------------------------------------  CompletedCheckout  ---------------------------------------------------------
/// The engine-side view of a verified "checkout completed" payment event. The server constructs one of these only
/// after the webhook signature has been checked, so everything in here is trusted input to the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedCheckout {
    pub event_id: String,
    pub customer_email: String,
    pub tour_id: TourId,
    /// The settled amount, in minor currency units.
    pub amount: Cents,
}

impl Display for CompletedCheckout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Checkout event [{}]: {} paid by {} for tour {}",
            self.event_id, self.amount, self.customer_email, self.tour_id
        )
    }
}
