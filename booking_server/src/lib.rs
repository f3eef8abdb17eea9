//! # Tour booking server
//! This crate hosts the REST gateway for the booking service. It is responsible for:
//! Issuing and verifying access tokens for registered users.
//! Guarding protected routes behind the authentication gate and per-route role checks.
//! Listening for signed checkout webhooks from the payment provider and reconciling them into bookings.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: liveness check, returns 200 OK.
//! * `/api/users/*`: signup, login, logout, profile and password management.
//! * `/api/bookings*`: booking queries for the authenticated user (and admins).
//! * `/api/checkout-session/{tour_id}`: creates a provider checkout session for a tour.
//! * `/webhook/checkout`: the signed webhook route for completed checkout events.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod middleware;
pub mod routes;
pub mod server;
pub mod stripe_routes;

#[cfg(test)]
mod endpoint_tests;
