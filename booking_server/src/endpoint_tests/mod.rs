mod access_gate;
mod auth;
mod bookings;
mod helpers;
mod mocks;
mod webhook;
