//! A thin client for the Stripe REST API, covering exactly what the booking gateway needs: creating products,
//! prices and checkout sessions, and verifying the signatures on webhook deliveries.
mod api;
mod config;
mod error;
mod webhook;

mod data_objects;

pub use api::{CheckoutProvider, StripeApi};
pub use config::StripeConfig;
pub use data_objects::{
    CheckoutEvent,
    CheckoutSession,
    CheckoutSessionObject,
    EventData,
    NewCheckoutSession,
    Price,
    Product,
    CHECKOUT_SESSION_COMPLETED,
};
pub use error::StripeApiError;
pub use webhook::{construct_event, signature_header, verify_webhook_signature, SignatureHeader, WebhookError};
