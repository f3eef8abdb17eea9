use serde::{Deserialize, Serialize};
use tbs_common::Cents;

/// The one event type the gateway reconciles. Everything else is acknowledged and dropped.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
    pub product: String,
    pub unit_amount: Cents,
    pub currency: String,
}

/// A created checkout session with the redirect URL the caller gets sent to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Parameters for a new checkout session. `client_reference_id` carries the tour id through the provider and back
/// on the completion event; it is the reconciliation key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCheckoutSession {
    pub customer_email: String,
    pub client_reference_id: String,
    pub price_id: String,
    pub quantity: u32,
    pub success_url: String,
    pub cancel_url: String,
}

/// A webhook event envelope as delivered by the provider. Untrusted until the signature over the raw body has
/// been verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub created: i64,
    pub data: EventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: CheckoutSessionObject,
}

/// The `data.object` payload of a checkout-session event. The interesting fields are all nullable on the wire, so
/// absence is handled at conversion time rather than at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub amount_total: Option<Cents>,
}
