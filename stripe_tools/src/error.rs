use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("Stripe client setup failed: {0}")]
    Initialization(String),
    #[error("Could not send the request to Stripe: {0}")]
    RestRequestError(String),
    #[error("Could not read the Stripe response: {0}")]
    RestResponseError(String),
    #[error("Unexpected response payload: {0}")]
    JsonError(String),
    #[error("Stripe answered {status}: {message}")]
    QueryError { status: u16, message: String },
    #[error("The checkout session was created without a redirect URL")]
    MissingRedirectUrl,
}
