use thiserror::Error;

use crate::{
    db_types::TourId,
    traits::{BookingApiError, TourApiError, UserApiError},
};

/// Failure modes of the checkout reconciliation flow. `UnknownCustomer`, `TourNotFound` and
/// `EventAlreadyProcessed` are soft failures: the webhook endpoint acknowledges them so the provider stops
/// redelivering. `DatabaseError` is the one the endpoint deliberately fails loudly on, because a retry can
/// succeed and the dedup key makes retries safe.
#[derive(Debug, Clone, Error)]
pub enum BookingFlowError {
    #[error("No user account matches the customer email on the payment event")]
    UnknownCustomer(String),
    #[error("Tour {0} does not exist")]
    TourNotFound(TourId),
    #[error("Event [{0}] has already been processed")]
    EventAlreadyProcessed(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserApiError> for BookingFlowError {
    fn from(e: UserApiError) -> Self {
        BookingFlowError::DatabaseError(e.to_string())
    }
}

impl From<TourApiError> for BookingFlowError {
    fn from(e: TourApiError) -> Self {
        BookingFlowError::DatabaseError(e.to_string())
    }
}

impl From<BookingApiError> for BookingFlowError {
    fn from(e: BookingApiError) -> Self {
        BookingFlowError::DatabaseError(e.to_string())
    }
}
