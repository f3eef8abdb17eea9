use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use booking_engine::traits::{BookingApiError, TourApiError, UserApiError};
use log::error;
use stripe_tools::StripeApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not serialize access token. {0}")]
    CouldNotSerializeAccessToken(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0} is already registered. Please log in instead.")]
    EmailInUse(String),
    #[error("You do not have permission to perform this action")]
    InsufficientPermissions,
    #[error("Webhook signature verification failed. {0}")]
    WebhookVerificationFailed(String),
    #[error("The payment provider could not be reached. {0}")]
    UpstreamError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::WebhookVerificationFailed(_) => StatusCode::BAD_REQUEST,
            // Rejection reasons vary, but the treatment is uniform
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::EmailInUse(_) => StatusCode::CONFLICT,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotSerializeAccessToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // 5xx details stay in the log. Clients get a generic message.
        let message = if status.is_server_error() {
            error!("💻️ Internal error: {self}");
            "An internal server error occurred. Please try again later.".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("You are not logged in! Please log in to get access.")]
    NotLoggedIn,
    #[error("Invalid token. Please log in again.")]
    InvalidSignature,
    #[error("Your token has expired! Please log in again.")]
    TokenExpired,
    #[error("Malformed access token. {0}")]
    MalformedToken(String),
    #[error("The user belonging to this token no longer exists.")]
    UserNoLongerExists,
    #[error("User recently changed password. Please log in again.")]
    PasswordChanged,
    #[error("Incorrect email or password")]
    InvalidCredentials,
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::UserNotFound => Self::NoRecordFound("User not found.".to_string()),
            UserApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            UserApiError::EmailAlreadyInUse(email) => Self::EmailInUse(email),
            UserApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            UserApiError::PasswordHash(e) => Self::BackendError(format!("Password hashing error: {e}")),
        }
    }
}

impl From<TourApiError> for ServerError {
    fn from(e: TourApiError) -> Self {
        match e {
            TourApiError::TourNotFound(id) => Self::NoRecordFound(format!("No tour found with id {id}.")),
            TourApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<BookingApiError> for ServerError {
    fn from(e: BookingApiError) -> Self {
        match e {
            BookingApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<StripeApiError> for ServerError {
    fn from(e: StripeApiError) -> Self {
        match e {
            StripeApiError::Initialization(e) => Self::InitializeError(e),
            other => Self::UpstreamError(other.to_string()),
        }
    }
}
