//! Access token issuance and validation.
//!
//! Tokens are stateless JWTs signed with HMAC-SHA256. A token carries the user id (`sub`) and its issue time
//! (`iat`); validation checks the signature and expiry here, while the access gate middleware cross-checks `iat`
//! against the credential store to invalidate tokens minted before the user's last password change.

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use booking_engine::db_types::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::error;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

//--------------------------------------     TokenClaims     ---------------------------------------------------------

/// The claims carried in an access token. `sub` is the user id in the credential store; `iat` and `exp` are unix
/// timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

//--------------------------------------     TokenIssuer     ---------------------------------------------------------

/// Signs access tokens for authenticated users. Constructed once at server startup and shared between the login and
/// signup handlers via app data.
pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key, lifetime: config.token_lifetime }
    }

    /// The configured token lifetime. Used to align the auth cookie's max-age with the token expiry.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue_token(&self, user_id: i64) -> Result<String, ServerError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims { sub: user_id, iat: now, exp: now + self.lifetime.num_seconds() };
        encode(&Header::default(), &claims, &self.key)
            .map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))
    }
}

/// Verifies the signature and expiry of an access token and returns its claims.
///
/// A token is rejected from the exact expiry instant onwards, i.e. `now >= exp` fails with
/// [`AuthError::TokenExpired`].
pub fn decode_access_token(token: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let data = decode::<TokenClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken(e.to_string()),
    })?;
    // The jsonwebtoken crate still accepts a token at the exact expiry instant.
    if Utc::now().timestamp() >= data.claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Ok(data.claims)
}

//--------------------------------------   ResolvedIdentity  ---------------------------------------------------------

/// The authenticated caller, as resolved by the access gate middleware against the credential store. Handlers behind
/// the gate extract this from the request rather than re-validating the token themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub id: i64,
    pub role: Role,
}

impl FromRequest for ResolvedIdentity {
    type Error = ServerError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req.extensions().get::<ResolvedIdentity>().cloned().ok_or_else(|| {
            error!("🔐️ No resolved identity attached to this request. Is the route registered behind the access gate?");
            ServerError::Unspecified("Authentication context is missing".to_string())
        });
        std::future::ready(result)
    }
}
