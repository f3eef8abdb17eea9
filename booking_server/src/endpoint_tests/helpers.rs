use actix_web::{
    body::MessageBody,
    http::{header::AUTHORIZATION, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use booking_engine::db_types::{Booking, Role, Tour, TourId, User};
use chrono::{TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;
use tbs_common::{Cents, Secret};

use crate::{auth::TokenClaims, config::AuthConfig, endpoint_tests::mocks::MockBackend, middleware::AccessGateMiddlewareFactory};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("test-only-secret-0123456789abcdef0123456789abcdef".to_string()),
        token_lifetime: chrono::Duration::days(1),
    }
}

pub fn issue_token(user_id: i64, iat: i64, exp: i64) -> String {
    let config = get_auth_config();
    let claims = TokenClaims { sub: user_id, iat, exp };
    let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    encode(&Header::default(), &claims, &key).expect("Failed to sign token")
}

pub fn valid_token(user_id: i64) -> String {
    let now = Utc::now().timestamp();
    issue_token(user_id, now - 60, now + 86_400)
}

//--------------------------------------      Fixtures       ---------------------------------------------------------

pub fn test_user(id: i64, role: Role) -> User {
    User {
        id,
        name: "Eva Torres".to_string(),
        email: "eva@example.com".to_string(),
        role,
        password_hash: String::new(),
        password_changed_at: None,
        active: true,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn test_tour() -> Tour {
    Tour {
        id: 1,
        tour_id: TourId("507f1f77bcf86cd799439011".to_string()),
        name: "The Forest Hiker".to_string(),
        slug: "the-forest-hiker".to_string(),
        summary: "Breathtaking hike through the Canadian Banff National Park".to_string(),
        price: Cents::from_dollars(397),
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn bookings_response(user_id: i64) -> Vec<Booking> {
    vec![
        Booking {
            id: 1,
            event_id: "evt_0000001".to_string(),
            tour_id: TourId("507f1f77bcf86cd799439011".to_string()),
            user_id,
            price: Cents::from_dollars(397),
            created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        },
        Booking {
            id: 2,
            event_id: "evt_0000002".to_string(),
            tour_id: TourId("5c88fa8cf4afda39709c2955".to_string()),
            user_id,
            price: Cents::from_dollars(497),
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
        },
    ]
}

//--------------------------------------      Requests       ---------------------------------------------------------

/// Sends a GET request through an app whose routes all sit behind the access gate. An empty `token` sends no
/// credentials at all. Gate and ACL rejections surface as `Err` with the error's display string.
pub async fn get_request(
    token: &str,
    path: &str,
    configure: impl FnOnce(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::get().uri(path);
    if !token.is_empty() {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    send_request(req, configure).await
}

pub async fn patch_request(
    token: &str,
    path: &str,
    body: serde_json::Value,
    configure: impl FnOnce(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::patch().uri(path).set_json(body);
    if !token.is_empty() {
        req = req.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    send_request(req, configure).await
}

async fn send_request(
    req: TestRequest,
    configure: impl FnOnce(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let config = get_auth_config();
    let app = App::new().wrap(AccessGateMiddlewareFactory::<MockBackend>::new(&config)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
