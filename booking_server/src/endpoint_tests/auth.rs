use actix_web::{
    body::MessageBody,
    http::{header::SET_COOKIE, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use booking_engine::{
    db_types::{Role, User},
    helpers::password::hash_password,
    traits::UserApiError,
    UserApi,
};
use chrono::{TimeZone, Utc};
use log::*;
use serde_json::json;

use super::{
    helpers::{get_auth_config, test_user},
    mocks::MockBackend,
};
use crate::{
    auth::{decode_access_token, TokenIssuer},
    data_objects::AuthResponse,
    routes::{logout, LoginRoute, SignupRoute},
};

#[actix_web::test]
async fn signup_creates_account_and_logs_in() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": "Bob Smith", "email": "Bob@Example.com", "password": "correcthorse"});
    let (status, body, cookie) = post_request("/signup", body, configure_signup).await;
    info!("Response body: {body}");
    assert_eq!(status, StatusCode::OK);
    let response = serde_json::from_str::<AuthResponse>(&body).expect("Malformed auth response");
    assert_eq!(response.user.email, "bob@example.com");
    assert_eq!(response.user.role, Role::User);
    let claims = decode_access_token(&response.token, &get_auth_config()).expect("Token does not verify");
    assert_eq!(claims.sub, 1);
    assert!(cookie.expect("No cookie was set").starts_with("jwt="));
}

#[actix_web::test]
async fn signup_with_taken_email_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": "Bob Smith", "email": "bob@example.com", "password": "correcthorse"});
    let (status, body, _) = post_request("/signup", body, |cfg: &mut ServiceConfig| {
        let mut users = MockBackend::new();
        users
            .expect_insert_user()
            .returning(|user| Err(UserApiError::EmailAlreadyInUse(user.email)));
        register(cfg, users);
    })
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"bob@example.com is already registered. Please log in instead."}"#);
}

#[actix_web::test]
async fn login_with_valid_credentials() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "eva@example.com", "password": "correcthorse"});
    let (status, body, cookie) = post_request("/login", body, configure_login).await;
    assert_eq!(status, StatusCode::OK);
    let response = serde_json::from_str::<AuthResponse>(&body).expect("Malformed auth response");
    let claims = decode_access_token(&response.token, &get_auth_config()).expect("Token does not verify");
    assert_eq!(claims.sub, 1);
    assert!(cookie.expect("No cookie was set").starts_with("jwt="));
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "eva@example.com", "password": "battery-staple"});
    let (status, body, _) = post_request("/login", body, configure_login).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Incorrect email or password"}"#);
}

#[actix_web::test]
async fn login_to_unknown_account_gives_the_same_error() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "nobody@example.com", "password": "correcthorse"});
    let (status, body, _) = post_request("/login", body, |cfg: &mut ServiceConfig| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_email().returning(|_| Ok(None));
        register(cfg, users);
    })
    .await;
    // Indistinguishable from a wrong password, so the endpoint cannot be used to probe for accounts
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Incorrect email or password"}"#);
}

#[actix_web::test]
async fn logout_overwrites_the_cookie() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/logout").to_request();
    let app = App::new().service(logout);
    let app = test::init_service(app).await;
    let (_, res) = test::call_service(&app, req).await.into_parts();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers().get(SET_COOKIE).and_then(|v| v.to_str().ok()).expect("No cookie was set");
    assert!(cookie.starts_with("jwt=loggedout"), "was: {cookie}");
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    assert_eq!(body, r#"{"success":true,"message":"Logged out"}"#);
}

fn register(cfg: &mut ServiceConfig, users: MockBackend) {
    let jwt_signer = TokenIssuer::new(&get_auth_config());
    cfg.app_data(web::Data::new(UserApi::new(users)))
        .app_data(web::Data::new(jwt_signer))
        .service(SignupRoute::<MockBackend>::new())
        .service(LoginRoute::<MockBackend>::new());
}

fn configure_signup(cfg: &mut ServiceConfig) {
    let mut users = MockBackend::new();
    users.expect_insert_user().returning(|user| {
        Ok(User {
            id: 1,
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            password_changed_at: None,
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        })
    });
    register(cfg, users);
}

fn configure_login(cfg: &mut ServiceConfig) {
    let hash = hash_password("correcthorse").unwrap();
    let mut users = MockBackend::new();
    users.expect_fetch_user_by_email().returning(move |_| {
        let mut user = test_user(1, Role::User);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });
    register(cfg, users);
}

async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String, Option<String>) {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let app = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let cookie = res.headers().get(SET_COOKIE).and_then(|v| v.to_str().ok()).map(|s| s.to_string());
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body, cookie)
}
