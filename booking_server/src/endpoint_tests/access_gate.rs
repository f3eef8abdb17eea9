use actix_web::{http::StatusCode, web, web::ServiceConfig};
use booking_engine::{db_types::Role, UserApi};
use chrono::Utc;
use log::debug;

use super::helpers::{get_request, issue_token, test_user, valid_token};
use crate::{endpoint_tests::mocks::MockBackend, routes::MyProfileRoute};

#[actix_web::test]
async fn no_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/me", configure_app(Role::User)).await.expect_err("Expected error");
    assert_eq!(err, "Authentication Error. You are not logged in! Please log in to get access.");
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let _ = env_logger::try_init().ok();
    let now = Utc::now().timestamp();
    let token = issue_token(1, now - 7200, now - 3600);
    let err = get_request(&token, "/me", configure_app(Role::User)).await.expect_err("Expected error");
    assert_eq!(err, "Authentication Error. Your token has expired! Please log in again.");
}

#[actix_web::test]
async fn tampered_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut token = valid_token(1);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    debug!("Calling /me with tampered token {token}");
    let err = get_request(&token, "/me", configure_app(Role::User)).await.expect_err("Expected error");
    assert_eq!(err, "Authentication Error. Invalid token. Please log in again.");
}

#[actix_web::test]
async fn token_for_deleted_account_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(1);
    let err = get_request(&token, "/me", |cfg: &mut ServiceConfig| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_id().returning(|_| Ok(None));
        cfg.app_data(web::Data::new(UserApi::new(users))).service(MyProfileRoute::<MockBackend>::new());
    })
    .await
    .expect_err("Expected error");
    assert_eq!(err, "Authentication Error. The user belonging to this token no longer exists.");
}

#[actix_web::test]
async fn token_for_deactivated_account_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(1);
    let err = get_request(&token, "/me", |cfg: &mut ServiceConfig| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_id().returning(|id| {
            let mut user = test_user(id, Role::User);
            user.active = false;
            Ok(Some(user))
        });
        cfg.app_data(web::Data::new(UserApi::new(users))).service(MyProfileRoute::<MockBackend>::new());
    })
    .await
    .expect_err("Expected error");
    assert_eq!(err, "Authentication Error. The user belonging to this token no longer exists.");
}

#[actix_web::test]
async fn stale_token_after_password_change_is_rejected() {
    let _ = env_logger::try_init().ok();
    // Token minted an hour before the password changed
    let now = Utc::now().timestamp();
    let token = issue_token(1, now - 3600, now + 86_400);
    let err = get_request(&token, "/me", |cfg: &mut ServiceConfig| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_id().returning(|id| {
            let mut user = test_user(id, Role::User);
            user.password_changed_at = Some(Utc::now());
            Ok(Some(user))
        });
        cfg.app_data(web::Data::new(UserApi::new(users))).service(MyProfileRoute::<MockBackend>::new());
    })
    .await
    .expect_err("Expected error");
    assert_eq!(err, "Authentication Error. User recently changed password. Please log in again.");
}

#[actix_web::test]
async fn valid_token_reaches_the_handler() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(1);
    let (status, body) = get_request(&token, "/me", configure_app(Role::User)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"id":1,"name":"Eva Torres","email":"eva@example.com","role":"user","created_at":"2024-02-29T13:30:00Z"}"#
    );
}

fn configure_app(role: Role) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_id().returning(move |id| Ok(Some(test_user(id, role))));
        let users_api = UserApi::new(users);
        cfg.app_data(web::Data::new(users_api)).service(MyProfileRoute::<MockBackend>::new());
    }
}
