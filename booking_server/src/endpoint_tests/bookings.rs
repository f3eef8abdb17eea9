use actix_web::{http::StatusCode, web, web::ServiceConfig};
use booking_engine::{db_types::Role, BookingApi, UserApi};

use super::helpers::{bookings_response, get_request, test_user, valid_token};
use crate::{
    endpoint_tests::mocks::MockBackend,
    routes::{BookingsForUserRoute, MyBookingsRoute},
};

#[actix_web::test]
async fn fetch_my_bookings() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(1);
    let (status, body) = get_request(&token, "/bookings", configure_app(Role::User)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, BOOKINGS_JSON);
}

#[actix_web::test]
async fn fetch_bookings_without_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/bookings", configure_app(Role::User)).await.expect_err("Expected error");
    assert_eq!(err, "Authentication Error. You are not logged in! Please log in to get access.");
}

#[actix_web::test]
async fn user_cannot_fetch_another_users_bookings() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(7);
    let err = get_request(&token, "/bookings/user/1", configure_app(Role::User)).await.expect_err("Expected error");
    assert_eq!(err, "You do not have permission to perform this action");
}

#[actix_web::test]
async fn guide_cannot_fetch_another_users_bookings() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(7);
    let err = get_request(&token, "/bookings/user/1", configure_app(Role::Guide)).await.expect_err("Expected error");
    assert_eq!(err, "You do not have permission to perform this action");
}

#[actix_web::test]
async fn admin_can_fetch_another_users_bookings() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(7);
    let (status, body) =
        get_request(&token, "/bookings/user/1", configure_app(Role::Admin)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, BOOKINGS_JSON);
}

#[actix_web::test]
async fn lead_guide_can_fetch_another_users_bookings() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(7);
    let (status, body) =
        get_request(&token, "/bookings/user/1", configure_app(Role::LeadGuide)).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, BOOKINGS_JSON);
}

fn configure_app(role: Role) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut users = MockBackend::new();
        users.expect_fetch_user_by_id().returning(move |id| Ok(Some(test_user(id, role))));
        let mut bookings = MockBackend::new();
        bookings.expect_fetch_bookings_for_user().returning(|user_id| Ok(bookings_response(user_id)));
        cfg.app_data(web::Data::new(UserApi::new(users)))
            .app_data(web::Data::new(BookingApi::new(bookings)))
            .service(MyBookingsRoute::<MockBackend>::new())
            .service(BookingsForUserRoute::<MockBackend>::new());
    }
}

// Mock response to `fetch_bookings_for_user` for user #1
const BOOKINGS_JSON: &str = r#"{"user_id":1,"total_spent":89400,"bookings":[{"id":1,"event_id":"evt_0000001","tour_id":"507f1f77bcf86cd799439011","user_id":1,"price":39700,"created_at":"2024-02-29T13:30:00Z"},{"id":2,"event_id":"evt_0000002","tour_id":"5c88fa8cf4afda39709c2955","user_id":1,"price":49700,"created_at":"2024-03-15T18:30:00Z"}]}"#;
