use actix_web::{
    body::MessageBody,
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use booking_engine::{
    db_types::{Booking, Role},
    traits::{BookingApiError, InsertBookingResult},
    BookingFlowApi,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use stripe_tools::signature_header;
use tbs_common::{Cents, Secret};

use super::helpers::{test_tour, test_user};
use crate::{
    endpoint_tests::mocks::MockBackend,
    middleware::HmacMiddlewareFactory,
    stripe_routes::CheckoutWebhookRoute,
};

const WEBHOOK_SECRET: &str = "whsec_test_endpoint_secret";
const SIGNED_AT: i64 = 1706000000;

#[actix_web::test]
async fn signed_event_creates_a_booking() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, configure_happy_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Booking created"}"#);
}

#[actix_web::test]
async fn tampered_payload_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    // One byte changes after signing: the settled amount grows by an order of magnitude
    let tampered = payload.replace("19900", "99900");
    assert_ne!(payload, tampered);
    let (status, body) = post_webhook(&tampered, Some(&signature), true, |_cfg| {}).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Webhook Error: The signature does not match the payload");
}

#[actix_web::test]
async fn missing_signature_header_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let (status, body) = post_webhook(&payload, None, true, |_cfg| {}).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Webhook Error: missing signature header");
}

#[actix_web::test]
async fn signature_with_wrong_secret_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header("whsec_someone_else", SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, |_cfg| {}).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Webhook Error: The signature does not match the payload");
}

#[actix_web::test]
async fn duplicate_delivery_is_acknowledged_without_a_second_booking() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, |cfg: &mut ServiceConfig| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user_by_email().returning(|_| Ok(Some(test_user(7, Role::User))));
        backend.expect_fetch_tour_by_tour_id().returning(|_| Ok(Some(test_tour())));
        backend.expect_insert_booking().returning(|b| Ok(InsertBookingResult::AlreadyExists(stored_booking(b.event_id))));
        register(cfg, backend);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Event already processed"}"#);
}

#[actix_web::test]
async fn unknown_customer_is_acknowledged_without_a_booking() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, |cfg: &mut ServiceConfig| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user_by_email().returning(|_| Ok(None));
        register(cfg, backend);
    })
    .await;
    // A 4xx/5xx here would only trigger redelivery of an event we can never act on
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":false,"message":"No account matches the customer email"}"#);
}

#[actix_web::test]
async fn storage_failure_answers_5xx_so_the_provider_redelivers() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, |cfg: &mut ServiceConfig| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_user_by_email().returning(|_| Ok(Some(test_user(7, Role::User))));
        backend.expect_fetch_tour_by_tour_id().returning(|_| Ok(Some(test_tour())));
        backend
            .expect_insert_booking()
            .returning(|_| Err(BookingApiError::DatabaseError("database is locked".to_string())));
        register(cfg, backend);
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"An internal server error occurred. Please try again later."}"#);
}

#[actix_web::test]
async fn other_event_types_are_ignored() {
    let _ = env_logger::try_init().ok();
    let payload = json!({
        "id": "evt_1PqRsT",
        "type": "payment_intent.created",
        "created": SIGNED_AT,
        "data": { "object": { "id": "pi_3OaF" } }
    })
    .to_string();
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    // No expectations on the backend: any storage call would fail the test
    let (status, body) = post_webhook(&payload, Some(&signature), true, |cfg: &mut ServiceConfig| {
        register(cfg, MockBackend::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Event ignored"}"#);
}

#[actix_web::test]
async fn incomplete_event_is_acknowledged_without_processing() {
    let _ = env_logger::try_init().ok();
    let payload = json!({
        "id": "evt_1PqRsT",
        "type": "checkout.session.completed",
        "created": SIGNED_AT,
        "data": { "object": { "id": "cs_test_a1b2c3" } }
    })
    .to_string();
    let signature = signature_header(WEBHOOK_SECRET, SIGNED_AT, payload.as_bytes());
    let (status, body) = post_webhook(&payload, Some(&signature), true, |cfg: &mut ServiceConfig| {
        register(cfg, MockBackend::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":false,"message":"Event is missing the customer_email field"}"#);
}

#[actix_web::test]
async fn signature_checks_can_be_disabled_for_local_development() {
    let _ = env_logger::try_init().ok();
    let payload = event_payload("evt_1PqRsT");
    let (status, body) = post_webhook(&payload, None, false, configure_happy_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Booking created"}"#);
}

//--------------------------------------      Harness        ---------------------------------------------------------

fn event_payload(event_id: &str) -> String {
    json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "created": SIGNED_AT,
        "data": {
            "object": {
                "id": "cs_test_a1b2c3",
                "client_reference_id": "507f1f77bcf86cd799439011",
                "customer_email": "a@b.com",
                "amount_total": 19900
            }
        }
    })
    .to_string()
}

fn stored_booking(event_id: String) -> Booking {
    Booking {
        id: 1,
        event_id,
        tour_id: test_tour().tour_id,
        user_id: 7,
        price: Cents::from(19900),
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

fn configure_happy_path(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_user_by_email()
        .withf(|email| email == "a@b.com")
        .returning(|_| Ok(Some(test_user(7, Role::User))));
    backend
        .expect_fetch_tour_by_tour_id()
        .withf(|tour_id| tour_id.as_str() == "507f1f77bcf86cd799439011")
        .returning(|_| Ok(Some(test_tour())));
    backend
        .expect_insert_booking()
        .withf(|b| b.event_id == "evt_1PqRsT" && b.user_id == 7 && b.price == Cents::from(19900))
        .returning(|b| Ok(InsertBookingResult::Inserted(stored_booking(b.event_id))));
    register(cfg, backend);
}

fn register(cfg: &mut ServiceConfig, backend: MockBackend) {
    cfg.app_data(web::Data::new(BookingFlowApi::new(backend))).service(CheckoutWebhookRoute::<MockBackend>::new());
}

/// Posts `payload` to the webhook route behind the signature middleware. Middleware rejections come back as service
/// errors, so both arms are folded into a plain (status, body) pair for the assertions.
async fn post_webhook(
    payload: &str,
    signature: Option<&str>,
    signature_checks: bool,
    configure: impl FnOnce(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post()
        .uri("/checkout")
        .insert_header(ContentType::json())
        .set_payload(payload.to_string());
    if let Some(signature) = signature {
        req = req.insert_header(("Stripe-Signature", signature));
    }
    let app = App::new()
        .wrap(HmacMiddlewareFactory::new("Stripe-Signature", Secret::new(WEBHOOK_SECRET.to_string()), signature_checks))
        .configure(configure);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
    }
}
