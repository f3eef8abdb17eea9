use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use booking_engine::{sqlite::db::run_migrations, BookingApi, BookingFlowApi, SqliteDatabase, TourApi, UserApi};
use stripe_tools::StripeApi;

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    middleware::{AccessGateMiddlewareFactory, HmacMiddlewareFactory},
    routes::{
        health,
        logout,
        BookingsForUserRoute,
        LoginRoute,
        MyBookingsRoute,
        MyProfileRoute,
        SignupRoute,
        UpdatePasswordRoute,
    },
    stripe_routes::{CheckoutSessionRoute, CheckoutWebhookRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    run_migrations(db.pool()).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let stripe_api = StripeApi::new(config.stripe_config.stripe_api_config())?;
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let users_api = UserApi::new(db.clone());
        let tours_api = TourApi::new(db.clone());
        let bookings_api = BookingApi::new(db.clone());
        let flow_api = BookingFlowApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tbs::access_log"))
            .app_data(web::Data::new(users_api))
            .app_data(web::Data::new(tours_api))
            .app_data(web::Data::new(bookings_api))
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(stripe_api.clone()))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(options.clone()));
        // Account routes. Signup, login and logout are public; profile and password rotation sit behind the
        // access gate. This scope must be registered before the general /api scope, since scope matching does
        // not backtrack.
        let users_scope = web::scope("/api/users")
            .service(SignupRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(logout)
            .service(
                web::scope("")
                    .wrap(AccessGateMiddlewareFactory::<SqliteDatabase>::new(&config.auth))
                    .service(MyProfileRoute::<SqliteDatabase>::new())
                    .service(UpdatePasswordRoute::<SqliteDatabase>::new()),
            );
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .wrap(AccessGateMiddlewareFactory::<SqliteDatabase>::new(&config.auth))
            .service(MyBookingsRoute::<SqliteDatabase>::new())
            .service(BookingsForUserRoute::<SqliteDatabase>::new())
            .service(CheckoutSessionRoute::<SqliteDatabase, SqliteDatabase, StripeApi>::new());
        // The payment provider signs webhook deliveries; nothing in this scope runs before the signature checks
        // out.
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(
                "Stripe-Signature",
                config.stripe_config.webhook_secret.clone(),
                config.stripe_config.signature_checks,
            ))
            .service(CheckoutWebhookRoute::<SqliteDatabase>::new());
        app.service(health).service(users_scope).service(auth_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
