//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Worker threads process their requests sequentially, so a handler that blocks the thread stalls every other
//! request queued on that worker. Anything long and non-cpu-bound (database calls, outbound HTTP) must be awaited,
//! never blocked on. All the storage APIs used here are async, so the handlers stay async all the way down.

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    get,
    web,
    HttpResponse,
    Responder,
};
use booking_engine::{
    db_types::{Role, User},
    traits::{BookingManagement, UserManagement},
    BookingApi,
    UserApi,
};
use log::*;

use crate::{
    auth::{ResolvedIdentity, TokenIssuer},
    data_objects::{AuthResponse, JsonResponse, LoginRequest, PublicUser, SignupRequest, UpdatePasswordRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Signup  ----------------------------------------------------
route!(signup => Post "/signup" impl UserManagement);
/// Route handler for the signup endpoint
///
/// Creates a new account from a name, an email address and a password. Every account created here gets the `user`
/// role; the elevated roles are assigned out of band. On success the response carries a fresh access token, both in
/// the body and as the `jwt` cookie, so the caller is logged in immediately.
pub async fn signup<B: UserManagement>(
    body: web::Json<SignupRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received signup request");
    let SignupRequest { name, email, password } = body.into_inner();
    let user = api.create_user(&name, &email, &password).await?;
    debug!("💻️ Created account #{} for {}", user.id, user.email);
    issue_auth_response(user, &signer)
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Checks the supplied credentials against the credential store and, on success, issues a fresh access token. The
/// failure response is the same whether the account does not exist, the password is wrong, or the account was
/// deactivated, so the endpoint cannot be used to probe for registered addresses.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received login request");
    let LoginRequest { email, password } = body.into_inner();
    let user = api.verify_credentials(&email, &password).await?;
    debug!("💻️ Credentials verified for user #{}", user.id);
    issue_auth_response(user, &signer)
}

//----------------------------------------------   Logout  ----------------------------------------------------
/// Route handler for the logout endpoint
///
/// Stateless tokens cannot be revoked, so logout just overwrites the `jwt` cookie with a short-lived dummy value.
/// Clients holding the raw token stay logged in until it expires; this endpoint exists for browser sessions.
#[get("/logout")]
pub async fn logout() -> impl Responder {
    trace!("💻️ Received logout request");
    let cookie = Cookie::build("jwt", "loggedout")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(10))
        .finish();
    HttpResponse::Ok().cookie(cookie).json(JsonResponse::success("Logged out"))
}

//----------------------------------------------   Profile  ----------------------------------------------------
route!(my_profile => Get "/me" impl UserManagement);
pub async fn my_profile<B: UserManagement>(
    identity: ResolvedIdentity,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET profile for user #{}", identity.id);
    let user = api
        .fetch_user_by_id(identity.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("User not found.".to_string()))?;
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

//----------------------------------------------   Password  ----------------------------------------------------
route!(update_password => Patch "/update-password" impl UserManagement);
/// Route handler for password rotation
///
/// The caller must supply their current password even though they are already authenticated; a stolen token alone
/// must not be enough to take over the account. A successful change stamps `password_changed_at`, which invalidates
/// every previously issued token, so the response carries a fresh one.
pub async fn update_password<B: UserManagement>(
    identity: ResolvedIdentity,
    body: web::Json<UpdatePasswordRequest>,
    api: web::Data<UserApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received password update request from user #{}", identity.id);
    let UpdatePasswordRequest { current_password, new_password } = body.into_inner();
    let user = api.update_password(identity.id, &current_password, &new_password).await?;
    debug!("💻️ Password rotated for user #{}. Issuing a fresh token.", user.id);
    issue_auth_response(user, &signer)
}

//----------------------------------------------   Bookings  ----------------------------------------------------
route!(my_bookings => Get "/bookings" impl BookingManagement);
pub async fn my_bookings<B: BookingManagement>(
    identity: ResolvedIdentity,
    api: web::Data<BookingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("🥾 GET bookings for user #{}", identity.id);
    let result = api.bookings_for_user(identity.id).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(bookings_for_user => Get "/bookings/user/{user_id}" impl BookingManagement where requires [Role::Admin, Role::LeadGuide]);
/// Route handler for looking up another user's bookings. Staff only.
pub async fn bookings_for_user<B: BookingManagement>(
    path: web::Path<i64>,
    api: web::Data<BookingApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("🥾 GET bookings on behalf of user #{user_id}");
    let result = api.bookings_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Helpers  ----------------------------------------------------

/// Issues a token for `user` and builds the standard auth response: the token and the public user projection in
/// the body, and the token repeated in a `jwt` cookie whose max-age matches the token lifetime.
fn issue_auth_response(user: User, signer: &TokenIssuer) -> Result<HttpResponse, ServerError> {
    let token = signer.issue_token(user.id)?;
    let cookie = Cookie::build("jwt", token.clone())
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(signer.lifetime().num_seconds()))
        .finish();
    let response = AuthResponse { token, user: PublicUser::from(user) };
    Ok(HttpResponse::Ok().cookie(cookie).json(response))
}
