//! Access gate middleware.
//!
//! Every protected route sits behind this gate. It pulls the access token off the request (`Authorization: Bearer`
//! header, or the `jwt` cookie set at login), validates signature and expiry, and then cross-checks the claims
//! against the credential store: the account must still exist, must be active, and must not have rotated its
//! password after the token was issued. On success the resolved identity is attached to the request extensions for
//! handlers and for the ACL middleware further in.
//!
//! All rejections surface as 401 with the specific reason in the body.

use std::{marker::PhantomData, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use booking_engine::{UserApi, UserManagement};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::{debug, error};

use crate::{
    auth::{decode_access_token, ResolvedIdentity},
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub struct AccessGateMiddlewareFactory<B> {
    auth: AuthConfig,
    _backend: PhantomData<fn() -> B>,
}

impl<B> AccessGateMiddlewareFactory<B> {
    pub fn new(auth: &AuthConfig) -> Self {
        AccessGateMiddlewareFactory { auth: auth.clone(), _backend: PhantomData }
    }
}

impl<S, Body, B> Transform<S, ServiceRequest> for AccessGateMiddlewareFactory<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: UserManagement + 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<Body>;
    type Transform = AccessGateMiddlewareService<S, B>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessGateMiddlewareService {
            auth: self.auth.clone(),
            service: Rc::new(service),
            _backend: PhantomData,
        })
    }
}

pub struct AccessGateMiddlewareService<S, B> {
    auth: AuthConfig,
    service: Rc<S>,
    _backend: PhantomData<fn() -> B>,
}

impl<S, Body, B> Service<ServiceRequest> for AccessGateMiddlewareService<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: UserManagement + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<Body>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let auth = self.auth.clone();
        Box::pin(async move {
            let token = access_token(&req).ok_or_else(|| {
                debug!("🔐️ No access token on request. Denying access.");
                Error::from(ServerError::AuthenticationError(AuthError::NotLoggedIn))
            })?;
            let claims = decode_access_token(&token, &auth).map_err(|e| {
                debug!("🔐️ Token validation failed: {e}");
                ServerError::AuthenticationError(e)
            })?;
            let api = req.app_data::<web::Data<UserApi<B>>>().cloned().ok_or_else(|| {
                error!("🔐️ UserApi is not configured as app data. Cannot resolve identities.");
                ErrorInternalServerError("Server is misconfigured")
            })?;
            let user = api
                .fetch_user_by_id(claims.sub)
                .await
                .map_err(ServerError::from)?
                .filter(|user| user.active)
                .ok_or_else(|| {
                    debug!("🔐️ Token refers to missing or deactivated account #{}. Denying access.", claims.sub);
                    Error::from(ServerError::AuthenticationError(AuthError::UserNoLongerExists))
                })?;
            if user.password_changed_after(claims.iat) {
                debug!("🔐️ Token for user #{} predates a password change. Denying access.", user.id);
                return Err(ServerError::AuthenticationError(AuthError::PasswordChanged).into());
            }
            req.extensions_mut().insert(ResolvedIdentity { id: user.id, role: user.role });
            service.call(req).await
        })
    }
}

/// The bearer token from the `Authorization` header, falling back to the `jwt` cookie. Browser clients rely on the
/// cookie; API clients send the header. The header wins when both are present.
fn access_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .or_else(|| req.request().cookie("jwt").map(|c| c.value().to_string()))
}
