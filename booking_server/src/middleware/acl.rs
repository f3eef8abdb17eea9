//! Role restriction middleware.
//!
//! This middleware can be placed on any route or service that already sits behind the access gate. It reads the
//! identity the gate resolved and lets the request through if the caller's role is a member of the allowed set.
//! Otherwise, a 403 Forbidden response is returned.

use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorInternalServerError},
    Error,
    HttpMessage,
};
use booking_engine::db_types::Role;
use futures::future::{ok, LocalBoxFuture, Ready};
use log::{debug, warn};

use crate::auth::ResolvedIdentity;

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<ResolvedIdentity>()
                .ok_or_else(|| {
                    warn!("🔐️ No resolved identity found in request extensions. Is the ACL inside the access gate?");
                    ErrorInternalServerError("No resolved identity found in request extensions")
                })?
                .clone();
            if allowed_roles.contains(&identity.role) {
                service.call(req).await
            } else {
                debug!("🔐️ User #{} ({}) is not in the allowed role set. Denying access.", identity.id, identity.role);
                Err(ErrorForbidden("You do not have permission to perform this action"))
            }
        })
    }
}
