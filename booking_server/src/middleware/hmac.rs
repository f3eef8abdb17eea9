//! Webhook signature middleware for Actix Web.
//!
//! The payment provider signs every webhook delivery with an HMAC over the raw request body, carried in the
//! `Stripe-Signature` header. This middleware verifies that signature against the shared webhook secret *before*
//! the body reaches any deserializer, and rejects failures with a 400 so the provider's dashboard surfaces them.
//!
//! Verification consumes the request payload, so on success the raw bytes are stuffed back into the request for
//! the downstream JSON extractor.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorBadRequest,
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use stripe_tools::verify_webhook_signature;
use tbs_common::Secret;

pub struct HmacMiddlewareFactory {
    signature_header: String,
    key: Secret<String>,
    // When false, every delivery is passed through unchecked (local testing)
    enabled: bool,
}

impl HmacMiddlewareFactory {
    pub fn new(signature_header: &str, key: Secret<String>, enabled: bool) -> Self {
        HmacMiddlewareFactory { signature_header: signature_header.into(), key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            signature_header: self.signature_header.clone(),
            key: self.key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    signature_header: String,
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let signature_header = self.signature_header.clone();
        let enabled = self.enabled;
        Box::pin(async move {
            trace!("💳️ Checking webhook signature for request");
            if !enabled {
                trace!("💳️ Webhook signature checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            let signature = req
                .headers()
                .get(&signature_header)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
                .ok_or_else(|| {
                    warn!("💳️ No signature header found on webhook request. Denying access.");
                    ErrorBadRequest("Webhook Error: missing signature header")
                })?;
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("💳️ Could not read the webhook request body: {e:?}");
                ErrorBadRequest("Webhook Error: could not read the request body")
            })?;
            match verify_webhook_signature(data.as_ref(), &signature, &secret) {
                Ok(_) => {
                    trace!("💳️ Webhook signature check for request ✅️");
                    req.set_payload(bytes_to_payload(data));
                    service.call(req).await
                },
                Err(e) => {
                    warn!("💳️ Webhook signature verification failed: {e}. Denying access.");
                    Err(ErrorBadRequest(format!("Webhook Error: {e}")))
                },
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
