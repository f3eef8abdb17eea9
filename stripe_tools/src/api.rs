use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize};
use tbs_common::Cents;

use crate::{
    config::StripeConfig,
    data_objects::{CheckoutSession, NewCheckoutSession, Price, Product},
    StripeApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// The set of payment-provider calls the checkout flow needs. The server is generic over this trait so that
/// endpoint tests can run against a mock instead of live Stripe.
#[allow(async_fn_in_trait)]
pub trait CheckoutProvider {
    async fn create_product(&self, name: &str, description: &str) -> Result<Product, StripeApiError>;
    async fn create_price(&self, product_id: &str, unit_amount: Cents, currency: &str)
        -> Result<Price, StripeApiError>;
    async fn create_checkout_session(&self, params: NewCheckoutSession) -> Result<CheckoutSession, StripeApiError>;
}

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Stripe's API is form-encoded on the way in and JSON on the way out.
    async fn post_form<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("💳️ Sending POST {url}");
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| StripeApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ Request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            Err(StripeApiError::QueryError { status, message })
        }
    }
}

impl CheckoutProvider for StripeApi {
    async fn create_product(&self, name: &str, description: &str) -> Result<Product, StripeApiError> {
        debug!("💳️ Creating product '{name}'");
        let params = [("name", name.to_string()), ("description", description.to_string())];
        let product = self.post_form::<Product>("/products", &params).await?;
        info!("💳️ Created product '{name}' with id {}", product.id);
        Ok(product)
    }

    async fn create_price(
        &self,
        product_id: &str,
        unit_amount: Cents,
        currency: &str,
    ) -> Result<Price, StripeApiError> {
        debug!("💳️ Creating price of {unit_amount} for product {product_id}");
        let params = [
            ("product", product_id.to_string()),
            ("unit_amount", unit_amount.value().to_string()),
            ("currency", currency.to_string()),
        ];
        let price = self.post_form::<Price>("/prices", &params).await?;
        info!("💳️ Created price {} for product {product_id}", price.id);
        Ok(price)
    }

    async fn create_checkout_session(&self, params: NewCheckoutSession) -> Result<CheckoutSession, StripeApiError> {
        // The redirect URL is nominally nullable in the session object, but a payment-mode session always
        // carries one. Its absence is an error here.
        #[derive(Deserialize)]
        struct RawCheckoutSession {
            id: String,
            url: Option<String>,
        }
        debug!("💳️ Creating checkout session for {}", params.client_reference_id);
        let form = [
            ("mode", "payment".to_string()),
            ("customer_email", params.customer_email),
            ("client_reference_id", params.client_reference_id),
            ("line_items[0][price]", params.price_id),
            ("line_items[0][quantity]", params.quantity.to_string()),
            ("success_url", params.success_url),
            ("cancel_url", params.cancel_url),
        ];
        let session = self.post_form::<RawCheckoutSession>("/checkout/sessions", &form).await?;
        let url = session.url.ok_or(StripeApiError::MissingRedirectUrl)?;
        info!("💳️ Created checkout session {}", session.id);
        Ok(CheckoutSession { id: session.id, url })
    }
}
