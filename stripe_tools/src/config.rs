use log::*;
use tbs_common::Secret;

const DEFAULT_API_URL: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("TBS_STRIPE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let secret_key = Secret::new(std::env::var("TBS_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("TBS_STRIPE_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("TBS_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("TBS_STRIPE_WEBHOOK_SECRET not set, using (probably useless) default");
            "whsec_00000000000000".to_string()
        }));
        Self { api_url, secret_key, webhook_secret }
    }
}
