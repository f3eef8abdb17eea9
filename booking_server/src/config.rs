use std::{env, io::Write};

use chrono::Duration;
use log::*;
use rand::{thread_rng, RngCore};
use serde_json::json;
use stripe_tools::StripeConfig as StripeApiConfig;
use tbs_common::{parse_boolean_flag, Secret};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_TBS_HOST: &str = "127.0.0.1";
const DEFAULT_TBS_PORT: u16 = 3000;
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::days(90);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Public origin of the storefront. Checkout success and cancel redirects are built from this.
    pub site_url: String,
    /// Payment provider configuration
    pub stripe_config: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TBS_HOST.to_string(),
            port: DEFAULT_TBS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            site_url: DEFAULT_SITE_URL.to_string(),
            stripe_config: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TBS_HOST").ok().unwrap_or_else(|| DEFAULT_TBS_HOST.into());
        let port = env::var("TBS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TBS_PORT. {e} Using the default, {DEFAULT_TBS_PORT}, instead."
                    );
                    DEFAULT_TBS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TBS_PORT);
        let database_url = env::var("TBS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ TBS_DATABASE_URL is not set. Please set it to the URL for the bookings database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let site_url = env::var("TBS_SITE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ TBS_SITE_URL is not set. Using the default, {DEFAULT_SITE_URL}.");
            DEFAULT_SITE_URL.into()
        });
        let stripe_config = StripeConfig::from_env_or_defaults();
        Self { host, port, database_url, auth, site_url, stripe_config }
    }
}

//-------------------------------------------------  StripeConfig  -----------------------------------------------------
#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
    /// If false, webhook signature checks are skipped entirely. Local development only.
    pub signature_checks: bool,
}

impl Default for StripeConfig {
    fn default() -> Self {
        let api_config = StripeApiConfig::default();
        Self {
            api_url: api_config.api_url,
            secret_key: api_config.secret_key,
            webhook_secret: api_config.webhook_secret,
            signature_checks: true,
        }
    }
}

impl StripeConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_config = StripeApiConfig::new_from_env_or_default();
        let signature_checks = parse_boolean_flag(env::var("TBS_STRIPE_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!(
                "🚨️ Webhook signature checks are DISABLED. Anyone can post fake checkout events to this server. Do \
                 not run production like this."
            );
        }
        Self {
            api_url: api_config.api_url.clone(),
            secret_key: api_config.secret_key.clone(),
            webhook_secret: api_config.webhook_secret.clone(),
            signature_checks,
        }
    }

    pub fn stripe_api_config(&self) -> StripeApiConfig {
        StripeApiConfig {
            api_url: self.api_url.clone(),
            secret_key: self.secret_key.clone(),
            webhook_secret: self.webhook_secret.clone(),
        }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// How long issued access tokens remain valid.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. All issued \
             tokens become invalid when the server restarts. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let mut rng = thread_rng();
        let mut secret = [0u8; 32];
        rng.fill_bytes(&mut secret);
        let secret = hex::encode(secret);
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT signing secret for this session was written to {}. If this is a production \
                         instance, you are doing it wrong! Set the TBS_JWT_SECRET environment variable instead. \
                         🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT signing secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: DEFAULT_TOKEN_LIFETIME }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("TBS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [TBS_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "TBS_JWT_SECRET must be at least 32 characters long.".to_string(),
            ));
        }
        let token_lifetime = configure_token_lifetime();
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime })
    }
}

fn configure_token_lifetime() -> Duration {
    env::var("TBS_TOKEN_LIFETIME")
        .map_err(|_| {
            info!(
                "🪛️ TBS_TOKEN_LIFETIME is not set. Using the default value of {} days.",
                DEFAULT_TOKEN_LIFETIME.num_days()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::days)
                .map_err(|e| warn!("🪛️ Invalid configuration value for TBS_TOKEN_LIFETIME. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_TOKEN_LIFETIME)
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the server configuration that route handlers need. Kept small, and free of secrets, so it can be
/// cloned into the app data without passing sensitive material around the system.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub site_url: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { site_url: config.site_url.clone() }
    }
}
