use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub client_url: String,
    pub payment: PaymentConfig,
}

/// Explicit configuration handed to the payment processor and webhook
/// verifier at construction. Secrets are independent per gateway scheme.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub gateway_secret: String,
    pub legacy_webhook_secret: String,
    pub currency: String,
    pub gateway_public_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "tradelink-dev-secret".to_string()
        });

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            jwt_secret,
            jwt_ttl_hours: env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 7),
            client_url: env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            payment: PaymentConfig::from_env(),
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            gateway_secret: env::var("GATEWAY_SECRET_KEY").unwrap_or_default(),
            legacy_webhook_secret: env::var("LEGACY_WEBHOOK_SECRET").unwrap_or_default(),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "NGN".to_string()),
            gateway_public_key: env::var("GATEWAY_PUBLIC_KEY").ok(),
        }
    }
}
