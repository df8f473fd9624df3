use axum::http::{header, HeaderValue, Method};
use std::env;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer. With no `CORS_ALLOWED_ORIGINS` configured the API
/// is open to any origin without credentials, matching how the storefront
/// widget talks to it; setting the variable switches to an explicit list.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(get_allowed_origins())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
}

fn get_allowed_origins() -> AllowOrigin {
    let Ok(origins_str) = env::var("CORS_ALLOWED_ORIGINS") else {
        return AllowOrigin::any();
    };

    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("CORS: invalid origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: no valid origins configured, allowing any origin");
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_the_layer_does_not_panic() {
        let _layer = create_cors_layer();
    }
}
