use crate::infra::config::{ConfigError, CorsConfig};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Builds the CORS layer from config.
///
/// `FRONTEND_URL` may list several origins separated by commas, or be `*`.
/// A wildcard origin cannot be combined with credentials, so credentials are
/// dropped in that case.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let methods = config
        .methods
        .iter()
        .map(|m| {
            Method::from_bytes(m.trim().to_uppercase().as_bytes())
                .map_err(|e| invalid("CORS_METHODS", m, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let headers = config
        .allowed_headers
        .iter()
        .map(|h| {
            HeaderName::from_bytes(h.trim().as_bytes())
                .map_err(|e| invalid("CORS_ALLOWED_HEADERS", h, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let layer = CorsLayer::new().allow_methods(methods).allow_headers(headers);

    if config.origin.trim() == "*" {
        if config.credentials {
            tracing::warn!("CORS_CREDENTIALS ignored because FRONTEND_URL is '*'");
        }
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let origins = config
        .origin
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| HeaderValue::from_str(o).map_err(|e| invalid("FRONTEND_URL", o, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(config.credentials))
}
