//! Correlation id resolution and generation.

use axum::http::HeaderMap;
use rand::{rngs::OsRng, RngCore};

pub const X_CORRELATION_ID: &str = "x-correlation-id";
pub const X_REQUEST_ID: &str = "x-request-id";

/// The operating system's random source could not be read.
///
/// Never recovered by falling back to a weaker id.
#[derive(Debug, thiserror::Error)]
#[error("entropy source unavailable: {0}")]
pub struct EntropyError(#[from] rand::Error);

/// Fresh UUID v4 built from 128 bits of OS entropy.
pub fn generate_correlation_id() -> Result<String, EntropyError> {
    let mut bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string())
}

/// Inbound id from `x-correlation-id`, then `x-request-id`; generated when
/// neither carries a non-empty value.
pub fn resolve_correlation_id(headers: &HeaderMap) -> Result<String, EntropyError> {
    match inbound_correlation_id(headers) {
        Some(id) => Ok(id.to_string()),
        None => generate_correlation_id(),
    }
}

fn inbound_correlation_id(headers: &HeaderMap) -> Option<&str> {
    [X_CORRELATION_ID, X_REQUEST_ID].into_iter().find_map(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Fail fast at startup when the entropy source is unusable.
pub fn probe_entropy() -> Result<(), EntropyError> {
    generate_correlation_id().map(|_| ())
}
