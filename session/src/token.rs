//! JWT expiry inspection.
//!
//! Only the `exp` claim is read; signatures are the backend's concern. Anything
//! that cannot be proven unexpired is treated as expired so it never reaches
//! an `Authorization` header.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Tokens expiring within this many seconds count as already expired.
pub const EXPIRY_SKEW_SECS: f64 = 5.0;

/// Current wall-clock time in seconds since the Unix epoch.
#[must_use]
pub fn now_secs() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() / 1000.0
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64())
    }
}

/// Read the numeric `exp` claim from a three-segment JWT.
#[must_use]
pub fn expiry(token: &str) -> Option<f64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload = parts[1].trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp")?.as_f64()
}

/// Whether `token` is expired at `now` (seconds since epoch).
#[must_use]
pub fn is_expired_at(token: &str, now: f64) -> bool {
    expiry(token).map_or(true, |exp| exp - EXPIRY_SKEW_SECS <= now)
}

/// Whether `token` is expired right now.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_secs())
}
