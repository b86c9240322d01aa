//! API key resolution: explicit value first, then the environment.

use std::env;

use crate::error::ConfigError;

/// Environment variable holding the Gemini API key.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Returns `explicit` when it is non-empty, otherwise the value of `GOOGLE_API_KEY`.
///
/// Empty strings on either side count as absent.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, ConfigError> {
    explicit
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            env::var(GOOGLE_API_KEY_VAR)
                .ok()
                .filter(|k| !k.trim().is_empty())
        })
        .ok_or_else(|| ConfigError::MissingApiKey {
            var: GOOGLE_API_KEY_VAR.to_string(),
        })
}
