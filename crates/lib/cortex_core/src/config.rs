//! Signing-secret and shadow-access configuration.

use std::path::PathBuf;

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

use crate::access::hash_access_key;
use crate::auth::jwt::{ACCESS_TOKEN_EXPIRY_SECS, REFRESH_TOKEN_EXPIRY_SECS};

/// Development shadow credential. Its digest is the default for
/// `SHADOW_ACCESS_KEY_HASH`; any shared deployment must override it.
const DEV_SHADOW_KEY: &str = "cortex-dev-shadow-key";

/// Configuration for the token authority and the access gate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access-token signing secret.
    pub access_secret: String,
    /// Refresh-token signing secret. Must differ from `access_secret`.
    pub refresh_secret: String,
    /// Hex SHA-256 digest of the shadow access credential.
    pub shadow_key_hash: String,
    /// Access-token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh-token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl AuthConfig {
    /// Reads configuration from environment variables with dev-safe defaults.
    ///
    /// | Variable                 | Default                                      |
    /// |--------------------------|----------------------------------------------|
    /// | `JWT_ACCESS_SECRET`      | generated & persisted to file                |
    /// | `JWT_REFRESH_SECRET`     | generated & persisted to file (separate)     |
    /// | `SHADOW_ACCESS_KEY_HASH` | digest of the built-in dev credential        |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `900` (15 minutes)                           |
    /// | `REFRESH_TOKEN_TTL_SECS` | `604800` (7 days)                            |
    pub fn from_env() -> Self {
        let access_secret = resolve_secret("JWT_ACCESS_SECRET", "access-token-secret");
        let refresh_secret = resolve_secret("JWT_REFRESH_SECRET", "refresh-token-secret");
        if access_secret == refresh_secret {
            warn!(
                "access and refresh signing secrets are identical; \
                 override JWT_ACCESS_SECRET or JWT_REFRESH_SECRET"
            );
        }
        Self {
            access_secret,
            refresh_secret,
            shadow_key_hash: std::env::var("SHADOW_ACCESS_KEY_HASH")
                .ok()
                .filter(|h| !h.is_empty())
                // Many SHA-256 tools emit uppercase hex; comparisons are
                // against lowercase digests.
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or_else(|| hash_access_key(DEV_SHADOW_KEY)),
            access_ttl_secs: ttl_from_env("ACCESS_TOKEN_TTL_SECS", ACCESS_TOKEN_EXPIRY_SECS),
            refresh_ttl_secs: ttl_from_env("REFRESH_TOKEN_TTL_SECS", REFRESH_TOKEN_EXPIRY_SECS),
        }
    }
}

/// Resolve a signing secret: env var → persisted file → freshly generated.
fn resolve_secret(env_var: &str, file_name: &str) -> String {
    if let Ok(secret) = std::env::var(env_var)
        && !secret.is_empty()
    {
        return secret;
    }
    let secret_path = secret_file_path(file_name);
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret = generate_secret();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(var = env_var, path = %secret_path.display(), "generated new signing secret");
    secret
}

/// Generate a random signing secret (64 alphanumeric chars).
fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Parse a TTL override from the environment, falling back on the default.
fn ttl_from_env(env_var: &str, default: i64) -> i64 {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(default)
}

/// Path to a persisted secret file.
fn secret_file_path(file_name: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cortex")
        .join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_are_distinct() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn secret_file_path_is_namespaced() {
        let path = secret_file_path("access-token-secret");
        assert!(path.ends_with("cortex/access-token-secret"));
    }
}
