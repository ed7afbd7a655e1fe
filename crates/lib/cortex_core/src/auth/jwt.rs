//! JWT signing, verification, and claim introspection.
//!
//! HS256 throughout. Access and refresh tokens use separate signing
//! secrets, so a token of one kind never verifies as the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::{Principal, TokenClaims};

/// Issuer claim embedded in every token and checked on verify.
pub const ISSUER: &str = "cortex-api";

/// Audience claim embedded in every token and checked on verify.
pub const AUDIENCE: &str = "cortex-clients";

/// Access token lifetime: 15 minutes.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Generate a unique per-issuance nonce for refresh tokens.
pub fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

/// Sign a token carrying `principal` (HS256, fixed issuer/audience).
///
/// `jti` is `Some` for refresh tokens and `None` for access tokens.
pub fn sign_token(
    principal: &Principal,
    jti: Option<String>,
    ttl_secs: i64,
    secret: &[u8],
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: principal.user_id.clone(),
        role: principal.role,
        email: principal.email.clone(),
        jti,
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a token's signature, issuer, audience, and expiry.
///
/// Returns `None` on any failure. Malformed, tampered, expired, and
/// wrong-scope tokens are indistinguishable to the caller.
pub fn verify_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[AUDIENCE]);
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Decode a token's claims WITHOUT verifying the signature or expiry.
///
/// Diagnostic use only (expiry display, blacklist pruning) — never an
/// authorization decision.
pub fn decode_unverified(token: &str) -> Option<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}
