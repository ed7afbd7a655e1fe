//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Role of an authenticated principal.
///
/// Closed set. A role change never mutates existing tokens; it requires
/// issuing new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Demo,
}

/// The authenticated identity a token represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
    /// Display/contact attribute only — never consulted for authorization.
    pub email: Option<String>,
}

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user ID (standard JWT `sub` claim).
    pub sub: String,
    /// Principal role.
    pub role: Role,
    /// User email, if known at issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unique per-issuance nonce; present on refresh tokens only.
    ///
    /// This is the rotation handle: each refresh token is distinguishable
    /// from every other token issued for the same principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issuer (fixed constant, checked on verify).
    pub iss: String,
    /// Audience (fixed constant, checked on verify).
    pub aud: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl TokenClaims {
    /// The principal embedded in these claims.
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub.clone(),
            role: self.role,
            email: self.email.clone(),
        }
    }
}

/// Access + refresh token pair returned by issuance and rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}
