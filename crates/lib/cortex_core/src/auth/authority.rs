//! The token authority — exclusive owner of issuance, verification, and
//! revocation state.
//!
//! Construct one [`TokenAuthority`] at process startup and hand it by
//! reference to every consumer (middleware, auth endpoints). Each test can
//! construct its own fresh authority.

use chrono::Utc;
use tracing::{debug, info};

use super::AuthError;
use super::jwt;
use super::store::{InMemorySessionStore, SessionStore};
use crate::config::AuthConfig;
use crate::models::auth::{Principal, TokenPair};

pub struct TokenAuthority {
    access_secret: String,
    refresh_secret: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    store: Box<dyn SessionStore>,
}

impl TokenAuthority {
    /// Create an authority with process-local in-memory revocation state.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_store(config, Box::new(InMemorySessionStore::new()))
    }

    /// Create an authority over a caller-provided store (e.g. a durable
    /// shared backend for multi-process deployments).
    pub fn with_store(config: &AuthConfig, store: Box<dyn SessionStore>) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            store,
        }
    }

    // -----------------------------------------------------------------------
    // Issuance
    // -----------------------------------------------------------------------

    /// Issue a signed short-lived access token. No registration side effect.
    pub fn issue_access_token(&self, principal: &Principal) -> Result<String, AuthError> {
        jwt::sign_token(
            principal,
            None,
            self.access_ttl_secs,
            self.access_secret.as_bytes(),
        )
    }

    /// Issue a signed long-lived refresh token with a fresh `jti`.
    pub fn issue_refresh_token(&self, principal: &Principal) -> Result<String, AuthError> {
        jwt::sign_token(
            principal,
            Some(jwt::new_jti()),
            self.refresh_ttl_secs,
            self.refresh_secret.as_bytes(),
        )
    }

    /// Issue an access + refresh pair and register both under the
    /// principal's user ID. Both tokens embed the same principal.
    pub fn issue_token_pair(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        let access_token = self.issue_access_token(principal)?;
        let refresh_token = self.issue_refresh_token(principal)?;
        self.store.register(&principal.user_id, &access_token);
        self.store.register(&principal.user_id, &refresh_token);
        debug!(user_id = %principal.user_id, "issued token pair");
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_secs,
        })
    }

    // -----------------------------------------------------------------------
    // Verification
    // -----------------------------------------------------------------------

    /// Verify an access token, returning the embedded principal.
    ///
    /// `None` for blacklisted, malformed, tampered, wrong-scope, and
    /// expired tokens alike — the cause is deliberately not observable.
    pub fn verify_access_token(&self, token: &str) -> Option<Principal> {
        if self.store.is_blacklisted(token) {
            return None;
        }
        jwt::verify_token(token, self.access_secret.as_bytes()).map(|claims| claims.principal())
    }

    /// Verify a refresh token. Same contract as [`Self::verify_access_token`].
    pub fn verify_refresh_token(&self, token: &str) -> Option<Principal> {
        if self.store.is_blacklisted(token) {
            return None;
        }
        jwt::verify_token(token, self.refresh_secret.as_bytes()).map(|claims| claims.principal())
    }

    // -----------------------------------------------------------------------
    // Revocation
    // -----------------------------------------------------------------------

    /// Blacklist a single token. Idempotent; effective immediately.
    pub fn revoke_token(&self, token: &str) {
        self.store.blacklist(token);
    }

    /// Blacklist every registered token for a user ("logout everywhere").
    /// Returns the number of tokens revoked.
    pub fn revoke_all_user_tokens(&self, user_id: &str) -> usize {
        let tokens = self.store.drain_user(user_id);
        for token in &tokens {
            self.store.blacklist(token);
        }
        if !tokens.is_empty() {
            info!(user_id, count = tokens.len(), "revoked all user tokens");
        }
        tokens.len()
    }

    /// Remove a token from the user's registry entry without blacklisting
    /// it (the token completed its purpose, e.g. after rotation).
    pub fn unregister_user_token(&self, user_id: &str, token: &str) {
        self.store.unregister(user_id, token);
    }

    // -----------------------------------------------------------------------
    // Rotation
    // -----------------------------------------------------------------------

    /// Redeem a refresh token for a new pair. Single-use: the presented
    /// token is blacklisted before the new pair exists, so a replay fails
    /// verification.
    ///
    /// `Ok(None)` when the presented token does not verify, or when a
    /// concurrent duplicate redemption got there first — the blacklist
    /// insert is the arbitration point, so exactly one of N simultaneous
    /// redemptions of the same token receives a pair.
    pub fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenPair>, AuthError> {
        let Some(principal) = self.verify_refresh_token(refresh_token) else {
            return Ok(None);
        };
        if !self.store.blacklist(refresh_token) {
            debug!(user_id = %principal.user_id, "refresh token already revoked, redemption lost");
            return Ok(None);
        }
        self.store.unregister(&principal.user_id, refresh_token);
        let pair = self.issue_token_pair(&principal)?;
        debug!(user_id = %principal.user_id, "rotated refresh token");
        Ok(Some(pair))
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// The token's embedded expiry (unix seconds), without signature
    /// verification. Diagnostic only.
    pub fn get_token_expiry(&self, token: &str) -> Option<i64> {
        jwt::decode_unverified(token).map(|claims| claims.exp)
    }

    /// Whether the token's embedded expiry has passed. Undecodable tokens
    /// count as expired. Diagnostic only.
    pub fn is_token_expired(&self, token: &str) -> bool {
        match self.get_token_expiry(token) {
            Some(exp) => exp <= Utc::now().timestamp(),
            None => true,
        }
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drop blacklist entries whose embedded expiry has passed — they can
    /// no longer verify anyway. Entries that cannot be decoded are kept.
    /// Returns the number of entries pruned. Caller-scheduled; there is no
    /// background timer.
    pub fn prune_expired_revocations(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut pruned = 0;
        for token in self.store.blacklisted_tokens() {
            if let Some(claims) = jwt::decode_unverified(&token)
                && claims.exp <= now
            {
                self.store.remove_blacklisted(&token);
                pruned += 1;
            }
        }
        if pruned > 0 {
            info!(count = pruned, "pruned expired blacklist entries");
        }
        pruned
    }
}
