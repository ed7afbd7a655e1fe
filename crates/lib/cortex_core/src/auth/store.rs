//! Revocation state: blacklist and per-user token registry.
//!
//! Kept behind the [`SessionStore`] trait so a durable shared store (e.g. a
//! distributed cache) can replace the in-memory one without touching the
//! token authority. The base design is process-local: revocation on one
//! process instance is invisible to others.

use std::collections::HashSet;

use dashmap::{DashMap, DashSet};

/// Abstract key-set interface over the blacklist and the user-token
/// registry. All methods are infallible for in-memory backends.
pub trait SessionStore: Send + Sync {
    /// Add a raw token string to the blacklist. Idempotent. Returns true
    /// when the entry was newly inserted, false when it was already
    /// present — the arbitration point for concurrent duplicate
    /// revocations of the same token.
    fn blacklist(&self, token: &str) -> bool;

    /// Whether a raw token string has been revoked.
    fn is_blacklisted(&self, token: &str) -> bool;

    /// Record a token as currently issued for a user.
    fn register(&self, user_id: &str, token: &str);

    /// Remove a single token from a user's registry entry, deleting the
    /// entry if it becomes empty. Does not blacklist.
    fn unregister(&self, user_id: &str, token: &str);

    /// Remove and return every token registered for a user. The user's
    /// entry is deleted, not left empty.
    fn drain_user(&self, user_id: &str) -> Vec<String>;

    /// Snapshot of all blacklisted token strings (pruning support).
    fn blacklisted_tokens(&self) -> Vec<String>;

    /// Drop a single entry from the blacklist.
    fn remove_blacklisted(&self, token: &str);
}

/// Process-local store on concurrent maps. All state is lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    blacklist: DashSet<String>,
    registry: DashMap<String, HashSet<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn blacklist(&self, token: &str) -> bool {
        self.blacklist.insert(token.to_string())
    }

    fn is_blacklisted(&self, token: &str) -> bool {
        self.blacklist.contains(token)
    }

    fn register(&self, user_id: &str, token: &str) {
        self.registry
            .entry(user_id.to_string())
            .or_default()
            .insert(token.to_string());
    }

    fn unregister(&self, user_id: &str, token: &str) {
        let mut emptied = false;
        if let Some(mut tokens) = self.registry.get_mut(user_id) {
            tokens.remove(token);
            emptied = tokens.is_empty();
        }
        // Drop the guard before removing the entry.
        if emptied {
            self.registry.remove_if(user_id, |_, tokens| tokens.is_empty());
        }
    }

    fn drain_user(&self, user_id: &str) -> Vec<String> {
        self.registry
            .remove(user_id)
            .map(|(_, tokens)| tokens.into_iter().collect())
            .unwrap_or_default()
    }

    fn blacklisted_tokens(&self) -> Vec<String> {
        self.blacklist.iter().map(|t| t.key().clone()).collect()
    }

    fn remove_blacklisted(&self, token: &str) {
        self.blacklist.remove(token);
    }
}
