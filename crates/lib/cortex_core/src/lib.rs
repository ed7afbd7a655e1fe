//! # cortex_core
//!
//! Session token lifecycle and tiered access control for Cortex.
//!
//! Two components:
//! - [`auth`] — the token authority: issuance, verification, rotation, and
//!   revocation of signed access/refresh token pairs.
//! - [`access`] — the tiered access gate: clearance computation for
//!   retrieval requests and filtering of tier-labeled records.

pub mod access;
pub mod auth;
pub mod config;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
