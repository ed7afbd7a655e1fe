//! Token issuance, verification, and revocation.
//!
//! The [`authority::TokenAuthority`] owns all revocation state (blacklist +
//! per-user token registry). Verification failures are silent (`None`);
//! [`AuthError`] covers only genuine faults such as signing failures.

pub mod authority;
pub mod jwt;
pub mod store;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
