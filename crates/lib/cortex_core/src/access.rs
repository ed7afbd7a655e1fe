//! Tiered access gate — clearance computation and record filtering.
//!
//! Visible tiers, in order: `public < internal < confidential < secret`.
//! One hidden level sits strictly above `secret`, unlocked only by a
//! credential whose SHA-256 digest matches the configured hash. It is a
//! guarded branch, not an enum member, so enumerating the valid tiers
//! never reveals it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Clearance granted when a request declares nothing usable: `internal`.
/// Restrictive by default — unlabeled records meet undeclared requests at
/// the same level and nothing confidential-or-above leaks.
pub const DEFAULT_LEVEL: u8 = 1;

const SECRET_LEVEL: u8 = 3;
const SHADOW_LEVEL: u8 = 99;

/// The documented tiers, in ascending order, for UI enumeration.
pub fn visible_levels() -> &'static [&'static str] {
    &["public", "internal", "confidential", "secret"]
}

/// A retrieval request's declared tier and optional credential.
#[derive(Debug, Clone, Default)]
pub struct AccessRequest {
    /// Declared security level, e.g. `"confidential"`.
    pub security_level: Option<String>,
    /// Access credential. Doubles as the shadow credential when its digest
    /// matches the configured hash.
    pub access_key: Option<String>,
}

/// Anything carrying an optional security-level label.
pub trait TierLabeled {
    fn security_level(&self) -> Option<&str>;
}

/// A stored knowledge record as returned by the retrieval store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieredRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_level: Option<String>,
    pub content: serde_json::Value,
}

impl TierLabeled for TieredRecord {
    fn security_level(&self) -> Option<&str> {
        self.security_level.as_deref()
    }
}

/// SHA-256 hex digest of an access credential.
///
/// Deployments use this to mint the value for `SHADOW_ACCESS_KEY_HASH`.
pub fn hash_access_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Numeric level of a stored record's tier. Missing and unrecognized
/// labels default to `internal`.
fn record_level(level: Option<&str>) -> u8 {
    match level {
        Some("public") => 0,
        Some("internal") | None => 1,
        Some("confidential") => 2,
        Some("secret") => SECRET_LEVEL,
        Some("shadow") => SHADOW_LEVEL,
        Some(_) => DEFAULT_LEVEL,
    }
}

/// Computes request clearance and filters records against it.
pub struct AccessGate {
    shadow_key_hash: String,
}

impl AccessGate {
    pub fn new(shadow_key_hash: impl Into<String>) -> Self {
        // [`hash_access_key`] emits lowercase hex; accept uppercase
        // configured hashes too.
        Self {
            shadow_key_hash: shadow_key_hash.into().to_ascii_lowercase(),
        }
    }

    /// Effective clearance level for a request.
    ///
    /// The hidden-tier check runs first and short-circuits: a caller could
    /// declare `"secret"` while actually holding the shadow credential.
    /// Declaring `"secret"` grants level 3 only alongside a non-empty
    /// credential (any value); without one it falls back to the default,
    /// as do unknown and missing declarations.
    pub fn compute_clearance(&self, request: &AccessRequest) -> u8 {
        let key = request.access_key.as_deref().filter(|k| !k.is_empty());
        if let Some(key) = key
            && constant_time_eq(&hash_access_key(key), &self.shadow_key_hash)
        {
            return SHADOW_LEVEL;
        }
        if request.security_level.as_deref() == Some("secret") && key.is_some() {
            return SECRET_LEVEL;
        }
        match request.security_level.as_deref() {
            Some("public") => 0,
            Some("internal") => 1,
            Some("confidential") => 2,
            _ => DEFAULT_LEVEL,
        }
    }

    /// Retain records whose tier level is at most `clearance`, preserving
    /// input order (callers have already ranked by relevance).
    pub fn filter_by_clearance<T: TierLabeled>(&self, records: Vec<T>, clearance: u8) -> Vec<T> {
        records
            .into_iter()
            .filter(|record| record_level(record.security_level()) <= clearance)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gate() -> AccessGate {
        AccessGate::new(hash_access_key("open-sesame"))
    }

    fn request(level: Option<&str>, key: Option<&str>) -> AccessRequest {
        AccessRequest {
            security_level: level.map(str::to_string),
            access_key: key.map(str::to_string),
        }
    }

    fn record(id: &str, level: Option<&str>) -> TieredRecord {
        TieredRecord {
            id: id.into(),
            security_level: level.map(str::to_string),
            content: json!({ "title": id }),
        }
    }

    #[test]
    fn undeclared_request_defaults_to_internal() {
        assert_eq!(gate().compute_clearance(&request(None, None)), 1);
        assert_eq!(gate().compute_clearance(&request(Some("nonsense"), None)), 1);
    }

    #[test]
    fn visible_declarations_map_to_their_levels() {
        let gate = gate();
        assert_eq!(gate.compute_clearance(&request(Some("public"), None)), 0);
        assert_eq!(gate.compute_clearance(&request(Some("internal"), None)), 1);
        assert_eq!(
            gate.compute_clearance(&request(Some("confidential"), None)),
            2
        );
    }

    #[test]
    fn secret_requires_a_credential() {
        let gate = gate();
        // Any non-empty credential unlocks the declared secret tier.
        assert_eq!(
            gate.compute_clearance(&request(Some("secret"), Some("whatever"))),
            3
        );
        // Absent or empty credential falls back to the default.
        assert_eq!(gate.compute_clearance(&request(Some("secret"), None)), 1);
        assert_eq!(gate.compute_clearance(&request(Some("secret"), Some(""))), 1);
    }

    #[test]
    fn matching_shadow_credential_short_circuits() {
        let gate = gate();
        assert_eq!(
            gate.compute_clearance(&request(None, Some("open-sesame"))),
            99
        );
        // Even a "secret" declaration is overridden by the hidden check.
        assert_eq!(
            gate.compute_clearance(&request(Some("secret"), Some("open-sesame"))),
            99
        );
    }

    #[test]
    fn uppercase_configured_hash_still_matches() {
        let gate = AccessGate::new(hash_access_key("open-sesame").to_ascii_uppercase());
        assert_eq!(
            gate.compute_clearance(&request(None, Some("open-sesame"))),
            99
        );
    }

    #[test]
    fn wrong_shadow_credential_grants_nothing_extra() {
        // Wrong credential with no declaration: default clearance.
        assert_eq!(gate().compute_clearance(&request(None, Some("wrong"))), 1);
    }

    #[test]
    fn visible_levels_never_include_the_hidden_tier() {
        assert_eq!(
            visible_levels(),
            ["public", "internal", "confidential", "secret"]
        );
    }

    #[test]
    fn default_clearance_sees_public_and_internal_only() {
        let gate = gate();
        let records = vec![
            record("a", Some("public")),
            record("b", Some("internal")),
            record("c", Some("confidential")),
            record("d", Some("secret")),
        ];
        let clearance = gate.compute_clearance(&request(None, None));
        let visible = gate.filter_by_clearance(records, clearance);
        let ids: Vec<&str> = visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn unlabeled_records_are_internal_not_public() {
        let gate = gate();
        let records = vec![record("a", None), record("b", Some("mystery"))];
        let none_visible = gate.filter_by_clearance(records.clone(), 0);
        assert!(none_visible.is_empty());
        let all_visible = gate.filter_by_clearance(records, 1);
        assert_eq!(all_visible.len(), 2);
    }

    #[test]
    fn shadow_clearance_sees_everything() {
        let gate = gate();
        let records = vec![
            record("a", Some("public")),
            record("b", Some("secret")),
            record("c", Some("shadow")),
        ];
        let clearance = gate.compute_clearance(&request(None, Some("open-sesame")));
        assert_eq!(gate.filter_by_clearance(records, clearance).len(), 3);
    }

    #[test]
    fn secret_clearance_excludes_shadow_records() {
        let gate = gate();
        let records = vec![record("b", Some("secret")), record("c", Some("shadow"))];
        let clearance = gate.compute_clearance(&request(Some("secret"), Some("any")));
        let visible = gate.filter_by_clearance(records, clearance);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "b");
    }

    #[test]
    fn filtering_preserves_input_order() {
        let gate = gate();
        let records = vec![
            record("most-relevant", Some("internal")),
            record("less-relevant", Some("public")),
            record("least-relevant", Some("internal")),
        ];
        let visible = gate.filter_by_clearance(records, 1);
        let ids: Vec<&str> = visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["most-relevant", "less-relevant", "least-relevant"]);
    }

    #[test]
    fn credential_hashing_is_stable_hex() {
        let digest = hash_access_key("open-sesame");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, hash_access_key("open-sesame"));
        assert_ne!(digest, hash_access_key("open-sesame "));
    }
}
