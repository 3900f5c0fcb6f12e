//! Record types for the access-control ledger.
//!
//! Three record kinds make up the ledger: resources, access requests, and
//! permissions. Records are never deleted; requests and permissions each
//! carry a single one-way state transition, and a permission's expiry is a
//! read-time predicate rather than a stored state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated caller identity, opaque to the core.
///
/// The host supplies one for every call; the ledger only compares them for
/// equality and never inspects their structure.
pub type PrincipalId = String;

/// Fixed validity window applied to every permission at grant time.
pub const GRANT_DURATION_DAYS: i64 = 365;

/// Conventional names for sensitivity classifications.
///
/// The ledger treats `sensitivity_level` as an opaque ordinal ceiling in
/// `[0, 255]`; these constants document the customary scale only and carry
/// no behavior.
pub mod sensitivity {
    pub const PUBLIC: u8 = 0;
    pub const INTERNAL: u8 = 1;
    pub const CONFIDENTIAL: u8 = 2;
    pub const SECRET: u8 = 3;
    pub const TOP_SECRET: u8 = 4;
}

/// A named resource under access control.
///
/// Immutable after creation: there is no update or delete operation, by
/// design. The creator is the sole authority for processing requests
/// against the resource and implicitly holds full access to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub creator: PrincipalId,
    /// Ceiling on what access level may ever be verified against this
    /// resource; 0 = public, ascending values denote stricter
    /// classifications.
    pub sensitivity_level: u8,
    pub created_at: DateTime<Utc>,
}

/// A principal's request for access to a resource.
///
/// Lifecycle: Pending -> {Approved, Rejected}, a single one-way transition
/// driven by request processing. `approved` is meaningful only once
/// `processed` is true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessRequest {
    pub id: u64,
    pub resource_id: u64,
    pub requester: PrincipalId,
    /// Informational only: never validated against the resource's
    /// sensitivity, at submission or at approval.
    pub requested_level: u32,
    pub processed: bool,
    pub approved: bool,
    pub processed_by: Option<PrincipalId>,
    pub created_at: DateTime<Utc>,
}

/// A time-bounded, revocable grant minted when a request is approved.
///
/// `is_active` flips to false only through explicit revocation; the passage
/// of time alone never mutates a permission. Expiry is evaluated lazily by
/// comparing `expires_at` against a supplied timestamp, so a permission can
/// be active and lapsed at the same time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    pub id: u64,
    pub resource_id: u64,
    pub user: PrincipalId,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub granted_by: PrincipalId,
}

impl Permission {
    pub(crate) fn grant(
        id: u64,
        resource_id: u64,
        user: PrincipalId,
        granted_by: PrincipalId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            resource_id,
            user,
            granted_at: now,
            expires_at: now + Duration::days(GRANT_DURATION_DAYS),
            is_active: true,
            granted_by,
        }
    }

    /// Whether the permission has lapsed at the supplied instant.
    ///
    /// Independent of `is_active`; both predicates must hold for the
    /// permission to satisfy verification.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the permission satisfies verification at the supplied
    /// instant: still active and not yet expired.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_permission_window() {
        let now = Utc::now();
        let permission = Permission::grant(1, 10, "bob".to_string(), "alice".to_string(), now);

        assert_eq!(permission.granted_at, now);
        assert_eq!(permission.expires_at, now + Duration::days(365));
        assert!(permission.expires_at > permission.granted_at);
        assert!(permission.is_active);
    }

    #[test]
    fn test_expiry_is_a_read_time_predicate() {
        let now = Utc::now();
        let permission = Permission::grant(1, 10, "bob".to_string(), "alice".to_string(), now);

        assert!(!permission.is_expired(now + Duration::days(364)));
        assert!(permission.is_expired(now + Duration::days(365)));
        assert!(permission.is_expired(now + Duration::days(400)));
        // Lapsing never touches the stored flag.
        assert!(permission.is_active);
    }

    #[test]
    fn test_validity_requires_both_predicates() {
        let now = Utc::now();
        let mut permission = Permission::grant(1, 10, "bob".to_string(), "alice".to_string(), now);

        assert!(permission.is_valid(now + Duration::days(1)));
        assert!(!permission.is_valid(now + Duration::days(366)));

        permission.is_active = false;
        assert!(!permission.is_valid(now + Duration::days(1)));
    }
}
