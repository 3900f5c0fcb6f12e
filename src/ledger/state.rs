//! Authoritative in-memory state of the ledger.

use super::allocator::IdAllocator;
use super::types::{AccessRequest, Permission, PrincipalId, Resource};
use std::collections::HashMap;

/// The complete mutable state of the ledger: the id allocator, the three
/// record tables, and the three append-only indices.
///
/// Every mutating operation touches this struct under a single exclusive
/// lock held by [`AccessLedger`](super::AccessLedger), so allocation,
/// record insertion, and index appends always commit together. Partial
/// locking would let an observer see an approval half-applied (request
/// marked processed but no permission yet), which is why the tables are
/// never guarded individually.
#[derive(Debug, Default, Clone)]
pub struct LedgerState {
    pub(crate) allocator: IdAllocator,
    pub(crate) resources: HashMap<u64, Resource>,
    pub(crate) requests: HashMap<u64, AccessRequest>,
    pub(crate) permissions: HashMap<u64, Permission>,
    /// principal -> resource ids it created, insertion order.
    pub(crate) resources_by_creator: HashMap<PrincipalId, Vec<u64>>,
    /// principal -> permission ids granted to it, insertion order.
    pub(crate) permissions_by_user: HashMap<PrincipalId, Vec<u64>>,
    /// resource id -> permission ids granted against it, insertion order.
    pub(crate) permissions_by_resource: HashMap<u64, Vec<u64>>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the id counters.
    #[must_use]
    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// Resource ids created by the given principal, in creation order.
    #[must_use]
    pub fn resources_created_by(&self, principal: &str) -> Vec<u64> {
        self.resources_by_creator
            .get(principal)
            .cloned()
            .unwrap_or_default()
    }

    /// Permission ids held by the given principal, in grant order.
    ///
    /// Revoked and lapsed permissions remain listed; indices are
    /// append-only.
    #[must_use]
    pub fn permissions_of(&self, principal: &str) -> Vec<u64> {
        self.permissions_by_user
            .get(principal)
            .cloned()
            .unwrap_or_default()
    }

    /// Permission ids granted against the given resource, in grant order.
    #[must_use]
    pub fn permissions_on_resource(&self, resource_id: u64) -> Vec<u64> {
        self.permissions_by_resource
            .get(&resource_id)
            .cloned()
            .unwrap_or_default()
    }
}
