//! Per-kind identifier allocation.

use serde::{Deserialize, Serialize};

/// Three independent monotonically increasing counters, one per record kind.
///
/// Counters are pre-incremented before an id is handed out, so the first
/// issued id is 1 and 0 remains the "no such entity" sentinel. The
/// allocator never reuses an id; it lives inside the ledger's single state
/// lock so allocation and record insertion commit as one atomic step.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdAllocator {
    resource_counter: u64,
    request_counter: u64,
    permission_counter: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_resource_id(&mut self) -> u64 {
        self.resource_counter += 1;
        self.resource_counter
    }

    pub fn next_request_id(&mut self) -> u64 {
        self.request_counter += 1;
        self.request_counter
    }

    pub fn next_permission_id(&mut self) -> u64 {
        self.permission_counter += 1;
        self.permission_counter
    }

    /// Raise each counter so it is not below the given id.
    ///
    /// Used when restoring a persisted snapshot: a fault between a record
    /// write and the counter write can leave a stored record whose id is
    /// above the snapshot, and reloading that counter unchecked would hand
    /// the id out a second time. Ids are never reused, so a restart may
    /// produce a gap but never a collision.
    pub(crate) fn align_to(&mut self, resource_id: u64, request_id: u64, permission_id: u64) {
        self.resource_counter = self.resource_counter.max(resource_id);
        self.request_counter = self.request_counter.max(request_id);
        self.permission_counter = self.permission_counter.max(permission_id);
    }

    /// Total number of resources ever created.
    #[must_use]
    pub const fn resource_count(&self) -> u64 {
        self.resource_counter
    }

    /// Total number of requests ever submitted.
    #[must_use]
    pub const fn request_count(&self) -> u64 {
        self.request_counter
    }

    /// Total number of permissions ever granted.
    #[must_use]
    pub const fn permission_count(&self) -> u64 {
        self.permission_counter
    }
}
