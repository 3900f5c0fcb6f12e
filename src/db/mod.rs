//! Sled-backed persistence for the ledger.
//!
//! This is the narrow storage collaborator from the host environment: the
//! ledger works purely in memory and writes records through here when a
//! store is attached. Records are serialized as JSON and keyed by their
//! big-endian id so tree iteration yields them in allocation order, which
//! lets the append-only indices be rebuilt deterministically at load.

use crate::error::AccessLedgerResult;
use crate::ledger::allocator::IdAllocator;
use crate::ledger::state::LedgerState;
use crate::ledger::types::{AccessRequest, Permission, Resource};
use serde::{de::DeserializeOwned, Serialize};

const COUNTERS_KEY: &str = "counters";

/// Persistence handle over a sled database with one tree per record kind.
pub struct LedgerDb {
    db: sled::Db,
    resources_tree: sled::Tree,
    requests_tree: sled::Tree,
    permissions_tree: sled::Tree,
    metadata_tree: sled::Tree,
}

impl LedgerDb {
    /// Open all required trees on the given database.
    pub fn new(db: sled::Db) -> Result<Self, sled::Error> {
        let resources_tree = db.open_tree("resources")?;
        let requests_tree = db.open_tree("access_requests")?;
        let permissions_tree = db.open_tree("permissions")?;
        let metadata_tree = db.open_tree("metadata")?;

        Ok(Self {
            db,
            resources_tree,
            requests_tree,
            permissions_tree,
            metadata_tree,
        })
    }

    /// Open a database at the given path.
    pub fn open(path: &std::path::Path) -> AccessLedgerResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::new(db)?)
    }

    pub fn store_resource(&self, resource: &Resource) -> AccessLedgerResult<()> {
        self.store_record(&self.resources_tree, resource.id, resource)
    }

    pub fn store_request(&self, request: &AccessRequest) -> AccessLedgerResult<()> {
        self.store_record(&self.requests_tree, request.id, request)
    }

    pub fn store_permission(&self, permission: &Permission) -> AccessLedgerResult<()> {
        self.store_record(&self.permissions_tree, permission.id, permission)
    }

    /// Persist the allocator snapshot so id spaces survive a restart.
    pub fn store_counters(&self, allocator: &IdAllocator) -> AccessLedgerResult<()> {
        let bytes = serde_json::to_vec(allocator)?;
        self.metadata_tree.insert(COUNTERS_KEY.as_bytes(), bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Rebuild the complete in-memory state from disk.
    ///
    /// Records come back in id order, so pushing index entries during the
    /// scan reproduces the original insertion order. An empty database
    /// yields a fresh state.
    pub fn load_state(&self) -> AccessLedgerResult<LedgerState> {
        let mut state = LedgerState::new();

        for resource in self.load_records::<Resource>(&self.resources_tree)? {
            state
                .resources_by_creator
                .entry(resource.creator.clone())
                .or_default()
                .push(resource.id);
            state.resources.insert(resource.id, resource);
        }

        for request in self.load_records::<AccessRequest>(&self.requests_tree)? {
            state.requests.insert(request.id, request);
        }

        for permission in self.load_records::<Permission>(&self.permissions_tree)? {
            state
                .permissions_by_user
                .entry(permission.user.clone())
                .or_default()
                .push(permission.id);
            state
                .permissions_by_resource
                .entry(permission.resource_id)
                .or_default()
                .push(permission.id);
            state.permissions.insert(permission.id, permission);
        }

        if let Some(bytes) = self.metadata_tree.get(COUNTERS_KEY.as_bytes())? {
            state.allocator = serde_json::from_slice(&bytes)?;
        }

        // Records are flushed before the counter snapshot, so a fault
        // between the two can leave a record above the snapshot. Counters
        // must never fall below a stored id.
        let max_resource = state.resources.keys().max().copied().unwrap_or(0);
        let max_request = state.requests.keys().max().copied().unwrap_or(0);
        let max_permission = state.permissions.keys().max().copied().unwrap_or(0);
        state.allocator.align_to(max_resource, max_request, max_permission);

        Ok(state)
    }

    fn store_record<T: Serialize>(
        &self,
        tree: &sled::Tree,
        id: u64,
        record: &T,
    ) -> AccessLedgerResult<()> {
        let bytes = serde_json::to_vec(record)?;
        tree.insert(id.to_be_bytes(), bytes)?;
        // Ensure the record is durably written before the mutation is
        // reported as committed.
        self.db.flush()?;
        Ok(())
    }

    fn load_records<T: DeserializeOwned>(&self, tree: &sled::Tree) -> AccessLedgerResult<Vec<T>> {
        let mut records = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) = entry?;
            records.push(serde_json::from_slice(&bytes)?);
        }
        Ok(records)
    }
}
