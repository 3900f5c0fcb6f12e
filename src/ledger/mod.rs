//! Core of the access-control ledger.
//!
//! [`AccessLedger`] is the single authoritative owner of ledger state. It
//! serializes every mutation behind one lock, writes through to the
//! optional sled-backed store, and publishes notification events once a
//! mutation has committed.

pub mod allocator;
pub mod permissions;
pub mod requests;
pub mod resources;
pub mod state;
pub mod types;

pub use allocator::IdAllocator;
pub use requests::ProcessOutcome;
pub use state::LedgerState;
pub use types::{
    AccessRequest, Permission, PrincipalId, Resource, GRANT_DURATION_DAYS,
};

use crate::db::LedgerDb;
use crate::error::AccessLedgerResult;
use crate::events::types::{
    AccessRequestProcessed, AccessRequested, EventType, PermissionGranted, PermissionRevoked,
    ResourceCreated,
};
use crate::events::MessageBus;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// The access-control ledger.
///
/// Tracks named resources, records access requests by principals, and
/// grants time-bounded permissions once a request is approved. All state
/// lives behind a single mutex so every mutating operation commits
/// atomically in a total order; reads observe a consistent snapshot.
///
/// Timestamps are always supplied by the caller. The ledger never reads
/// the clock itself, which keeps expiry evaluation a pure comparison
/// against host-provided time.
pub struct AccessLedger {
    state: Arc<Mutex<LedgerState>>,
    message_bus: Arc<MessageBus>,
    db: Option<Arc<LedgerDb>>,
}

impl AccessLedger {
    /// Create an in-memory ledger with no persistence.
    pub fn new(message_bus: Arc<MessageBus>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState::new())),
            message_bus,
            db: None,
        }
    }

    /// Create a ledger backed by a sled store, loading any previously
    /// persisted state.
    pub fn with_db(db: Arc<LedgerDb>, message_bus: Arc<MessageBus>) -> AccessLedgerResult<Self> {
        let state = db.load_state()?;
        info!(
            "Loaded ledger state: {} resources, {} requests, {} permissions",
            state.allocator().resource_count(),
            state.allocator().request_count(),
            state.allocator().permission_count()
        );
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            message_bus,
            db: Some(db),
        })
    }

    /// Build a ledger from a host configuration: persistent over a sled
    /// store at the configured path, or purely in-memory when persistence
    /// is disabled.
    pub fn from_config(
        config: &crate::config::LedgerConfig,
        message_bus: Arc<MessageBus>,
    ) -> AccessLedgerResult<Self> {
        if config.persistence_enabled {
            let db = Arc::new(LedgerDb::open(&config.storage_path)?);
            Self::with_db(db, message_bus)
        } else {
            Ok(Self::new(message_bus))
        }
    }

    /// The bus this ledger publishes notification events on.
    #[must_use]
    pub fn message_bus(&self) -> &Arc<MessageBus> {
        &self.message_bus
    }

    // ----- Resource registry -----

    /// Register a new resource and return its id.
    pub fn create_resource(
        &self,
        name: &str,
        description: &str,
        sensitivity_level: u8,
        creator: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<u64> {
        let resource_id = {
            let mut state = self.state.lock().unwrap();
            let id = state.create_resource(name, description, sensitivity_level, creator, now)?;
            if let Some(db) = &self.db {
                db.store_resource(state.resource(id)?)?;
                db.store_counters(state.allocator())?;
            }
            id
        };

        info!(
            "Resource {} ('{}') created by {} at sensitivity {}",
            resource_id, name, creator, sensitivity_level
        );
        self.publish(ResourceCreated {
            event_id: Uuid::new_v4(),
            emitted_at: now,
            resource_id,
            name: name.to_string(),
            creator: creator.to_string(),
        });

        Ok(resource_id)
    }

    /// Fetch a resource record by id.
    pub fn get_resource(&self, resource_id: u64) -> AccessLedgerResult<Resource> {
        let state = self.state.lock().unwrap();
        state.resource(resource_id).cloned()
    }

    /// Resource ids created by the given principal, in creation order.
    #[must_use]
    pub fn resources_created_by(&self, principal: &str) -> Vec<u64> {
        self.state.lock().unwrap().resources_created_by(principal)
    }

    // ----- Request workflow -----

    /// Submit an access request and return its id.
    pub fn submit_access_request(
        &self,
        resource_id: u64,
        requested_level: u32,
        requester: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<u64> {
        let request_id = {
            let mut state = self.state.lock().unwrap();
            let id = state.submit_request(resource_id, requested_level, requester, now)?;
            if let Some(db) = &self.db {
                db.store_request(state.request(id)?)?;
                db.store_counters(state.allocator())?;
            }
            id
        };

        info!(
            "Access request {} submitted by {} for resource {} at level {}",
            request_id, requester, resource_id, requested_level
        );
        self.publish(AccessRequested {
            event_id: Uuid::new_v4(),
            emitted_at: now,
            request_id,
            resource_id,
            requester: requester.to_string(),
        });

        Ok(request_id)
    }

    /// Fetch an access request record by id.
    pub fn get_request(&self, request_id: u64) -> AccessLedgerResult<AccessRequest> {
        let state = self.state.lock().unwrap();
        state.request(request_id).cloned()
    }

    /// Approve or reject a pending request.
    ///
    /// Only the creator of the referenced resource may call this; approval
    /// mints a permission for the requester as part of the same atomic
    /// commit.
    pub fn process_access_request(
        &self,
        request_id: u64,
        approve: bool,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<()> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            let outcome = state.process_request(request_id, approve, caller, now)?;
            if let Some(db) = &self.db {
                db.store_request(state.request(request_id)?)?;
                if let Some(permission_id) = outcome.permission_id {
                    db.store_permission(state.permission(permission_id)?)?;
                }
                db.store_counters(state.allocator())?;
            }
            outcome
        };

        info!(
            "Access request {} {} by {}",
            request_id,
            if approve { "approved" } else { "rejected" },
            caller
        );
        self.publish(AccessRequestProcessed {
            event_id: Uuid::new_v4(),
            emitted_at: now,
            request_id,
            approved: approve,
            processed_by: caller.to_string(),
        });
        if let Some(permission_id) = outcome.permission_id {
            self.publish(PermissionGranted {
                event_id: Uuid::new_v4(),
                emitted_at: now,
                permission_id,
                resource_id: outcome.resource_id,
                user: outcome.requester.clone(),
                granted_by: caller.to_string(),
            });
        }

        Ok(())
    }

    // ----- Permission ledger & verifier -----

    /// Check whether `caller` currently holds access to the resource at
    /// the required level. Read-only; see
    /// [`LedgerState::verify_access`] for the check sequence.
    pub fn verify_access(
        &self,
        resource_id: u64,
        required_level: u32,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<bool> {
        let state = self.state.lock().unwrap();
        let granted = state.verify_access(resource_id, required_level, caller, now)?;
        debug!(
            "Access check for {} on resource {} at level {}: {}",
            caller, resource_id, required_level, granted
        );
        Ok(granted)
    }

    /// Revoke a permission. Only its holder or the owning resource's
    /// creator may revoke; the transition is terminal.
    pub fn revoke_permission(
        &self,
        permission_id: u64,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.revoke_permission(permission_id, caller)?;
            if let Some(db) = &self.db {
                db.store_permission(state.permission(permission_id)?)?;
            }
        }

        info!("Permission {} revoked by {}", permission_id, caller);
        self.publish(PermissionRevoked {
            event_id: Uuid::new_v4(),
            emitted_at: now,
            permission_id,
            revoked_by: caller.to_string(),
        });

        Ok(())
    }

    /// Fetch a permission record by id.
    pub fn get_permission(&self, permission_id: u64) -> AccessLedgerResult<Permission> {
        let state = self.state.lock().unwrap();
        state.permission(permission_id).cloned()
    }

    /// Permission ids held by the given principal, in grant order.
    #[must_use]
    pub fn permissions_of(&self, principal: &str) -> Vec<u64> {
        self.state.lock().unwrap().permissions_of(principal)
    }

    /// Permission ids granted against the given resource, in grant order.
    #[must_use]
    pub fn permissions_on_resource(&self, resource_id: u64) -> Vec<u64> {
        self.state.lock().unwrap().permissions_on_resource(resource_id)
    }

    // ----- Counters -----

    /// Total number of resources ever created.
    #[must_use]
    pub fn resource_count(&self) -> u64 {
        self.state.lock().unwrap().allocator().resource_count()
    }

    /// Total number of requests ever submitted.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.state.lock().unwrap().allocator().request_count()
    }

    /// Total number of permissions ever granted.
    #[must_use]
    pub fn permission_count(&self) -> u64 {
        self.state.lock().unwrap().allocator().permission_count()
    }

    /// Publish a notification event. Events are informational; a delivery
    /// failure is logged and never fails the mutation that produced it.
    fn publish<T: EventType>(&self, event: T) {
        if let Err(e) = self.message_bus.publish(event) {
            warn!("Failed to publish {} event: {}", T::type_id(), e);
        }
    }
}
