//! Resource registry operations.

use super::state::LedgerState;
use super::types::{PrincipalId, Resource};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use chrono::{DateTime, Utc};

impl LedgerState {
    /// Register a new resource owned by `creator`.
    ///
    /// Fails with `InvalidInput` if the name or description is empty. The
    /// sensitivity level is not bounded beyond its integer range; 0 is a
    /// legal (public) classification.
    pub fn create_resource(
        &mut self,
        name: &str,
        description: &str,
        sensitivity_level: u8,
        creator: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<u64> {
        if name.is_empty() {
            return Err(AccessLedgerError::InvalidInput(
                "resource name must not be empty".to_string(),
            ));
        }
        if description.is_empty() {
            return Err(AccessLedgerError::InvalidInput(
                "resource description must not be empty".to_string(),
            ));
        }

        let id = self.allocator.next_resource_id();
        let resource = Resource {
            id,
            name: name.to_string(),
            description: description.to_string(),
            creator: PrincipalId::from(creator),
            sensitivity_level,
            created_at: now,
        };

        self.resources.insert(id, resource);
        self.resources_by_creator
            .entry(PrincipalId::from(creator))
            .or_default()
            .push(id);

        Ok(id)
    }

    /// Look up a resource by id.
    pub fn resource(&self, resource_id: u64) -> AccessLedgerResult<&Resource> {
        self.resources.get(&resource_id).ok_or_else(|| {
            AccessLedgerError::NotFound(format!("resource {} does not exist", resource_id))
        })
    }
}
