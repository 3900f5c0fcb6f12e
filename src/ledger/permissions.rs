//! Permission ledger and access verification.

use super::state::LedgerState;
use super::types::{Permission, PrincipalId};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use chrono::{DateTime, Utc};

impl LedgerState {
    /// Mint a permission for `user` on `resource_id`.
    ///
    /// Only reachable through request approval; a permission never exists
    /// without a corresponding approved request.
    pub(crate) fn grant_permission(
        &mut self,
        resource_id: u64,
        user: &str,
        granted_by: &str,
        now: DateTime<Utc>,
    ) -> u64 {
        let id = self.allocator.next_permission_id();
        let permission = Permission::grant(
            id,
            resource_id,
            PrincipalId::from(user),
            PrincipalId::from(granted_by),
            now,
        );

        self.permissions.insert(id, permission);
        self.permissions_by_user
            .entry(PrincipalId::from(user))
            .or_default()
            .push(id);
        self.permissions_by_resource
            .entry(resource_id)
            .or_default()
            .push(id);

        id
    }

    /// Check whether `caller` currently holds access to `resource_id` at
    /// `required_level`.
    ///
    /// The check sequence:
    /// 1. The resource's creator always passes, independent of sensitivity
    ///    or any permission record.
    /// 2. For anyone else, a resource whose sensitivity is below the
    ///    required level can never be satisfied: sensitivity is a hard
    ///    ceiling, and permissions only grant access up to it.
    /// 3. Otherwise the caller passes if any permission in its index
    ///    references this resource, is still active, and has not lapsed at
    ///    `now`. Every entry is examined; an inactive or expired entry never
    ///    hides a later valid one.
    ///
    /// Read-only: verification never mutates a permission, even when it
    /// observes one that has lapsed.
    pub fn verify_access(
        &self,
        resource_id: u64,
        required_level: u32,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<bool> {
        let resource = self.resource(resource_id)?;

        if resource.creator == caller {
            return Ok(true);
        }
        if u32::from(resource.sensitivity_level) < required_level {
            return Ok(false);
        }

        let held = self
            .permissions_by_user
            .get(caller)
            .map(|ids| {
                ids.iter().any(|id| {
                    self.permissions
                        .get(id)
                        .is_some_and(|p| p.resource_id == resource_id && p.is_valid(now))
                })
            })
            .unwrap_or(false);

        Ok(held)
    }

    /// Revoke a permission, rendering it inert for verification.
    ///
    /// Either the permission's holder or the owning resource's creator may
    /// revoke. The transition is one-way: `is_active` flips false, while
    /// `expires_at` and the index entries are left untouched, so revoked
    /// permissions stay visible in listings.
    pub fn revoke_permission(
        &mut self,
        permission_id: u64,
        caller: &str,
    ) -> AccessLedgerResult<()> {
        let permission = self.permissions.get(&permission_id).ok_or_else(|| {
            AccessLedgerError::NotFound(format!("permission {} does not exist", permission_id))
        })?;
        if !permission.is_active {
            return Err(AccessLedgerError::AlreadyRevoked(permission_id));
        }

        let holder = permission.user.clone();
        let creator = self.resource(permission.resource_id)?.creator.clone();
        if caller != holder && caller != creator {
            return Err(AccessLedgerError::Unauthorized(format!(
                "only the holder or the resource creator may revoke permission {}",
                permission_id
            )));
        }

        if let Some(permission) = self.permissions.get_mut(&permission_id) {
            permission.is_active = false;
        }

        Ok(())
    }

    /// Look up a permission by id.
    pub fn permission(&self, permission_id: u64) -> AccessLedgerResult<&Permission> {
        self.permissions.get(&permission_id).ok_or_else(|| {
            AccessLedgerError::NotFound(format!("permission {} does not exist", permission_id))
        })
    }
}
