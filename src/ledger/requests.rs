//! Access request workflow: submission and terminal processing.

use super::state::LedgerState;
use super::types::{AccessRequest, PrincipalId};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use chrono::{DateTime, Utc};

/// Effects of processing a request, fed into event publication.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub resource_id: u64,
    pub requester: PrincipalId,
    pub approved: bool,
    /// Set only when the request was approved and a permission was minted.
    pub permission_id: Option<u64>,
}

impl LedgerState {
    /// Submit a pending access request against an existing resource.
    ///
    /// Any principal may request access to any resource; there is no
    /// authorization check here. The requested level must be positive but
    /// is otherwise informational and never compared to the resource's
    /// sensitivity.
    pub fn submit_request(
        &mut self,
        resource_id: u64,
        requested_level: u32,
        requester: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<u64> {
        self.resource(resource_id)?;
        if requested_level == 0 {
            return Err(AccessLedgerError::InvalidInput(
                "requested level must be greater than zero".to_string(),
            ));
        }

        let id = self.allocator.next_request_id();
        let request = AccessRequest {
            id,
            resource_id,
            requester: PrincipalId::from(requester),
            requested_level,
            processed: false,
            approved: false,
            processed_by: None,
            created_at: now,
        };
        self.requests.insert(id, request);

        Ok(id)
    }

    /// Drive a request to its terminal state, minting a permission on
    /// approval.
    ///
    /// Only the creator of the referenced resource may process the request.
    /// The request is marked processed whether approved or rejected, and
    /// the transition is irreversible. Approval grants the requester a
    /// permission with `granted_by = caller`; the request's level is not
    /// re-validated against the resource's sensitivity at this point.
    pub fn process_request(
        &mut self,
        request_id: u64,
        approve: bool,
        caller: &str,
        now: DateTime<Utc>,
    ) -> AccessLedgerResult<ProcessOutcome> {
        let request = self.requests.get(&request_id).ok_or_else(|| {
            AccessLedgerError::NotFound(format!("access request {} does not exist", request_id))
        })?;
        if request.processed {
            return Err(AccessLedgerError::AlreadyProcessed(request_id));
        }

        let resource_id = request.resource_id;
        let requester = request.requester.clone();

        let resource = self.resource(resource_id)?;
        if resource.creator != caller {
            return Err(AccessLedgerError::Unauthorized(format!(
                "only the creator of resource {} may process request {}",
                resource_id, request_id
            )));
        }

        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or_else(|| AccessLedgerError::NotFound(format!("access request {} does not exist", request_id)))?;
        request.processed = true;
        request.approved = approve;
        request.processed_by = Some(PrincipalId::from(caller));

        let permission_id = if approve {
            Some(self.grant_permission(resource_id, &requester, caller, now))
        } else {
            None
        };

        Ok(ProcessOutcome {
            resource_id,
            requester,
            approved: approve,
            permission_id,
        })
    }

    /// Look up an access request by id.
    pub fn request(&self, request_id: u64) -> AccessLedgerResult<&AccessRequest> {
        self.requests.get(&request_id).ok_or_else(|| {
            AccessLedgerError::NotFound(format!("access request {} does not exist", request_id))
        })
    }
}
