//! Event type definitions for ledger notifications.
//!
//! Each event carries a unique event id and the ledger timestamp of the
//! mutation that produced it, alongside the identifiers an observer needs
//! to correlate the event with stored records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait implemented by every publishable event type.
///
/// The `type_id` string keys the subscriber registry in the message bus.
pub trait EventType: Clone + Send + 'static {
    fn type_id() -> &'static str;
}

/// A new resource was registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceCreated {
    pub event_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub resource_id: u64,
    pub name: String,
    pub creator: String,
}

impl EventType for ResourceCreated {
    fn type_id() -> &'static str {
        "ResourceCreated"
    }
}

/// A principal submitted an access request against a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessRequested {
    pub event_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub request_id: u64,
    pub resource_id: u64,
    pub requester: String,
}

impl EventType for AccessRequested {
    fn type_id() -> &'static str {
        "AccessRequested"
    }
}

/// An access request reached its terminal state (approved or rejected).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessRequestProcessed {
    pub event_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub request_id: u64,
    pub approved: bool,
    pub processed_by: String,
}

impl EventType for AccessRequestProcessed {
    fn type_id() -> &'static str {
        "AccessRequestProcessed"
    }
}

/// A permission was minted as the side effect of an approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionGranted {
    pub event_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub permission_id: u64,
    pub resource_id: u64,
    pub user: String,
    pub granted_by: String,
}

impl EventType for PermissionGranted {
    fn type_id() -> &'static str {
        "PermissionGranted"
    }
}

/// An active permission was explicitly revoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionRevoked {
    pub event_id: Uuid,
    pub emitted_at: DateTime<Utc>,
    pub permission_id: u64,
    pub revoked_by: String,
}

impl EventType for PermissionRevoked {
    fn type_id() -> &'static str {
        "PermissionRevoked"
    }
}
