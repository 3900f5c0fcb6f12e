//! # accessledger
//!
//! An access-control ledger: it tracks named resources, records requests by
//! principals to access those resources, and grants time-bounded
//! permissions once a request is approved.
//!
//! The heart of the crate is the permission lifecycle state machine in
//! [`ledger`]: how resources, requests, and permissions are created,
//! transition state, expire, and are verified against. Authentication,
//! transport, and UI concerns live in the host; the ledger only expects an
//! already-authenticated principal identifier and a trusted timestamp with
//! every call.
//!
//! ## Example
//!
//! ```
//! use accessledger::{AccessLedger, events::MessageBus};
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! let ledger = AccessLedger::new(Arc::new(MessageBus::new()));
//! let now = Utc::now();
//!
//! let resource = ledger
//!     .create_resource("payroll", "salary records", 100, "alice", now)
//!     .unwrap();
//! let request = ledger
//!     .submit_access_request(resource, 80, "bob", now)
//!     .unwrap();
//! ledger.process_access_request(request, true, "alice", now).unwrap();
//!
//! assert!(ledger.verify_access(resource, 80, "bob", now).unwrap());
//! assert!(!ledger.verify_access(resource, 150, "bob", now).unwrap());
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod ledger;

pub use config::LedgerConfig;
pub use db::LedgerDb;
pub use error::{AccessLedgerError, AccessLedgerResult};
pub use events::MessageBus;
pub use ledger::{AccessLedger, AccessRequest, Permission, PrincipalId, Resource};
