//! Ledger notification events
//!
//! Five informational events are published after successful mutations:
//! resource creation, request submission, request processing, permission
//! grant, and permission revocation. They exist for external observers
//! (audit logging, UI refresh) and carry nothing back into the core.

pub mod bus;
pub mod types;

pub use bus::{Consumer, MessageBus, MessageBusError, MessageBusResult};
pub use types::*;
