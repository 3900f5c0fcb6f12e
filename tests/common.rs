//! Common test utilities and fixtures for ledger integration tests.

use accessledger::db::LedgerDb;
use accessledger::events::MessageBus;
use accessledger::AccessLedger;
use std::sync::Arc;
use tempfile::TempDir;

/// Shared fixture building a persistent ledger over a temporary sled
/// database.
pub struct LedgerTestFixture {
    pub ledger: AccessLedger,
    pub message_bus: Arc<MessageBus>,
    pub db: Arc<LedgerDb>,
    pub _temp_dir: TempDir,
}

impl LedgerTestFixture {
    /// Create a new fixture with initialized components.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp directory");
        let db = sled::Config::new()
            .path(temp_dir.path())
            .temporary(true)
            .open()
            .expect("failed to open temporary database");
        let db = Arc::new(LedgerDb::new(db).expect("failed to create LedgerDb"));
        let message_bus = Arc::new(MessageBus::new());
        let ledger = AccessLedger::with_db(Arc::clone(&db), Arc::clone(&message_bus))
            .expect("failed to create ledger");

        Self {
            ledger,
            message_bus,
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Create an in-memory ledger with no persistence attached.
    pub fn in_memory() -> (AccessLedger, Arc<MessageBus>) {
        let message_bus = Arc::new(MessageBus::new());
        let ledger = AccessLedger::new(Arc::clone(&message_bus));
        (ledger, message_bus)
    }
}
