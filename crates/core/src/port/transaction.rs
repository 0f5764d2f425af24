// Transaction port for check-then-write operations

use crate::domain::{MaintenanceWindow, SlotKey, WindowId};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
///
/// Dropping a transaction without `commit` rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional WindowRepository operations
#[async_trait]
pub trait TransactionalWindowRepository: Send + Sync {
    /// Begin a new write transaction
    ///
    /// Implementations must serialize write transactions so that two
    /// conflict checks for the same slot cannot both pass before either commits.
    async fn begin_transaction(&self) -> Result<Box<dyn WindowRepositoryTransaction>>;
}

/// WindowRepository operations within a transaction
#[async_trait]
pub trait WindowRepositoryTransaction: Transaction {
    /// Find window by ID (within transaction)
    async fn find_by_id(&mut self, id: &WindowId) -> Result<Option<MaintenanceWindow>>;

    /// Windows sharing a slot key (within transaction)
    async fn find_by_slot(&mut self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>>;

    /// Insert window (within transaction)
    async fn insert(&mut self, window: &MaintenanceWindow) -> Result<()>;

    /// Persist weekday/start/end/notes/updated_at (within transaction)
    async fn update_slot(&mut self, window: &MaintenanceWindow) -> Result<()>;
}
