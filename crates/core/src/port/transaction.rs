// Transaction port for atomic multi-step lifecycle operations

use crate::domain::{ChecklistItem, MaintenanceTask, TaskHistoryRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional task repository operations
#[async_trait]
pub trait TransactionalTaskRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn TaskTransaction>>;
}

/// Task operations within a transaction.
///
/// Completion must persist the status change, the history snapshot and the
/// recurring successor atomically, so the snapshot can never be lost
/// between steps.
#[async_trait]
pub trait TaskTransaction: Transaction {
    /// Insert a task (within transaction)
    async fn insert_task(&mut self, task: &MaintenanceTask) -> Result<()>;

    /// Update a task (within transaction)
    async fn update_task(&mut self, task: &MaintenanceTask) -> Result<()>;

    /// Insert checklist items (within transaction)
    async fn insert_checklist_items(&mut self, items: &[ChecklistItem]) -> Result<()>;

    /// Insert a history record (within transaction)
    async fn insert_history(&mut self, record: &TaskHistoryRecord) -> Result<()>;
}
