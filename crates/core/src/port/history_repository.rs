// Task History Port (Interface)
//
// History records are written through the completion transaction
// (TaskTransaction::insert_history); this port covers reads only.

use crate::domain::TaskHistoryRecord;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// History records for a task, newest first
    async fn list_for_task(&self, task_id: &str) -> Result<Vec<TaskHistoryRecord>>;
}
