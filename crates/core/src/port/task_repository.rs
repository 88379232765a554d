// Task Repository Port (Interface)

use crate::domain::{ChecklistItem, MaintenanceTask, TaskId, TaskStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Filters for the status board query. Results are ordered by due date
/// ascending; unset fields do not constrain the query.
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    pub status: Option<TaskStatus>,
    pub specialty: Option<String>,
    pub location_id: Option<String>,
    pub technician_id: Option<String>,
}

/// Repository interface for task and checklist persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find task by ID
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<MaintenanceTask>>;

    /// Update task (unconditional update-by-identifier)
    async fn update(&self, task: &MaintenanceTask) -> Result<()>;

    /// Delete task; checklist items cascade with it
    async fn delete(&self, id: &TaskId) -> Result<()>;

    /// Board query: tasks matching the filter, ordered by due date
    async fn list_board(&self, filter: &BoardFilter) -> Result<Vec<MaintenanceTask>>;

    /// Promote scheduled tasks whose due date has passed to overdue.
    /// Returns the number of promoted tasks.
    async fn mark_overdue(&self, now_millis: i64) -> Result<u64>;

    /// Checklist items for a task, in insertion order
    async fn checklist_for_task(&self, task_id: &TaskId) -> Result<Vec<ChecklistItem>>;

    /// Find a single checklist item
    async fn find_checklist_item(&self, item_id: &str) -> Result<Option<ChecklistItem>>;

    /// Toggle a checklist item's completion flag
    async fn set_item_completed(&self, item_id: &str, is_completed: bool) -> Result<()>;
}
