// Task History - immutable completion snapshots

use serde::{Deserialize, Serialize};

use crate::domain::checklist::ChecklistItem;
use crate::domain::task::MaintenanceTask;

/// Checklist state captured at completion time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSnapshotItem {
    pub label: String,
    pub is_completed: bool,
}

/// Immutable snapshot of a completed task.
///
/// Created once at completion, never mutated. The checklist is embedded so
/// the record survives deletion of the task and its live checklist rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHistoryRecord {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub specialty: String,
    pub technician_id: Option<String>,
    pub location_id: String,
    pub environment_id: Option<String>,
    pub completed_at: i64, // epoch ms
    pub checklist: Vec<ChecklistSnapshotItem>,
    pub notes: Option<String>,
}

impl TaskHistoryRecord {
    /// Snapshot a task and the checklist state at the moment of completion
    pub fn snapshot(
        id: impl Into<String>,
        task: &MaintenanceTask,
        checklist: &[ChecklistItem],
        completed_at_millis: i64,
    ) -> Self {
        Self {
            id: id.into(),
            task_id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            specialty: task.specialty.clone(),
            technician_id: task.technician_id.clone(),
            location_id: task.location_id.clone(),
            environment_id: task.environment_id.clone(),
            completed_at: completed_at_millis,
            checklist: checklist
                .iter()
                .map(|item| ChecklistSnapshotItem {
                    label: item.label.clone(),
                    is_completed: item.is_completed,
                })
                .collect(),
            notes: task.notes.clone(),
        }
    }
}
