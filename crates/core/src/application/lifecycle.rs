// Task Lifecycle Engine - status transitions, archival and recurrence

use crate::domain::{
    evaluate, ChecklistItem, MaintenanceTask, Recurrence, TaskDetails, TaskHistoryRecord,
    TaskStatus,
};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TaskRepository, TimeProvider, TransactionalTaskRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// New-task request, either hand-filled or pre-filled from a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub specialty: String,
    pub technician_id: Option<String>,
    pub location_id: String,
    pub environment_id: Option<String>,
    pub due_at: i64,
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub checklist: Vec<String>,
    pub template_id: Option<String>,
}

/// Result of completing a task: the archived snapshot id and the recurring
/// successor, when one was spawned.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub task: MaintenanceTask,
    pub history_id: String,
    pub successor: Option<MaintenanceTask>,
}

/// Result of toggling a checklist item
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    /// Flag persisted, task status untouched
    StatusUnchanged(MaintenanceTask),
    /// Partial completion escalated the task to in_progress
    Started(MaintenanceTask),
    /// Checklist reached 100%: full completion workflow ran
    Completed(CompletionOutcome),
}

/// Validate a create request before any persistence call
pub fn validate_request(req: &CreateTaskRequest) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.location_id.trim().is_empty() {
        return Err(AppError::Validation(
            "location is required".to_string(),
        ));
    }
    if req.specialty.trim().is_empty() {
        return Err(AppError::Validation(
            "specialty is required".to_string(),
        ));
    }
    Ok(())
}

/// Task Lifecycle Service
pub struct LifecycleService {
    tasks: Arc<dyn TaskRepository>,
    tx_tasks: Arc<dyn TransactionalTaskRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl LifecycleService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        tx_tasks: Arc<dyn TransactionalTaskRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tasks,
            tx_tasks,
            id_provider,
            time_provider,
        }
    }

    /// Create a task with its checklist. Initial status is derived from the
    /// due date (overdue when already past).
    pub async fn create_task(&self, req: CreateTaskRequest) -> Result<MaintenanceTask> {
        validate_request(&req)?;

        let now = self.time_provider.now_millis();
        let mut task = MaintenanceTask::new(
            self.id_provider.generate_id(),
            now,
            TaskDetails {
                title: req.title,
                description: req.description,
                specialty: req.specialty,
                technician_id: req.technician_id,
                location_id: req.location_id,
                environment_id: req.environment_id,
                due_at: req.due_at,
                recurrence: req.recurrence,
            },
        );
        task.template_id = req.template_id;

        let items = self.checklist_items(&task.id, &req.checklist);

        let mut tx = self.tx_tasks.begin_transaction().await?;
        tx.insert_task(&task).await?;
        tx.insert_checklist_items(&items).await?;
        tx.commit().await?;

        info!(task_id = %task.id, status = %task.status, "task created");
        Ok(task)
    }

    /// Explicit start action: scheduled/overdue -> in_progress
    pub async fn start_task(&self, id: &str) -> Result<MaintenanceTask> {
        let mut task = self.fetch_task(id).await?;
        task.start().map_err(AppError::Domain)?;
        self.tasks.update(&task).await?;

        info!(task_id = %task.id, "task started");
        Ok(task)
    }

    /// Explicit complete action: archive, then spawn the recurring
    /// successor if the task has a recurrence.
    pub async fn complete_task(
        &self,
        id: &str,
        notes: Option<String>,
        signature_path: Option<String>,
    ) -> Result<CompletionOutcome> {
        let task = self.fetch_task(id).await?;
        let checklist = self.tasks.checklist_for_task(&task.id).await?;
        self.finish(task, checklist, notes, signature_path).await
    }

    /// Persist a checklist item flag and apply the evaluator's escalation.
    /// Reaching 100% runs the full completion workflow.
    pub async fn toggle_checklist_item(
        &self,
        item_id: &str,
        is_completed: bool,
    ) -> Result<ToggleOutcome> {
        let item = self
            .tasks
            .find_checklist_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checklist item {} not found", item_id)))?;

        self.tasks.set_item_completed(item_id, is_completed).await?;

        let mut task = self.fetch_task(&item.task_id).await?;
        let checklist = self.tasks.checklist_for_task(&task.id).await?;

        match evaluate(task.status, &checklist) {
            Some(TaskStatus::Completed) => {
                let outcome = self.finish(task, checklist, None, None).await?;
                Ok(ToggleOutcome::Completed(outcome))
            }
            Some(status) => {
                task.status = status;
                self.tasks.update(&task).await?;
                info!(task_id = %task.id, status = %task.status, "checklist escalated task");
                Ok(ToggleOutcome::Started(task))
            }
            None => Ok(ToggleOutcome::StatusUnchanged(task)),
        }
    }

    /// Delete a task; its checklist items cascade with it
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let task = self.fetch_task(id).await?;
        self.tasks.delete(&task.id).await?;

        info!(task_id = %task.id, "task deleted");
        Ok(())
    }

    /// Duplicate a task: fresh id, same descriptive fields and due date,
    /// checklist flags reset, status re-derived from the due date.
    pub async fn clone_task(&self, id: &str) -> Result<MaintenanceTask> {
        let source = self.fetch_task(id).await?;
        let checklist = self.tasks.checklist_for_task(&source.id).await?;

        let now = self.time_provider.now_millis();
        let mut copy = MaintenanceTask::new(self.id_provider.generate_id(), now, source.details());
        copy.template_id = source.template_id.clone();

        let labels: Vec<String> = checklist.into_iter().map(|i| i.label).collect();
        let items = self.checklist_items(&copy.id, &labels);

        let mut tx = self.tx_tasks.begin_transaction().await?;
        tx.insert_task(&copy).await?;
        tx.insert_checklist_items(&items).await?;
        tx.commit().await?;

        info!(task_id = %copy.id, source_id = %source.id, "task cloned");
        Ok(copy)
    }

    /// Explicit recomputation pass: scheduled tasks past their due date
    /// become overdue. Returns the number of promoted tasks.
    pub async fn refresh_overdue(&self) -> Result<u64> {
        let promoted = self
            .tasks
            .mark_overdue(self.time_provider.now_millis())
            .await?;
        if promoted > 0 {
            info!(promoted, "tasks promoted to overdue");
        }
        Ok(promoted)
    }

    async fn fetch_task(&self, id: &str) -> Result<MaintenanceTask> {
        self.tasks
            .find_by_id(&id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    fn checklist_items(&self, task_id: &str, labels: &[String]) -> Vec<ChecklistItem> {
        labels
            .iter()
            .map(|label| ChecklistItem {
                id: self.id_provider.generate_id(),
                task_id: task_id.to_string(),
                label: label.clone(),
                is_completed: false,
            })
            .collect()
    }

    /// Completion workflow. Archival captures the pre-completion checklist
    /// state; status update, snapshot and successor are committed in one
    /// transaction.
    async fn finish(
        &self,
        mut task: MaintenanceTask,
        checklist: Vec<ChecklistItem>,
        notes: Option<String>,
        signature_path: Option<String>,
    ) -> Result<CompletionOutcome> {
        let now = self.time_provider.now_millis();
        task.complete(notes, signature_path).map_err(AppError::Domain)?;

        let record =
            TaskHistoryRecord::snapshot(self.id_provider.generate_id(), &task, &checklist, now);

        let successor = if task.recurrence.is_some() {
            task.successor(self.id_provider.generate_id(), now)
        } else {
            None
        };
        let successor_items: Vec<ChecklistItem> = successor
            .as_ref()
            .map(|next| {
                let labels: Vec<String> =
                    checklist.iter().map(|i| i.label.clone()).collect();
                self.checklist_items(&next.id, &labels)
            })
            .unwrap_or_default();

        let mut tx = self.tx_tasks.begin_transaction().await?;
        tx.update_task(&task).await?;
        tx.insert_history(&record).await?;
        if let Some(next) = &successor {
            tx.insert_task(next).await?;
            tx.insert_checklist_items(&successor_items).await?;
        }
        tx.commit().await?;

        info!(
            task_id = %task.id,
            history_id = %record.id,
            successor = successor.as_ref().map(|s| s.id.as_str()).unwrap_or("none"),
            "task completed"
        );

        Ok(CompletionOutcome {
            task,
            history_id: record.id,
            successor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateTaskRequest {
        CreateTaskRequest {
            title: "Inspect pumps".to_string(),
            description: String::new(),
            specialty: "Plumbing".to_string(),
            technician_id: None,
            location_id: "loc-1".to_string(),
            environment_id: None,
            due_at: 1_700_000_000_000,
            recurrence: None,
            checklist: vec![],
            template_id: None,
        }
    }

    #[test]
    fn test_validate_empty_title() {
        let mut req = request();
        req.title = "   ".to_string();
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_validate_missing_location() {
        let mut req = request();
        req.location_id = String::new();
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_validate_missing_specialty() {
        let mut req = request();
        req.specialty = String::new();
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("specialty"));
    }

    #[test]
    fn test_validate_valid_request() {
        assert!(validate_request(&request()).is_ok());
    }
}
