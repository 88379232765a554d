// SQLite Transaction Implementation

use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use upkeep_core::domain::{ChecklistItem, MaintenanceTask, TaskHistoryRecord};
use upkeep_core::error::Result;
use upkeep_core::port::{TaskTransaction, Transaction};

use crate::error::map_sqlx_error;

pub struct SqliteTaskTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteTaskTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteTaskTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl TaskTransaction for SqliteTaskTransaction<'_> {
    async fn insert_task(&mut self, task: &MaintenanceTask) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_tasks (
                id, title, description, specialty, technician_id,
                location_id, environment_id, due_at, recurrence, status,
                notes, signature_path, template_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.specialty)
        .bind(&task.technician_id)
        .bind(&task.location_id)
        .bind(&task.environment_id)
        .bind(task.due_at)
        .bind(task.recurrence.map(|r| r.to_string()))
        .bind(task.status.to_string())
        .bind(&task.notes)
        .bind(&task.signature_path)
        .bind(&task.template_id)
        .bind(task.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_task(&mut self, task: &MaintenanceTask) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE maintenance_tasks
            SET title = ?, description = ?, specialty = ?, technician_id = ?,
                location_id = ?, environment_id = ?, due_at = ?, recurrence = ?,
                status = ?, notes = ?, signature_path = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.specialty)
        .bind(&task.technician_id)
        .bind(&task.location_id)
        .bind(&task.environment_id)
        .bind(task.due_at)
        .bind(task.recurrence.map(|r| r.to_string()))
        .bind(task.status.to_string())
        .bind(&task.notes)
        .bind(&task.signature_path)
        .bind(&task.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_checklist_items(&mut self, items: &[ChecklistItem]) -> Result<()> {
        for item in items {
            sqlx::query(
                "INSERT INTO checklists (id, task_id, item, is_completed) VALUES (?, ?, ?, ?)",
            )
            .bind(&item.id)
            .bind(&item.task_id)
            .bind(&item.label)
            .bind(if item.is_completed { 1 } else { 0 })
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        Ok(())
    }

    async fn insert_history(&mut self, record: &TaskHistoryRecord) -> Result<()> {
        let checklist_json = serde_json::to_string(&record.checklist)?;

        sqlx::query(
            r#"
            INSERT INTO task_history (
                id, task_id, title, description, specialty, technician_id,
                location_id, environment_id, completed_at, checklist, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.task_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.specialty)
        .bind(&record.technician_id)
        .bind(&record.location_id)
        .bind(&record.environment_id)
        .bind(record.completed_at)
        .bind(checklist_json)
        .bind(&record.notes)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
