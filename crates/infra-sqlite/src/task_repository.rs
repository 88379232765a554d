// SQLite TaskRepository Implementation

use crate::error::map_sqlx_error;
use crate::SqliteTaskTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::{ChecklistItem, MaintenanceTask, Recurrence, TaskId, TaskStatus};
use upkeep_core::error::Result;
use upkeep_core::port::{
    BoardFilter, TaskRepository, TaskTransaction, TransactionalTaskRepository,
};

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<MaintenanceTask>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM maintenance_tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_task()))
    }

    async fn update(&self, task: &MaintenanceTask) -> Result<()> {
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
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        // Checklist rows cascade via the foreign key
        sqlx::query("DELETE FROM maintenance_tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_board(&self, filter: &BoardFilter) -> Result<Vec<MaintenanceTask>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT * FROM maintenance_tasks
            WHERE (?1 IS NULL OR status = ?1)
              AND (?2 IS NULL OR specialty = ?2)
              AND (?3 IS NULL OR location_id = ?3)
              AND (?4 IS NULL OR technician_id = ?4)
            ORDER BY due_at ASC, id ASC
            "#,
        )
        .bind(filter.status.map(|s| s.to_string()))
        .bind(&filter.specialty)
        .bind(&filter.location_id)
        .bind(&filter.technician_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_task()).collect())
    }

    async fn mark_overdue(&self, now_millis: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE maintenance_tasks
            SET status = 'overdue'
            WHERE status = 'scheduled' AND due_at < ?
            "#,
        )
        .bind(now_millis)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn checklist_for_task(&self, task_id: &TaskId) -> Result<Vec<ChecklistItem>> {
        let rows: Vec<ChecklistRow> =
            sqlx::query_as("SELECT * FROM checklists WHERE task_id = ? ORDER BY rowid ASC")
                .bind(task_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_item()).collect())
    }

    async fn find_checklist_item(&self, item_id: &str) -> Result<Option<ChecklistItem>> {
        let row = sqlx::query_as::<_, ChecklistRow>("SELECT * FROM checklists WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_item()))
    }

    async fn set_item_completed(&self, item_id: &str, is_completed: bool) -> Result<()> {
        sqlx::query("UPDATE checklists SET is_completed = ? WHERE id = ?")
            .bind(if is_completed { 1 } else { 0 })
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl TransactionalTaskRepository for SqliteTaskRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn TaskTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteTaskTransaction::new(tx)))
    }
}

/// SQLite row representation of a maintenance task
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    specialty: String,
    technician_id: Option<String>,
    location_id: String,
    environment_id: Option<String>,
    due_at: i64,
    recurrence: Option<String>,
    status: String,
    notes: Option<String>,
    signature_path: Option<String>,
    template_id: Option<String>,
    created_at: i64,
}

impl TaskRow {
    fn into_task(self) -> MaintenanceTask {
        let status = match self.status.as_str() {
            "scheduled" => TaskStatus::Scheduled,
            "in_progress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "overdue" => TaskStatus::Overdue,
            _ => TaskStatus::Scheduled, // Default fallback
        };

        let recurrence = self
            .recurrence
            .as_deref()
            .and_then(|r| r.parse::<Recurrence>().ok());

        MaintenanceTask {
            id: self.id,
            title: self.title,
            description: self.description,
            specialty: self.specialty,
            technician_id: self.technician_id,
            location_id: self.location_id,
            environment_id: self.environment_id,
            due_at: self.due_at,
            recurrence,
            status,
            notes: self.notes,
            signature_path: self.signature_path,
            template_id: self.template_id,
            created_at: self.created_at,
        }
    }
}

/// SQLite row representation of a checklist item
#[derive(Debug, sqlx::FromRow)]
struct ChecklistRow {
    id: String,
    task_id: String,
    item: String,
    is_completed: i32, // SQLite boolean as integer
}

impl ChecklistRow {
    fn into_item(self) -> ChecklistItem {
        ChecklistItem {
            id: self.id,
            task_id: self.task_id,
            label: self.item,
            is_completed: self.is_completed != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use upkeep_core::domain::TaskDetails;

    async fn setup() -> SqliteTaskRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        // Location referenced by test tasks
        sqlx::query("INSERT INTO locations (id, name) VALUES ('loc-1', 'Plant A')")
            .execute(&pool)
            .await
            .unwrap();

        SqliteTaskRepository::new(pool)
    }

    fn task(id: &str, due_at: i64, now: i64) -> MaintenanceTask {
        MaintenanceTask::new(
            id,
            now,
            TaskDetails {
                title: format!("Task {}", id),
                description: String::new(),
                specialty: "Electrical".to_string(),
                technician_id: None,
                location_id: "loc-1".to_string(),
                environment_id: None,
                due_at,
                recurrence: None,
            },
        )
    }

    async fn insert(repo: &SqliteTaskRepository, task: &MaintenanceTask, items: &[ChecklistItem]) {
        let mut tx = repo.begin_transaction().await.unwrap();
        tx.insert_task(task).await.unwrap();
        tx.insert_checklist_items(items).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = setup().await;
        let t = task("t1", 2_000, 1_000);
        insert(&repo, &t, &[]).await;

        let found = repo.find_by_id(&t.id).await.unwrap().unwrap();
        assert_eq!(found.id, "t1");
        assert_eq!(found.status, TaskStatus::Scheduled);
        assert_eq!(found.location_id, "loc-1");
    }

    #[tokio::test]
    async fn test_delete_cascades_checklist() {
        let repo = setup().await;
        let t = task("t1", 2_000, 1_000);
        let items = vec![
            ChecklistItem {
                id: "i1".to_string(),
                task_id: "t1".to_string(),
                label: "step one".to_string(),
                is_completed: false,
            },
            ChecklistItem {
                id: "i2".to_string(),
                task_id: "t1".to_string(),
                label: "step two".to_string(),
                is_completed: false,
            },
        ];
        insert(&repo, &t, &items).await;
        assert_eq!(repo.checklist_for_task(&t.id).await.unwrap().len(), 2);

        repo.delete(&t.id).await.unwrap();

        assert!(repo.find_by_id(&t.id).await.unwrap().is_none());
        assert!(repo.checklist_for_task(&t.id).await.unwrap().is_empty());
        assert!(repo.find_checklist_item("i1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_overdue_promotes_only_past_scheduled() {
        let repo = setup().await;
        insert(&repo, &task("past", 500, 400), &[]).await;
        insert(&repo, &task("future", 5_000, 400), &[]).await;

        let mut started = task("started", 600, 400);
        started.start().unwrap();
        insert(&repo, &started, &[]).await;

        let promoted = repo.mark_overdue(1_000).await.unwrap();
        assert_eq!(promoted, 1);

        let past = repo.find_by_id(&"past".to_string()).await.unwrap().unwrap();
        assert_eq!(past.status, TaskStatus::Overdue);
        let future = repo
            .find_by_id(&"future".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(future.status, TaskStatus::Scheduled);
        let started = repo
            .find_by_id(&"started".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(started.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_list_board_filters_and_orders() {
        let repo = setup().await;
        insert(&repo, &task("later", 9_000, 1_000), &[]).await;
        insert(&repo, &task("sooner", 2_000, 1_000), &[]).await;

        let mut other = task("other", 3_000, 1_000);
        other.specialty = "Plumbing".to_string();
        insert(&repo, &other, &[]).await;

        let all = repo.list_board(&BoardFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "sooner");

        let electrical = repo
            .list_board(&BoardFilter {
                specialty: Some("Electrical".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(electrical.len(), 2);

        let scheduled = repo
            .list_board(&BoardFilter {
                status: Some(TaskStatus::Scheduled),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scheduled.len(), 3);
    }

    #[tokio::test]
    async fn test_set_item_completed_round_trip() {
        let repo = setup().await;
        let t = task("t1", 2_000, 1_000);
        let items = vec![ChecklistItem {
            id: "i1".to_string(),
            task_id: "t1".to_string(),
            label: "step".to_string(),
            is_completed: false,
        }];
        insert(&repo, &t, &items).await;

        repo.set_item_completed("i1", true).await.unwrap();
        let item = repo.find_checklist_item("i1").await.unwrap().unwrap();
        assert!(item.is_completed);

        repo.set_item_completed("i1", false).await.unwrap();
        let item = repo.find_checklist_item("i1").await.unwrap().unwrap();
        assert!(!item.is_completed);
    }
}
