// SQLite HistoryRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::TaskHistoryRecord;
use upkeep_core::error::Result;
use upkeep_core::port::HistoryRepository;

use crate::error::map_sqlx_error;

pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn list_for_task(&self, task_id: &str) -> Result<Vec<TaskHistoryRecord>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT * FROM task_history WHERE task_id = ? ORDER BY completed_at DESC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: String,
    task_id: String,
    title: String,
    description: String,
    specialty: String,
    technician_id: Option<String>,
    location_id: String,
    environment_id: Option<String>,
    completed_at: i64,
    checklist: String, // JSON column
    notes: Option<String>,
}

impl HistoryRow {
    fn into_record(self) -> TaskHistoryRecord {
        let checklist = serde_json::from_str(&self.checklist).unwrap_or_default();

        TaskHistoryRecord {
            id: self.id,
            task_id: self.task_id,
            title: self.title,
            description: self.description,
            specialty: self.specialty,
            technician_id: self.technician_id,
            location_id: self.location_id,
            environment_id: self.environment_id,
            completed_at: self.completed_at,
            checklist,
            notes: self.notes,
        }
    }
}
