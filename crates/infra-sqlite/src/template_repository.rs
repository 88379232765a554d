// SQLite TemplateRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::{Recurrence, Template};
use upkeep_core::error::Result;
use upkeep_core::port::TemplateRepository;

use crate::error::map_sqlx_error;

pub struct SqliteTemplateRepository {
    pool: SqlitePool,
}

impl SqliteTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn insert(&self, template: &Template) -> Result<()> {
        let checklist_json = serde_json::to_string(&template.checklist)?;

        sqlx::query(
            r#"
            INSERT INTO templates (
                id, name, title, description, specialty, recurrence,
                checklist, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.title)
        .bind(&template.description)
        .bind(&template.specialty)
        .bind(template.recurrence.map(|r| r.to_string()))
        .bind(checklist_json)
        .bind(template.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Template>> {
        let row = sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_template()))
    }

    async fn list(&self) -> Result<Vec<Template>> {
        let rows: Vec<TemplateRow> =
            sqlx::query_as("SELECT * FROM templates ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_template()).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    id: String,
    name: String,
    title: String,
    description: String,
    specialty: String,
    recurrence: Option<String>,
    checklist: String, // JSON column
    created_at: i64,
}

impl TemplateRow {
    fn into_template(self) -> Template {
        Template {
            id: self.id,
            name: self.name,
            title: self.title,
            description: self.description,
            specialty: self.specialty,
            recurrence: self
                .recurrence
                .as_deref()
                .and_then(|r| r.parse::<Recurrence>().ok()),
            checklist: serde_json::from_str(&self.checklist).unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}
