// SQLite DirectoryRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use upkeep_core::domain::{Environment, Location, Technician, TechnicianRole};
use upkeep_core::error::Result;
use upkeep_core::port::DirectoryRepository;

use crate::error::map_sqlx_error;

pub struct SqliteDirectoryRepository {
    pool: SqlitePool,
}

impl SqliteDirectoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryRepository for SqliteDirectoryRepository {
    async fn insert_technician(&self, technician: &Technician) -> Result<()> {
        sqlx::query(
            "INSERT INTO technicians (id, name, email, role, specialty) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&technician.id)
        .bind(&technician.name)
        .bind(&technician.email)
        .bind(technician.role.to_string())
        .bind(&technician.specialty)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_technicians(&self) -> Result<Vec<Technician>> {
        let rows: Vec<TechnicianRow> =
            sqlx::query_as("SELECT * FROM technicians ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_technician()).collect())
    }

    async fn insert_location(&self, location: &Location) -> Result<()> {
        sqlx::query("INSERT INTO locations (id, name) VALUES (?, ?)")
            .bind(&location.id)
            .bind(&location.name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let rows: Vec<LocationRow> = sqlx::query_as("SELECT * FROM locations ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| Location {
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    async fn insert_environment(&self, environment: &Environment) -> Result<()> {
        sqlx::query("INSERT INTO environments (id, name, location_id) VALUES (?, ?, ?)")
            .bind(&environment.id)
            .bind(&environment.name)
            .bind(&environment.location_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn environments_for_location(&self, location_id: &str) -> Result<Vec<Environment>> {
        let rows: Vec<EnvironmentRow> =
            sqlx::query_as("SELECT * FROM environments WHERE location_id = ? ORDER BY name ASC")
                .bind(location_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| Environment {
                id: r.id,
                name: r.name,
                location_id: r.location_id,
            })
            .collect())
    }

    async fn distinct_specialties(&self) -> Result<Vec<String>> {
        let specialties: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT specialty FROM technicians
            WHERE specialty IS NOT NULL AND specialty != ''
            ORDER BY specialty ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(specialties)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TechnicianRow {
    id: String,
    name: String,
    email: String,
    role: String,
    specialty: Option<String>,
}

impl TechnicianRow {
    fn into_technician(self) -> Technician {
        let role = match self.role.as_str() {
            "manager" => TechnicianRole::Manager,
            _ => TechnicianRole::Technician,
        };

        Technician {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            specialty: self.specialty,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: String,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct EnvironmentRow {
    id: String,
    name: String,
    location_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup() -> SqliteDirectoryRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteDirectoryRepository::new(pool)
    }

    fn technician(id: &str, email: &str, specialty: Option<&str>) -> Technician {
        Technician {
            id: id.to_string(),
            name: format!("Tech {}", id),
            email: email.to_string(),
            role: TechnicianRole::Technician,
            specialty: specialty.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_technician_round_trip() {
        let repo = setup().await;
        repo.insert_technician(&technician("t1", "a@x.com", Some("Electrical")))
            .await
            .unwrap();

        let all = repo.list_technicians().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, TechnicianRole::Technician);
        assert_eq!(all[0].specialty.as_deref(), Some("Electrical"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = setup().await;
        repo.insert_technician(&technician("t1", "a@x.com", None))
            .await
            .unwrap();
        let err = repo
            .insert_technician(&technician("t2", "a@x.com", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unique constraint"));
    }

    #[tokio::test]
    async fn test_environments_scoped_to_location() {
        let repo = setup().await;
        repo.insert_location(&Location {
            id: "loc-1".to_string(),
            name: "Plant A".to_string(),
        })
        .await
        .unwrap();
        repo.insert_location(&Location {
            id: "loc-2".to_string(),
            name: "Plant B".to_string(),
        })
        .await
        .unwrap();

        repo.insert_environment(&Environment {
            id: "env-1".to_string(),
            name: "Boiler room".to_string(),
            location_id: "loc-1".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(
            repo.environments_for_location("loc-1").await.unwrap().len(),
            1
        );
        assert!(repo
            .environments_for_location("loc-2")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_distinct_specialties_sorted() {
        let repo = setup().await;
        repo.insert_technician(&technician("t1", "a@x.com", Some("Plumbing")))
            .await
            .unwrap();
        repo.insert_technician(&technician("t2", "b@x.com", Some("Electrical")))
            .await
            .unwrap();
        repo.insert_technician(&technician("t3", "c@x.com", Some("Plumbing")))
            .await
            .unwrap();
        repo.insert_technician(&technician("t4", "d@x.com", None))
            .await
            .unwrap();

        let specialties = repo.distinct_specialties().await.unwrap();
        assert_eq!(specialties, vec!["Electrical", "Plumbing"]);
    }
}
