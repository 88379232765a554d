// Directory use cases: registration and name resolution

use crate::domain::{Environment, Location, Technician, TechnicianRole};
use crate::error::{AppError, Result};
use crate::port::{DirectoryRepository, IdProvider};
use std::sync::Arc;

/// Fallback offered when no technician has registered a specialty yet
pub const DEFAULT_SPECIALTIES: &[&str] =
    &["Electrical", "Mechanical", "Plumbing", "Refrigeration"];

pub struct DirectoryService {
    repo: Arc<dyn DirectoryRepository>,
    id_provider: Arc<dyn IdProvider>,
}

impl DirectoryService {
    pub fn new(repo: Arc<dyn DirectoryRepository>, id_provider: Arc<dyn IdProvider>) -> Self {
        Self { repo, id_provider }
    }

    pub async fn register_technician(
        &self,
        name: &str,
        email: &str,
        role: TechnicianRole,
        specialty: Option<String>,
    ) -> Result<Technician> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::Validation(
                "technician name and email are required".to_string(),
            ));
        }
        let technician = Technician {
            id: self.id_provider.generate_id(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role,
            specialty,
        };
        self.repo.insert_technician(&technician).await?;
        Ok(technician)
    }

    pub async fn register_location(&self, name: &str) -> Result<Location> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "location name must not be empty".to_string(),
            ));
        }
        let location = Location {
            id: self.id_provider.generate_id(),
            name: name.trim().to_string(),
        };
        self.repo.insert_location(&location).await?;
        Ok(location)
    }

    pub async fn register_environment(
        &self,
        name: &str,
        location_id: &str,
    ) -> Result<Environment> {
        if name.trim().is_empty() || location_id.trim().is_empty() {
            return Err(AppError::Validation(
                "environment name and location are required".to_string(),
            ));
        }
        let environment = Environment {
            id: self.id_provider.generate_id(),
            name: name.trim().to_string(),
            location_id: location_id.to_string(),
        };
        self.repo.insert_environment(&environment).await?;
        Ok(environment)
    }

    pub async fn technicians(&self) -> Result<Vec<Technician>> {
        self.repo.list_technicians().await
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.repo.list_locations().await
    }

    pub async fn environments_for_location(&self, location_id: &str) -> Result<Vec<Environment>> {
        self.repo.environments_for_location(location_id).await
    }

    /// Distinct registered specialties, or the default set when none exist
    pub async fn specialties(&self) -> Result<Vec<String>> {
        let registered = self.repo.distinct_specialties().await?;
        if registered.is_empty() {
            Ok(DEFAULT_SPECIALTIES.iter().map(|s| s.to_string()).collect())
        } else {
            Ok(registered)
        }
    }
}

/// Resolve an optional technician reference to a display name
pub fn technician_name(id: Option<&str>, technicians: &[Technician]) -> String {
    id.and_then(|id| technicians.iter().find(|t| t.id == id))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "Unassigned".to_string())
}

/// Resolve a location reference to a display name
pub fn location_name(id: &str, locations: &[Location]) -> String {
    locations
        .iter()
        .find(|l| l.id == id)
        .map(|l| l.name.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Resolve an optional environment reference to a display name
pub fn environment_name(id: Option<&str>, environments: &[Environment]) -> Option<String> {
    id.and_then(|id| environments.iter().find(|e| e.id == id))
        .map(|e| e.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technician_name_resolution() {
        let technicians = vec![Technician {
            id: "tech-1".to_string(),
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            role: TechnicianRole::Technician,
            specialty: Some("Electrical".to_string()),
        }];

        assert_eq!(technician_name(Some("tech-1"), &technicians), "Ana Souza");
        assert_eq!(technician_name(Some("tech-2"), &technicians), "Unassigned");
        assert_eq!(technician_name(None, &technicians), "Unassigned");
    }

    #[test]
    fn test_location_name_resolution() {
        let locations = vec![Location {
            id: "loc-1".to_string(),
            name: "Plant A".to_string(),
        }];

        assert_eq!(location_name("loc-1", &locations), "Plant A");
        assert_eq!(location_name("loc-9", &locations), "-");
    }

    #[test]
    fn test_environment_name_resolution() {
        let environments = vec![Environment {
            id: "env-1".to_string(),
            name: "Boiler room".to_string(),
            location_id: "loc-1".to_string(),
        }];

        assert_eq!(
            environment_name(Some("env-1"), &environments).as_deref(),
            Some("Boiler room")
        );
        assert_eq!(environment_name(None, &environments), None);
    }
}
