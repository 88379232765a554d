// Directory Repository Port (Interface)

use crate::domain::{Environment, Location, Technician};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for technicians, locations and environments
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn insert_technician(&self, technician: &Technician) -> Result<()>;

    async fn list_technicians(&self) -> Result<Vec<Technician>>;

    async fn insert_location(&self, location: &Location) -> Result<()>;

    async fn list_locations(&self) -> Result<Vec<Location>>;

    async fn insert_environment(&self, environment: &Environment) -> Result<()>;

    /// Environments belonging to one location
    async fn environments_for_location(&self, location_id: &str) -> Result<Vec<Environment>>;

    /// Distinct technician specialties, sorted
    async fn distinct_specialties(&self) -> Result<Vec<String>>;
}
