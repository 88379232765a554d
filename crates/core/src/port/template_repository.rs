// Template Repository Port (Interface)

use crate::domain::Template;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Insert a new template
    async fn insert(&self, template: &Template) -> Result<()>;

    /// Find template by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Template>>;

    /// All templates, by name
    async fn list(&self) -> Result<Vec<Template>>;
}
