// Template use cases: capture a blueprint from a task, pre-fill new tasks

use crate::application::lifecycle::CreateTaskRequest;
use crate::domain::Template;
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TaskRepository, TemplateRepository, TimeProvider};
use std::sync::Arc;
use tracing::info;

pub struct TemplateService {
    tasks: Arc<dyn TaskRepository>,
    templates: Arc<dyn TemplateRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl TemplateService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        templates: Arc<dyn TemplateRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tasks,
            templates,
            id_provider,
            time_provider,
        }
    }

    /// Capture a task's descriptive fields and checklist labels as a
    /// reusable blueprint. Completion flags are not part of the template.
    pub async fn save_from_task(&self, task_id: &str, name: &str) -> Result<Template> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "template name must not be empty".to_string(),
            ));
        }

        let task = self
            .tasks
            .find_by_id(&task_id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;
        let checklist = self.tasks.checklist_for_task(&task.id).await?;

        let template = Template {
            id: self.id_provider.generate_id(),
            name: name.trim().to_string(),
            title: task.title,
            description: task.description,
            specialty: task.specialty,
            recurrence: task.recurrence,
            checklist: checklist.into_iter().map(|i| i.label).collect(),
            created_at: self.time_provider.now_millis(),
        };
        self.templates.insert(&template).await?;

        info!(template_id = %template.id, task_id, "template saved");
        Ok(template)
    }

    /// Pre-fill a new-task request from a template. The caller supplies
    /// what the blueprint cannot know: due date, location and assignee.
    pub async fn prefill(
        &self,
        template_id: &str,
        due_at: i64,
        technician_id: Option<String>,
        location_id: String,
        environment_id: Option<String>,
    ) -> Result<CreateTaskRequest> {
        let template = self
            .templates
            .find_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Template {} not found", template_id)))?;

        Ok(CreateTaskRequest {
            title: template.title,
            description: template.description,
            specialty: template.specialty,
            technician_id,
            location_id,
            environment_id,
            due_at,
            recurrence: template.recurrence,
            checklist: template.checklist,
            template_id: Some(template.id),
        })
    }

    pub async fn list(&self) -> Result<Vec<Template>> {
        self.templates.list().await
    }
}
