// Task Templates - reusable blueprints for new-task creation

use serde::{Deserialize, Serialize};

use crate::domain::task::Recurrence;

/// Reusable task blueprint: descriptive fields plus checklist labels.
/// Location, assignee and due date are chosen at instantiation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub specialty: String,
    pub recurrence: Option<Recurrence>,
    pub checklist: Vec<String>,
    pub created_at: i64, // epoch ms
}
