// Domain Layer - Pure business logic and entities

pub mod checklist;
pub mod directory;
pub mod error;
pub mod history;
pub mod task;
pub mod template;

// Re-exports
pub use checklist::{evaluate, parse_checklist, progress, ChecklistItem, ChecklistProgress};
pub use directory::{Environment, Location, Technician, TechnicianRole};
pub use error::DomainError;
pub use history::{ChecklistSnapshotItem, TaskHistoryRecord};
pub use task::{MaintenanceTask, Recurrence, TaskDetails, TaskId, TaskStatus};
pub use template::Template;
