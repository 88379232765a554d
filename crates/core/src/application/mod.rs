// Application Layer - Use Cases and Business Logic

pub mod directory;
pub mod lifecycle;
pub mod report;
pub mod templates;

// Re-exports
pub use directory::{environment_name, location_name, technician_name, DirectoryService};
pub use lifecycle::{
    CompletionOutcome, CreateTaskRequest, LifecycleService, ToggleOutcome,
};
pub use report::{render_report, ReportContext};
pub use templates::TemplateService;
