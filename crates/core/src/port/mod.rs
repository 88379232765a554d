// Port Layer - Interfaces for external dependencies

pub mod blob_store;
pub mod directory_repository;
pub mod history_repository;
pub mod id_provider; // For deterministic testing
pub mod task_repository;
pub mod template_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use blob_store::BlobStore;
pub use directory_repository::DirectoryRepository;
pub use history_repository::HistoryRepository;
pub use id_provider::IdProvider;
pub use task_repository::{BoardFilter, TaskRepository};
pub use template_repository::TemplateRepository;
pub use time_provider::TimeProvider;
pub use transaction::{TaskTransaction, Transaction, TransactionalTaskRepository};
