// Upkeep Infrastructure - SQLite Adapter
// Implements: TaskRepository, TransactionalTaskRepository,
// HistoryRepository, TemplateRepository, DirectoryRepository

mod connection;
mod directory_repository;
mod error;
mod history_repository;
mod migration;
mod task_repository;
mod template_repository;
mod transaction;

pub use connection::create_pool;
pub use directory_repository::SqliteDirectoryRepository;
pub use history_repository::SqliteHistoryRepository;
pub use migration::run_migrations;
pub use task_repository::SqliteTaskRepository;
pub use template_repository::SqliteTemplateRepository;
pub use transaction::SqliteTaskTransaction;

// Note: sqlx::Error conversion is handled by the error module helper
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
