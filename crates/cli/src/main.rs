//! Upkeep CLI - preventive maintenance board from the terminal

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use upkeep_core::application::{
    environment_name, location_name, render_report, technician_name, CompletionOutcome,
    DirectoryService, LifecycleService, ReportContext, TemplateService, ToggleOutcome,
};
use upkeep_core::domain::{
    parse_checklist, progress, MaintenanceTask, Recurrence, TaskStatus, TechnicianRole,
};
use upkeep_core::port::id_provider::UuidProvider;
use upkeep_core::port::time_provider::SystemTimeProvider;
use upkeep_core::port::{
    BlobStore, BoardFilter, DirectoryRepository, HistoryRepository, TaskRepository, TimeProvider,
};
use upkeep_infra_fs::FsBlobStore;
use upkeep_infra_sqlite::{
    create_pool, run_migrations, SqliteDirectoryRepository, SqliteHistoryRepository,
    SqliteTaskRepository, SqliteTemplateRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.upkeep/upkeep.db";
const DEFAULT_BLOB_DIR: &str = "~/.upkeep/blobs";

const SIGNATURE_BUCKET: &str = "signatures";
const REPORT_BUCKET: &str = "reports";

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Preventive maintenance tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database path
    #[arg(long, env = "UPKEEP_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: String,

    /// Directory for stored signatures and reports
    #[arg(long, env = "UPKEEP_BLOB_DIR", default_value = DEFAULT_BLOB_DIR)]
    blob_dir: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a technician
    AddTechnician {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Role: technician or manager
        #[arg(long, default_value = "technician")]
        role: String,

        #[arg(long)]
        specialty: Option<String>,
    },

    /// Register a location
    AddLocation {
        name: String,
    },

    /// Register an environment within a location
    AddEnvironment {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,
    },

    /// List registered technicians
    Technicians,

    /// List registered locations
    Locations,

    /// List environments of a location
    Environments {
        location_id: String,
    },

    /// List registered specialties
    Specialties,

    /// Create a maintenance task
    CreateTask {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        specialty: String,

        #[arg(long)]
        technician: Option<String>,

        #[arg(long)]
        location: String,

        #[arg(long)]
        environment: Option<String>,

        /// Due date, e.g. "2026-09-15 08:00" (UTC)
        #[arg(long)]
        due: String,

        /// Recurrence: daily, weekly or monthly
        #[arg(long)]
        recurrence: Option<String>,

        /// Checklist items, one per line
        #[arg(long, default_value = "")]
        checklist: String,
    },

    /// Show the task board, optionally filtered
    Board {
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        technician: Option<String>,
    },

    /// Move a task to in_progress
    Start {
        task_id: String,
    },

    /// Toggle a checklist item
    Check {
        item_id: String,

        /// Clear the flag instead of setting it
        #[arg(long)]
        undo: bool,
    },

    /// Complete a task, archiving it to history
    Complete {
        task_id: String,

        #[arg(long)]
        notes: Option<String>,

        /// Signature image file to attach
        #[arg(long)]
        signature: Option<String>,
    },

    /// Delete a task and its checklist
    Delete {
        task_id: String,
    },

    /// Duplicate a task with a reset checklist
    CloneTask {
        task_id: String,
    },

    /// Save a task as a reusable template
    SaveTemplate {
        task_id: String,

        #[arg(long)]
        name: String,
    },

    /// Create a task pre-filled from a template
    FromTemplate {
        template_id: String,

        /// Due date, e.g. "2026-09-15 08:00" (UTC)
        #[arg(long)]
        due: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        technician: Option<String>,

        #[arg(long)]
        environment: Option<String>,
    },

    /// List saved templates
    Templates,

    /// Show archived completions of a task
    History {
        task_id: String,
    },

    /// Generate a printable report for a task
    Report {
        task_id: String,
    },

    /// Promote past-due scheduled tasks to overdue
    RefreshOverdue,
}

#[derive(Tabled)]
struct BoardRow {
    id: String,
    title: String,
    specialty: String,
    status: String,
    due: String,
    technician: String,
    location: String,
    checklist: String,
}

#[derive(Tabled)]
struct TemplateRow {
    id: String,
    name: String,
    title: String,
    specialty: String,
    recurrence: String,
    items: usize,
}

#[derive(Tabled)]
struct HistoryTableRow {
    completed_at: String,
    title: String,
    checklist: String,
    notes: String,
}

/// Wired application services sharing one pool and blob root
struct App {
    lifecycle: LifecycleService,
    templates: TemplateService,
    directory: DirectoryService,
    tasks: Arc<SqliteTaskRepository>,
    history: SqliteHistoryRepository,
    blobs: FsBlobStore,
    time_provider: Arc<SystemTimeProvider>,
}

impl App {
    async fn init(db_path: &str, blob_dir: &str) -> Result<Self> {
        let pool = create_pool(db_path)
            .await
            .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
        run_migrations(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

        let time_provider = Arc::new(SystemTimeProvider);
        let id_provider = Arc::new(UuidProvider);

        let tasks = Arc::new(SqliteTaskRepository::new(pool.clone()));
        let templates = Arc::new(SqliteTemplateRepository::new(pool.clone()));
        let directory_repo: Arc<dyn DirectoryRepository> =
            Arc::new(SqliteDirectoryRepository::new(pool.clone()));

        Ok(Self {
            lifecycle: LifecycleService::new(
                tasks.clone(),
                tasks.clone(),
                id_provider.clone(),
                time_provider.clone(),
            ),
            templates: TemplateService::new(
                tasks.clone(),
                templates,
                id_provider.clone(),
                time_provider.clone(),
            ),
            directory: DirectoryService::new(directory_repo, id_provider),
            tasks,
            history: SqliteHistoryRepository::new(pool),
            blobs: FsBlobStore::new(blob_dir),
            time_provider,
        })
    }
}

fn parse_due(value: &str) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid date {:?}, expected \"YYYY-MM-DD HH:MM\"", value))?;
    Ok(naive.and_utc().timestamp_millis())
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    match value {
        "scheduled" => Ok(TaskStatus::Scheduled),
        "in_progress" => Ok(TaskStatus::InProgress),
        "completed" => Ok(TaskStatus::Completed),
        "overdue" => Ok(TaskStatus::Overdue),
        other => anyhow::bail!(
            "unknown status {:?}, expected scheduled, in_progress, completed or overdue",
            other
        ),
    }
}

fn parse_role(value: &str) -> Result<TechnicianRole> {
    match value {
        "technician" => Ok(TechnicianRole::Technician),
        "manager" => Ok(TechnicianRole::Manager),
        other => anyhow::bail!("unknown role {:?}, expected technician or manager", other),
    }
}

fn parse_recurrence(value: Option<&str>) -> Result<Option<Recurrence>> {
    value
        .map(|v| v.parse::<Recurrence>().map_err(|e| anyhow::anyhow!("{}", e)))
        .transpose()
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn colorize_status(status: TaskStatus) -> String {
    match status {
        TaskStatus::Scheduled => status.label().normal().to_string(),
        TaskStatus::InProgress => status.label().cyan().to_string(),
        TaskStatus::Completed => status.label().green().to_string(),
        TaskStatus::Overdue => status.label().red().bold().to_string(),
    }
}

fn print_completion(outcome: &CompletionOutcome) {
    println!(
        "{}",
        format!("✓ Task {} completed", outcome.task.id).green().bold()
    );
    println!("  archived as history record {}", outcome.history_id);
    if let Some(next) = &outcome.successor {
        println!(
            "  next occurrence {} due {}",
            next.id,
            format_millis(next.due_at)
        );
    }
}

async fn board_rows(app: &App, tasks: &[MaintenanceTask]) -> Result<Vec<BoardRow>> {
    let technicians = app.directory.technicians().await?;
    let locations = app.directory.locations().await?;

    let mut rows = Vec::with_capacity(tasks.len());
    for task in tasks {
        let checklist = app.tasks.checklist_for_task(&task.id).await?;
        let p = progress(&checklist);

        rows.push(BoardRow {
            id: task.id.clone(),
            title: task.title.clone(),
            specialty: task.specialty.clone(),
            status: colorize_status(task.status),
            due: format_millis(task.due_at),
            technician: technician_name(task.technician_id.as_deref(), &technicians),
            location: location_name(&task.location_id, &locations),
            checklist: if p.total == 0 {
                "-".to_string()
            } else {
                format!("{}/{}", p.completed, p.total)
            },
        });
    }

    Ok(rows)
}

async fn run(app: App, command: Commands) -> Result<()> {
    match command {
        Commands::AddTechnician {
            name,
            email,
            role,
            specialty,
        } => {
            let role = parse_role(&role)?;
            let technician = app
                .directory
                .register_technician(&name, &email, role, specialty)
                .await?;
            println!(
                "{}",
                format!("✓ Technician {} registered ({})", technician.name, technician.id)
                    .green()
                    .bold()
            );
        }

        Commands::AddLocation { name } => {
            let location = app.directory.register_location(&name).await?;
            println!(
                "{}",
                format!("✓ Location {} registered ({})", location.name, location.id)
                    .green()
                    .bold()
            );
        }

        Commands::AddEnvironment { name, location } => {
            let environment = app.directory.register_environment(&name, &location).await?;
            println!(
                "{}",
                format!(
                    "✓ Environment {} registered ({})",
                    environment.name, environment.id
                )
                .green()
                .bold()
            );
        }

        Commands::Technicians => {
            for t in app.directory.technicians().await? {
                println!(
                    "{}  {}  {}  {}  {}",
                    t.id,
                    t.name.bold(),
                    t.email,
                    t.role,
                    t.specialty.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Locations => {
            for l in app.directory.locations().await? {
                println!("{}  {}", l.id, l.name.bold());
            }
        }

        Commands::Environments { location_id } => {
            for e in app.directory.environments_for_location(&location_id).await? {
                println!("{}  {}", e.id, e.name.bold());
            }
        }

        Commands::Specialties => {
            for s in app.directory.specialties().await? {
                println!("{}", s);
            }
        }

        Commands::CreateTask {
            title,
            description,
            specialty,
            technician,
            location,
            environment,
            due,
            recurrence,
            checklist,
        } => {
            let req = upkeep_core::application::CreateTaskRequest {
                title,
                description,
                specialty,
                technician_id: technician,
                location_id: location,
                environment_id: environment,
                due_at: parse_due(&due)?,
                recurrence: parse_recurrence(recurrence.as_deref())?,
                checklist: parse_checklist(&checklist),
                template_id: None,
            };
            let task = app.lifecycle.create_task(req).await?;
            println!(
                "{}",
                format!("✓ Task {} created ({})", task.title, task.id)
                    .green()
                    .bold()
            );
            if task.status == TaskStatus::Overdue {
                println!("{}", "  due date already past, task starts overdue".yellow());
            }
        }

        Commands::Board {
            status,
            specialty,
            location,
            technician,
        } => {
            app.lifecycle.refresh_overdue().await?;

            let filter = BoardFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                specialty,
                location_id: location,
                technician_id: technician,
            };
            let tasks = app.tasks.list_board(&filter).await?;

            if tasks.is_empty() {
                println!("{}", "No tasks match".yellow());
                return Ok(());
            }

            println!("{}", Table::new(board_rows(&app, &tasks).await?));
        }

        Commands::Start { task_id } => {
            let task = app.lifecycle.start_task(&task_id).await?;
            println!(
                "{}",
                format!("✓ Task {} is now {}", task.id, task.status).green().bold()
            );
        }

        Commands::Check { item_id, undo } => {
            match app.lifecycle.toggle_checklist_item(&item_id, !undo).await? {
                ToggleOutcome::StatusUnchanged(task) => {
                    println!("✓ Item updated, task {} stays {}", task.id, task.status);
                }
                ToggleOutcome::Started(task) => {
                    println!(
                        "{}",
                        format!("✓ Item updated, task {} moved to {}", task.id, task.status)
                            .cyan()
                            .bold()
                    );
                }
                ToggleOutcome::Completed(outcome) => print_completion(&outcome),
            }
        }

        Commands::Complete {
            task_id,
            notes,
            signature,
        } => {
            let signature_path = match signature {
                Some(file) => Some(upload_signature(&app, &task_id, &file).await?),
                None => None,
            };
            let outcome = app
                .lifecycle
                .complete_task(&task_id, notes, signature_path)
                .await?;
            print_completion(&outcome);
        }

        Commands::Delete { task_id } => {
            app.lifecycle.delete_task(&task_id).await?;
            println!("{}", format!("✓ Task {} deleted", task_id).green().bold());
        }

        Commands::CloneTask { task_id } => {
            let copy = app.lifecycle.clone_task(&task_id).await?;
            println!(
                "{}",
                format!("✓ Task cloned as {} ({})", copy.title, copy.id)
                    .green()
                    .bold()
            );
        }

        Commands::SaveTemplate { task_id, name } => {
            let template = app.templates.save_from_task(&task_id, &name).await?;
            println!(
                "{}",
                format!("✓ Template {} saved ({})", template.name, template.id)
                    .green()
                    .bold()
            );
        }

        Commands::FromTemplate {
            template_id,
            due,
            location,
            technician,
            environment,
        } => {
            let req = app
                .templates
                .prefill(&template_id, parse_due(&due)?, technician, location, environment)
                .await?;
            let task = app.lifecycle.create_task(req).await?;
            println!(
                "{}",
                format!("✓ Task {} created from template ({})", task.title, task.id)
                    .green()
                    .bold()
            );
        }

        Commands::Templates => {
            let templates = app.templates.list().await?;
            if templates.is_empty() {
                println!("{}", "No templates saved".yellow());
                return Ok(());
            }
            let rows: Vec<TemplateRow> = templates
                .into_iter()
                .map(|t| TemplateRow {
                    id: t.id,
                    name: t.name,
                    title: t.title,
                    specialty: t.specialty,
                    recurrence: t.recurrence.map(|r| r.label().to_string()).unwrap_or_else(|| "-".to_string()),
                    items: t.checklist.len(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::History { task_id } => {
            let records = app.history.list_for_task(&task_id).await?;
            if records.is_empty() {
                println!("{}", "No completions archived".yellow());
                return Ok(());
            }
            let rows: Vec<HistoryTableRow> = records
                .into_iter()
                .map(|r| {
                    let done = r.checklist.iter().filter(|i| i.is_completed).count();
                    HistoryTableRow {
                        completed_at: format_millis(r.completed_at),
                        title: r.title,
                        checklist: format!("{}/{}", done, r.checklist.len()),
                        notes: r.notes.unwrap_or_else(|| "-".to_string()),
                    }
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Report { task_id } => {
            let url = generate_report(&app, &task_id).await?;
            println!("{}", "✓ Report generated".green().bold());
            println!("  {}", url);
        }

        Commands::RefreshOverdue => {
            let promoted = app.lifecycle.refresh_overdue().await?;
            println!(
                "{}",
                format!("✓ {} task(s) promoted to overdue", promoted).green().bold()
            );
        }
    }

    Ok(())
}

/// Store a signature image in the blob store, keyed by task
async fn upload_signature(app: &App, task_id: &str, file: &str) -> Result<String> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("cannot read signature file {}", file))?;
    let file_name = std::path::Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .context("signature file has no name")?;
    let blob_path = format!("{}/{}", task_id, file_name);

    app.blobs
        .upload(SIGNATURE_BUCKET, &blob_path, &bytes, "image/png")
        .await?;

    Ok(format!("{}/{}", SIGNATURE_BUCKET, blob_path))
}

/// Render the printable report and store it next to the signatures
async fn generate_report(app: &App, task_id: &str) -> Result<String> {
    let task = app
        .tasks
        .find_by_id(&task_id.to_string())
        .await?
        .context("task not found")?;
    let checklist = app.tasks.checklist_for_task(&task.id).await?;

    let technicians = app.directory.technicians().await?;
    let locations = app.directory.locations().await?;
    let environments = app
        .directory
        .environments_for_location(&task.location_id)
        .await?;

    let technician = technician_name(task.technician_id.as_deref(), &technicians);
    let location = location_name(&task.location_id, &locations);
    let environment = environment_name(task.environment_id.as_deref(), &environments);

    let generated_at = app.time_provider.now_millis();
    let bytes = render_report(&ReportContext {
        task: &task,
        technician_name: &technician,
        location_name: &location,
        environment_name: environment.as_deref(),
        checklist: &checklist,
        generated_at,
    });

    let blob_path = format!("{}/report-{}.txt", task.id, generated_at);
    app.blobs
        .upload(REPORT_BUCKET, &blob_path, &bytes, "text/plain")
        .await?;

    Ok(app.blobs.public_url(REPORT_BUCKET, &blob_path).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_format = std::env::var("UPKEEP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("upkeep=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    let cli = Cli::parse();

    let db_path = shellexpand::tilde(&cli.db_path).into_owned();
    let blob_dir = shellexpand::tilde(&cli.blob_dir).into_owned();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    info!(version = VERSION, db_path = %db_path, "upkeep starting");

    let app = App::init(&db_path, &blob_dir).await?;
    run(app, cli.command).await
}
