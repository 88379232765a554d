//! Task lifecycle integration tests
//!
//! Full flow against real SQLite: creation, checklist escalation,
//! completion, overdue promotion and deletion.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use upkeep_core::application::{CreateTaskRequest, LifecycleService, ToggleOutcome};
use upkeep_core::domain::{Location, TaskStatus};
use upkeep_core::port::id_provider::UuidProvider;
use upkeep_core::port::{
    DirectoryRepository, TaskRepository, TaskTransaction, TimeProvider, Transaction,
    TransactionalTaskRepository,
};
use upkeep_infra_sqlite::{
    create_pool, run_migrations, SqliteDirectoryRepository, SqliteTaskRepository,
};

/// Controllable clock for deterministic due-date checks
struct FixedTimeProvider(AtomicI64);

impl FixedTimeProvider {
    fn new(millis: i64) -> Self {
        Self(AtomicI64::new(millis))
    }

    fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .timestamp_millis()
}

struct Fixture {
    lifecycle: LifecycleService,
    tasks: Arc<SqliteTaskRepository>,
    clock: Arc<FixedTimeProvider>,
    pool: sqlx::SqlitePool,
}

async fn setup(now: i64) -> Fixture {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let directory = SqliteDirectoryRepository::new(pool.clone());
    directory
        .insert_location(&Location {
            id: "loc-1".to_string(),
            name: "Plant A".to_string(),
        })
        .await
        .unwrap();

    let tasks = Arc::new(SqliteTaskRepository::new(pool.clone()));
    let clock = Arc::new(FixedTimeProvider::new(now));

    Fixture {
        lifecycle: LifecycleService::new(
            tasks.clone(),
            tasks.clone(),
            Arc::new(UuidProvider),
            clock.clone(),
        ),
        tasks,
        clock,
        pool,
    }
}

fn request(due_at: i64, checklist: Vec<&str>) -> CreateTaskRequest {
    CreateTaskRequest {
        title: "Inspect generator".to_string(),
        description: "Monthly generator inspection".to_string(),
        specialty: "Electrical".to_string(),
        technician_id: None,
        location_id: "loc-1".to_string(),
        environment_id: None,
        due_at,
        recurrence: None,
        checklist: checklist.into_iter().map(str::to_string).collect(),
        template_id: None,
    }
}

#[tokio::test]
async fn test_create_task_persists_checklist_in_order() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 86_400_000, vec!["oil", "belts", "battery"]))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Scheduled);

    let stored = fx.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Inspect generator");

    let checklist = fx.tasks.checklist_for_task(&task.id).await.unwrap();
    let labels: Vec<&str> = checklist.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["oil", "belts", "battery"]);
    assert!(checklist.iter().all(|i| !i.is_completed));
}

#[tokio::test]
async fn test_past_due_task_starts_overdue() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now - 1, vec![]))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Overdue);
}

#[tokio::test]
async fn test_partial_checklist_escalates_to_in_progress() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec!["a", "b", "c"]))
        .await
        .unwrap();
    let checklist = fx.tasks.checklist_for_task(&task.id).await.unwrap();

    let outcome = fx
        .lifecycle
        .toggle_checklist_item(&checklist[0].id, true)
        .await
        .unwrap();

    match outcome {
        ToggleOutcome::Started(task) => assert_eq!(task.status, TaskStatus::InProgress),
        other => panic!("expected escalation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_checklist_completes_and_archives() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec!["a", "b"]))
        .await
        .unwrap();
    let checklist = fx.tasks.checklist_for_task(&task.id).await.unwrap();

    fx.lifecycle
        .toggle_checklist_item(&checklist[0].id, true)
        .await
        .unwrap();
    let outcome = fx
        .lifecycle
        .toggle_checklist_item(&checklist[1].id, true)
        .await
        .unwrap();

    let ToggleOutcome::Completed(completion) = outcome else {
        panic!("expected completion");
    };
    assert_eq!(completion.task.status, TaskStatus::Completed);
    assert!(completion.successor.is_none(), "no recurrence, no successor");

    let stored = fx.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_uncheck_does_not_regress_status() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec!["a", "b"]))
        .await
        .unwrap();
    let checklist = fx.tasks.checklist_for_task(&task.id).await.unwrap();

    fx.lifecycle
        .toggle_checklist_item(&checklist[0].id, true)
        .await
        .unwrap();
    let outcome = fx
        .lifecycle
        .toggle_checklist_item(&checklist[0].id, false)
        .await
        .unwrap();

    match outcome {
        ToggleOutcome::StatusUnchanged(task) => {
            assert_eq!(task.status, TaskStatus::InProgress);
        }
        other => panic!("expected unchanged status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_rejects_double_start() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec![]))
        .await
        .unwrap();

    let started = fx.lifecycle.start_task(&task.id).await.unwrap();
    assert_eq!(started.status, TaskStatus::InProgress);

    let err = fx.lifecycle.start_task(&task.id).await.unwrap_err();
    assert!(err.to_string().contains("Invalid task status transition"));
}

#[tokio::test]
async fn test_overdue_task_can_start() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now - 1_000, vec![]))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Overdue);

    let started = fx.lifecycle.start_task(&task.id).await.unwrap();
    assert_eq!(started.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn test_refresh_overdue_promotes_past_scheduled() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let due_soon = fx
        .lifecycle
        .create_task(request(now + 60_000, vec![]))
        .await
        .unwrap();
    assert_eq!(due_soon.status, TaskStatus::Scheduled);

    // Clock moves past the due date
    fx.clock.set(now + 120_000);
    let promoted = fx.lifecycle.refresh_overdue().await.unwrap();
    assert_eq!(promoted, 1);

    let stored = fx.tasks.find_by_id(&due_soon.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Overdue);

    // Second pass is a no-op
    assert_eq!(fx.lifecycle.refresh_overdue().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_removes_task_and_checklist() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec!["a"]))
        .await
        .unwrap();

    fx.lifecycle.delete_task(&task.id).await.unwrap();

    assert!(fx.tasks.find_by_id(&task.id).await.unwrap().is_none());
    assert!(fx
        .tasks
        .checklist_for_task(&task.id)
        .await
        .unwrap()
        .is_empty());

    // Cascade really removed the rows, not just hid them from the query
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM checklists")
        .fetch_one(&fx.pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    let err = fx.lifecycle.delete_task(&task.id).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_clone_resets_checklist_flags() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec!["a", "b"]))
        .await
        .unwrap();
    let checklist = fx.tasks.checklist_for_task(&task.id).await.unwrap();
    fx.lifecycle
        .toggle_checklist_item(&checklist[0].id, true)
        .await
        .unwrap();

    let copy = fx.lifecycle.clone_task(&task.id).await.unwrap();

    assert_ne!(copy.id, task.id);
    assert_eq!(copy.title, task.title);
    assert_eq!(copy.status, TaskStatus::Scheduled);

    let copied = fx.tasks.checklist_for_task(&copy.id).await.unwrap();
    let labels: Vec<&str> = copied.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b"]);
    assert!(copied.iter().all(|i| !i.is_completed));
}

#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_rows() {
    let now = millis(2026, 3, 1, 9, 0);
    let fx = setup(now).await;

    let task = fx
        .lifecycle
        .create_task(request(now + 1_000, vec![]))
        .await
        .unwrap();

    let mut tx = fx.tasks.begin_transaction().await.unwrap();
    let mut doomed = task.clone();
    doomed.id = "doomed".to_string();
    tx.insert_task(&doomed).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(fx
        .tasks
        .find_by_id(&"doomed".to_string())
        .await
        .unwrap()
        .is_none());
}
