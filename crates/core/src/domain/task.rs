// Maintenance Task Domain Model

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Task ID (UUID v4)
pub type TaskId = String;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Task status lifecycle.
///
/// `Completed` is terminal; `Overdue` is derived from the due date at
/// creation time and by the explicit [`mark_overdue`] recomputation pass.
///
/// [`mark_overdue`]: crate::port::TaskRepository::mark_overdue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// Human-readable label for boards and reports
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "Scheduled",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Scheduled => write!(f, "scheduled"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// Recurrence period. Absence of recurrence is modeled as `Option::None`
/// on the task, so completing a non-recurring task spawns no successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    /// Compute the due date of the next occurrence, in epoch ms.
    ///
    /// Deterministic calendar arithmetic: daily adds one day, weekly adds
    /// seven, monthly keeps the day-of-month and advances one month
    /// (December wraps to January of the next year). A day-of-month that
    /// does not exist in the target month is clamped to its last day
    /// (Jan 31 -> Feb 28, or Feb 29 in leap years).
    pub fn next_due(&self, due_at_millis: i64) -> i64 {
        match self {
            Recurrence::Daily => due_at_millis + DAY_MS,
            Recurrence::Weekly => due_at_millis + 7 * DAY_MS,
            Recurrence::Monthly => next_month(due_at_millis),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            other => Err(DomainError::ValidationError(format!(
                "unknown recurrence: {}",
                other
            ))),
        }
    }
}

fn next_month(due_at_millis: i64) -> i64 {
    let Some(due) = DateTime::<Utc>::from_timestamp_millis(due_at_millis) else {
        // Out-of-range epoch values cannot be advanced
        return due_at_millis;
    };

    let date = due.date_naive();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let day = date.day().min(last_day_of_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or(date)
        .and_time(due.time())
        .and_utc()
        .timestamp_millis()
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    (28..=31)
        .rev()
        .find(|&d| NaiveDate::from_ymd_opt(year, month, d).is_some())
        .unwrap_or(28)
}

/// Descriptive fields shared by creation, cloning and recurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetails {
    pub title: String,
    pub description: String,
    pub specialty: String,
    pub technician_id: Option<String>,
    pub location_id: String,
    pub environment_id: Option<String>,
    pub due_at: i64,
    pub recurrence: Option<Recurrence>,
}

/// Maintenance Task Entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub specialty: String,
    pub technician_id: Option<String>,
    pub location_id: String,
    pub environment_id: Option<String>,
    pub due_at: i64, // epoch ms
    pub recurrence: Option<Recurrence>,
    pub status: TaskStatus,
    pub notes: Option<String>,
    pub signature_path: Option<String>,
    pub template_id: Option<String>,
    pub created_at: i64, // epoch ms
}

impl MaintenanceTask {
    /// Create a new task with the initial status derived from the due date.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique task ID (injected, not generated)
    /// * `now_millis` - Creation timestamp in epoch ms (injected, not system time)
    /// * `details` - Descriptive fields, due date and recurrence
    pub fn new(id: impl Into<String>, now_millis: i64, details: TaskDetails) -> Self {
        let status = Self::initial_status(details.due_at, now_millis);
        Self {
            id: id.into(),
            title: details.title,
            description: details.description,
            specialty: details.specialty,
            technician_id: details.technician_id,
            location_id: details.location_id,
            environment_id: details.environment_id,
            due_at: details.due_at,
            recurrence: details.recurrence,
            status,
            notes: None,
            signature_path: None,
            template_id: None,
            created_at: now_millis,
        }
    }

    /// A task due strictly before "now" starts out overdue
    pub fn initial_status(due_at_millis: i64, now_millis: i64) -> TaskStatus {
        if due_at_millis < now_millis {
            TaskStatus::Overdue
        } else {
            TaskStatus::Scheduled
        }
    }

    pub fn details(&self) -> TaskDetails {
        TaskDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            specialty: self.specialty.clone(),
            technician_id: self.technician_id.clone(),
            location_id: self.location_id.clone(),
            environment_id: self.environment_id.clone(),
            due_at: self.due_at,
            recurrence: self.recurrence,
        }
    }

    /// Transition to InProgress (explicit start action)
    pub fn start(&mut self) -> Result<()> {
        match self.status {
            TaskStatus::Scheduled | TaskStatus::Overdue => {
                self.status = TaskStatus::InProgress;
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: TaskStatus::InProgress.to_string(),
            }),
        }
    }

    /// Transition to Completed, attaching optional notes and signature.
    ///
    /// Allowed from any non-terminal status: the board offers the complete
    /// action on every column, and checklist auto-completion may fire
    /// before an explicit start.
    pub fn complete(
        &mut self,
        notes: Option<String>,
        signature_path: Option<String>,
    ) -> Result<()> {
        if self.status == TaskStatus::Completed {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: TaskStatus::Completed.to_string(),
            });
        }
        self.status = TaskStatus::Completed;
        if notes.is_some() {
            self.notes = notes;
        }
        if signature_path.is_some() {
            self.signature_path = signature_path;
        }
        Ok(())
    }

    /// Build the recurring successor, if any.
    ///
    /// The successor copies the descriptive fields, advances the due date
    /// by the recurrence period and is always `Scheduled`, even when the
    /// advanced due date already lies in the past.
    pub fn successor(&self, id: impl Into<String>, now_millis: i64) -> Option<MaintenanceTask> {
        let recurrence = self.recurrence?;
        let mut details = self.details();
        details.due_at = recurrence.next_due(self.due_at);

        let mut next = MaintenanceTask::new(id, now_millis, details);
        next.status = TaskStatus::Scheduled;
        Some(next)
    }
}
