// Checklist items and the checklist evaluator

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskStatus;

/// One verifiable sub-step of a maintenance task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub task_id: String,
    pub label: String,
    pub is_completed: bool,
}

/// Completion ratio of a task's checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
}

pub fn progress(items: &[ChecklistItem]) -> ChecklistProgress {
    ChecklistProgress {
        completed: items.iter().filter(|i| i.is_completed).count(),
        total: items.len(),
    }
}

/// Derive the status escalation implied by the checklist state.
///
/// One-directional: a fully checked list escalates to `Completed`, a
/// partially checked list escalates to `InProgress`, and an empty or
/// all-unchecked list changes nothing. A `Completed` task is never
/// regressed, even when an item is later unchecked.
pub fn evaluate(status: TaskStatus, items: &[ChecklistItem]) -> Option<TaskStatus> {
    if status == TaskStatus::Completed {
        return None;
    }

    let p = progress(items);
    if p.total == 0 || p.completed == 0 {
        return None;
    }
    if p.completed == p.total {
        return Some(TaskStatus::Completed);
    }
    if status != TaskStatus::InProgress {
        return Some(TaskStatus::InProgress);
    }
    None
}

/// Split newline-delimited form input into checklist labels
pub fn parse_checklist(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
