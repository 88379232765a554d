// Report generator - printable completion/status document
//
// Write-only artifact: fixed sections, no parseable-structure guarantee.

use chrono::{DateTime, Utc};

use crate::domain::{ChecklistItem, MaintenanceTask};

/// Everything the generator needs, with references already resolved to
/// display names by the caller.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub task: &'a MaintenanceTask,
    pub technician_name: &'a str,
    pub location_name: &'a str,
    pub environment_name: Option<&'a str>,
    pub checklist: &'a [ChecklistItem],
    pub generated_at: i64, // epoch ms
}

/// Render the printable report as a byte sequence
pub fn render_report(ctx: &ReportContext<'_>) -> Vec<u8> {
    let task = ctx.task;
    let mut out = String::new();

    out.push_str("MAINTENANCE REPORT\n");
    out.push_str("==================\n\n");

    out.push_str(&format!("Title:       {}\n", task.title));
    out.push_str(&format!("Description: {}\n", task.description));
    out.push_str(&format!("Specialty:   {}\n", task.specialty));
    out.push_str(&format!("Technician:  {}\n", ctx.technician_name));
    out.push_str(&format!("Location:    {}\n", ctx.location_name));
    if let Some(environment) = ctx.environment_name {
        out.push_str(&format!("Environment: {}\n", environment));
    }
    out.push_str(&format!("Due date:    {}\n", format_millis(task.due_at)));
    out.push_str(&format!("Status:      {}\n", task.status.label()));
    out.push_str(&format!(
        "Recurrence:  {}\n",
        task.recurrence.map(|r| r.label()).unwrap_or("None")
    ));

    if let Some(notes) = &task.notes {
        out.push_str("\nNotes:\n");
        out.push_str(notes);
        out.push('\n');
    }

    if !ctx.checklist.is_empty() {
        out.push_str("\nChecklist:\n");
        for item in ctx.checklist {
            let mark = if item.is_completed { "[x]" } else { "[ ]" };
            out.push_str(&format!("  {} {}\n", mark, item.label));
        }
    }

    out.push_str(&format!(
        "\nGenerated at {}\n",
        format_millis(ctx.generated_at)
    ));

    out.into_bytes()
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
