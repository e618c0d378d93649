use std::io::{self, Write};

use serde_json::{Value, json};
use taskmaster_core::{Dashboard, DashboardRow, TaskCounts, TaskFilter};

pub fn render_stats(counts: &TaskCounts, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Total: {}  Pending: {}  Completed: {}  Progress: {}%",
        counts.all,
        counts.pending,
        counts.completed,
        counts.completion_percent()
    )
}

pub fn render_dashboard(dashboard: &Dashboard, out: &mut impl Write) -> io::Result<()> {
    render_stats(&dashboard.counts, out)?;

    let tabs: Vec<String> = TaskFilter::ALL
        .iter()
        .map(|&filter| {
            let tab = format!("{} ({})", filter.label(), dashboard.counts.get(filter));
            if filter == dashboard.filter {
                format!("[{tab}]")
            } else {
                tab
            }
        })
        .collect();
    writeln!(out, "{}", tabs.join("  "))?;
    writeln!(out)?;

    if let Some(message) = dashboard.empty_message() {
        return writeln!(out, "{message}");
    }
    for row in &dashboard.rows {
        render_row(row, out)?;
    }
    Ok(())
}

fn render_row(row: &DashboardRow, out: &mut impl Write) -> io::Result<()> {
    let check = if row.task.completed { "[x]" } else { "[ ]" };
    let badge = row.status.badge();
    let badge = if badge.is_empty() {
        String::new()
    } else {
        format!("  ({badge})")
    };
    writeln!(
        out,
        "{check} {}  {}  due {}{badge}",
        row.task.id, row.task.title, row.due_label
    )?;
    if !row.task.description.is_empty() {
        writeln!(out, "      {}", row.task.description)?;
    }
    Ok(())
}

pub fn dashboard_json(dashboard: &Dashboard) -> Value {
    let tasks: Vec<Value> = dashboard
        .rows
        .iter()
        .map(|row| {
            json!({
                "task": row.task,
                "dueLabel": row.due_label.to_string(),
                "overdue": row.is_overdue(),
            })
        })
        .collect();
    json!({
        "filter": dashboard.filter,
        "counts": dashboard.counts,
        "completionPercent": dashboard.completion_percent(),
        "tasks": tasks,
    })
}
