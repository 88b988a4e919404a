//! Pretty output formatting.

use todosync_core::task::{Photo, SyncReport, Task};

/// Format a task for display.
pub fn format_task(task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let origin = if task.is_local_only {
        "local"
    } else if task.is_modified {
        "synced, edited"
    } else {
        "synced"
    };
    let mut output = format!("[{}] {} ({})\n  ID: {}", check, task.title, origin, task.id);
    if let Some(url) = &task.image_url {
        output.push_str(&format!("\n  Image: {}", url));
    }
    output
}

/// Format tasks for display.
pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let done = tasks.iter().filter(|t| t.completed).count();
    let mut output = format!("TASKS ({}, {} done)\n", tasks.len(), done);
    output.push_str(&"-".repeat(40));
    for task in tasks {
        output.push_str(&format!("\n{}", format_task(task)));
        output.push('\n');
    }
    output
}

/// Format photos for display, numbered for `pick --index`.
pub fn format_photos(photos: &[Photo]) -> String {
    if photos.is_empty() {
        return "No photos found.".to_string();
    }
    let mut output = format!("PHOTOS ({})\n", photos.len());
    output.push_str(&"-".repeat(40));
    for (index, photo) in photos.iter().enumerate() {
        output.push_str(&format!(
            "\n{:>3}. {}\n     Small: {}\n     Regular: {}",
            index, photo.id, photo.small_url, photo.regular_url
        ));
    }
    output
}

pub fn format_sync_report(report: &SyncReport) -> String {
    let mut output = format!(
        "Synced {} tasks with {} photos.",
        report.synced, report.photos
    );
    if report.preserved > 0 {
        output.push_str(&format!(
            " Kept {} locally edited tasks.",
            report.preserved
        ));
    }
    output
}
