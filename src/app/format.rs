use std::collections::BTreeSet;

use chrono::{DateTime, Local, Utc};

/// Chapter row, one cell per chapter: `✓` when read, its 1-based number otherwise.
pub(crate) fn format_chapter_dots(completed: &BTreeSet<u32>, total_chapters: u32) -> String {
    (0..total_chapters)
        .map(|index| {
            if completed.contains(&index) {
                "[✓]".to_string()
            } else {
                format!("[{}]", index + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 1-based chapter numbers, e.g. `1, 3, 4`.
pub(crate) fn format_chapter_list(completed: &BTreeSet<u32>) -> String {
    if completed.is_empty() {
        return "-".to_string();
    }
    completed
        .iter()
        .map(|index| (u64::from(*index) + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn format_read_summary(completed: usize, total_chapters: u32) -> String {
    format!("{completed} of {total_chapters} chapters read")
}

pub(crate) fn build_progress_gauge(completed: usize, total_chapters: u32) -> Option<(f64, String)> {
    if total_chapters == 0 {
        return None;
    }
    let ratio = (completed as f64 / f64::from(total_chapters)).clamp(0.0, 1.0);
    Some((ratio, format!("{completed}/{total_chapters}")))
}

pub(crate) fn format_last_read_display(last_read: &DateTime<Utc>) -> String {
    last_read
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M %:z")
        .to_string()
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
