use crate::title::FALLBACK_TITLE;

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Sanitize a video title for use as a file name stem.
///
/// Runs of invalid filename characters and control characters (CR, LF, TAB,
/// ...) become a single `_`. The result is trimmed. [`FALLBACK_TITLE`] is
/// returned when the title has no visible character of its own left.
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len());
    let mut last_was_replaced = false;
    let mut kept_visible = false;

    for c in title.chars() {
        if INVALID_CHARS.contains(&c) || c.is_control() {
            if !last_was_replaced {
                sanitized.push('_');
                last_was_replaced = true;
            }
        } else {
            sanitized.push(c);
            kept_visible |= !c.is_whitespace();
            last_was_replaced = false;
        }
    }

    let trimmed = sanitized.trim();
    if trimmed.is_empty() || !kept_visible {
        return FALLBACK_TITLE.to_string();
    }

    trimmed.to_string()
}

/// Download file name for a PDF of the given title.
pub fn pdf_filename(title: &str) -> String {
    format!("{}.pdf", sanitize_title(title))
}

/// Format file size in human-readable format
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f = bytes as f64;
    let unit_index = (bytes_f.log10() / THRESHOLD.log10()).floor() as usize;
    let unit_index = unit_index.min(UNITS.len() - 1);

    let size = bytes_f / THRESHOLD.powi(unit_index as i32);

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format a caption offset as `HH:MM:SS`
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}
