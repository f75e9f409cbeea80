use chrono::NaiveDate;

use crate::date::DateKey;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date key for display, e.g. `Thu, May 30 2024`
pub fn format_date_key(key: &DateKey) -> String {
    match NaiveDate::parse_from_str(key.as_str(), "%Y-%m-%d") {
        Ok(date) => date.format("%a, %b %-d %Y").to_string(),
        Err(_) => key.to_string(),
    }
}
