/// Format a post's creation timestamp for display.
/// Day without leading zero, full month name, four-digit year: "5 March 2024".
pub fn format_post_date(timestamp: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(timestamp) {
        dt.format("%-d %B %Y").to_string()
    } else if timestamp.len() >= 10 {
        // Fall back to the date portion of the raw string
        timestamp.chars().take(10).collect()
    } else {
        timestamp.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_post_date() {
        assert_eq!(format_post_date("2024-03-05T00:00:00Z"), "5 March 2024");
        assert_eq!(format_post_date("2023-12-25T18:30:00+02:00"), "25 December 2023");
        // Unparseable but date-shaped input falls back to the first 10 chars
        assert_eq!(format_post_date("2024-03-05 10:00:00"), "2024-03-05");
        assert_eq!(format_post_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }
}
