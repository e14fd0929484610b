/// Format a duration in seconds as a human-readable "XhYm" string.
///
/// Zero, negative, and non-finite input all collapse to "0h 0m".
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0h 0m".to_string();
    }
    let total_minutes = (seconds / 60.0) as u64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}
