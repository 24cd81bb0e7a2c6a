use std::time::Duration;

/// `mm:ss`, or `hh:mm:ss` past the hour. Unknown or zero renders `00:00`.
pub fn format_clock(d: Option<Duration>) -> String {
    let secs = match d {
        Some(d) if !d.is_zero() => d.as_secs(),
        _ => return "00:00".to_string(),
    };
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
