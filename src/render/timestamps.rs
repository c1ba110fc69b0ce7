use chrono::{DateTime, Datelike, Utc};

/// Display format for full timestamps in detail views
pub const DETAIL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Short label for list views:
/// - Relative for <7 days: "2h ago", "3d ago"
/// - Absolute for ≥7 days: "Jan 15", "Dec 3, 2024"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

pub(crate) fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);

    // Clock skew between the index and this machine
    if elapsed.num_seconds() < 0 {
        return format_absolute(timestamp, now);
    }

    if elapsed.num_days() < 7 {
        format_relative(elapsed.num_seconds())
    } else {
        format_absolute(timestamp, now)
    }
}

/// Detail view rendering of a raw vCon timestamp; unparseable values are shown verbatim
pub fn format_detail(raw: Option<&str>, parsed: Option<DateTime<Utc>>) -> String {
    match (parsed, raw) {
        (Some(ts), _) => ts.format(DETAIL_FORMAT).to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

fn format_absolute(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    if timestamp.year() == now.year() {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}
