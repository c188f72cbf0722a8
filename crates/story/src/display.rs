use crate::Timestamp;

const SECOND_MS: i64 = 1_000;

/// Relative label for `elapsed_ms`, floored at each unit: `45s ago`, `12m ago`,
/// `3h ago`, `9d ago`. Negative spans (clock skew) read as `0s ago`.
pub fn time_ago(elapsed_ms: i64) -> String {
    let seconds = elapsed_ms.max(0) / SECOND_MS;
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

pub fn time_ago_since(then: Timestamp, now: Timestamp) -> String {
    time_ago(now.saturating_sub(then))
}
