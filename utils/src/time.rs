//! Time formatting helpers.

use govdash_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Describe `at` relative to `now`: "in 2h 5m", "3d 1h ago" or "now".
pub fn format_relative(at: Timestamp, now: Timestamp) -> String {
    if at > now {
        format!("in {}", format_duration(at.remaining_from(now)))
    } else if at < now {
        format!("{} ago", format_duration(at.elapsed_since(now)))
    } else {
        "now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(7_500), "2h 5m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn relative_times() {
        let now = Timestamp::new(10_000);
        assert_eq!(format_relative(Timestamp::new(10_060), now), "in 1m 0s");
        assert_eq!(format_relative(Timestamp::new(9_970), now), "30s ago");
        assert_eq!(format_relative(now, now), "now");
    }
}
