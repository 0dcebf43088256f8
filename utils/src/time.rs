//! Time formatting helpers.

use votedao_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// How long before `now` something happened at `then` (`"4m 2s ago"`).
pub fn format_age(then: Timestamp, now: Timestamp) -> String {
    match then.elapsed_since(now) {
        0 => "just now".to_string(),
        secs => format!("{} ago", format_duration(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(242), "4m 2s");
        assert_eq!(format_duration(7_380), "2h 3m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn ages() {
        let then = Timestamp::new(1_000);
        assert_eq!(format_age(then, Timestamp::new(1_000)), "just now");
        assert_eq!(format_age(then, Timestamp::new(1_065)), "1m 5s ago");
        // clock skew never goes negative
        assert_eq!(format_age(then, Timestamp::new(900)), "just now");
    }
}
