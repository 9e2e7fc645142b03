//! Human-readable time formatting.
//!
//! Pure functions used by the dashboard and the event timeline. All
//! relative formatting takes `now` explicitly so callers decide the
//! reference point and tests stay deterministic.

use chrono::{DateTime, Local, Utc};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Generates a relative time string such as "2 hours ago".
///
/// Differences under 500ms render as "now". The first matching unit wins:
/// three days or more renders as days, an hour or more as hours, a minute
/// or more as minutes, everything else as seconds.
pub fn format_time_ago(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    let difference_ms = now.signed_duration_since(timestamp).num_milliseconds();
    if difference_ms < 500 {
        return "now".to_string();
    }
    if difference_ms >= 3 * MS_PER_DAY {
        return pluralize(round_unit(difference_ms, MS_PER_DAY), "day");
    }
    if difference_ms >= MS_PER_HOUR {
        return pluralize(round_unit(difference_ms, MS_PER_HOUR), "hour");
    }
    if difference_ms >= MS_PER_MINUTE {
        return pluralize(round_unit(difference_ms, MS_PER_MINUTE), "minute");
    }
    pluralize(round_unit(difference_ms, MS_PER_SECOND), "second")
}

/// Divide a millisecond difference by a unit size, rounding half away
/// from zero.
fn round_unit(difference_ms: i64, unit_ms: i64) -> i64 {
    (difference_ms as f64 / unit_ms as f64).round() as i64
}

/// "{n} {unit}(s) ago", with the plural suffix omitted only when the
/// count renders as exactly "1".
fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:mm:ss` in local time.
pub fn prettify_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Generates a compound duration string between two timestamps, such as
/// "1 hour 5 minutes" or "45 seconds".
///
/// Hours are shown with remaining minutes, minutes with remaining
/// seconds; sub-minute gaps render as seconds only.
pub fn pretty_time_difference(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let total_seconds = start.signed_duration_since(end).num_seconds().abs();
    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;

    if hours > 0 {
        let remaining_minutes = total_minutes % 60;
        let mut text = component(hours, "hour");
        if remaining_minutes > 0 {
            text.push(' ');
            text.push_str(&component(remaining_minutes, "minute"));
        }
        text
    } else if total_minutes > 0 {
        let remaining_seconds = total_seconds % 60;
        let mut text = component(total_minutes, "minute");
        if remaining_seconds > 0 {
            text.push(' ');
            text.push_str(&component(remaining_seconds, "second"));
        }
        text
    } else {
        component(total_seconds, "second")
    }
}

fn component(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_time_ago_now_boundary() {
        assert_eq!(format_time_ago(at(499), at(0)), "now");
        assert_eq!(format_time_ago(at(500), at(0)), "1 second ago");
    }

    #[test]
    fn test_time_ago_seconds() {
        assert_eq!(format_time_ago(at(2_000), at(0)), "2 seconds ago");
        // 45.5s rounds away from zero
        assert_eq!(format_time_ago(at(45_500), at(0)), "46 seconds ago");
    }

    #[test]
    fn test_time_ago_minutes() {
        assert_eq!(format_time_ago(at(60_000), at(0)), "1 minute ago");
        assert_eq!(format_time_ago(at(150_000), at(0)), "3 minutes ago");
    }

    #[test]
    fn test_time_ago_hour_boundary() {
        assert_eq!(format_time_ago(at(3_600_000), at(0)), "1 hour ago");
        assert_eq!(format_time_ago(at(7_200_000), at(0)), "2 hours ago");
    }

    #[test]
    fn test_time_ago_day_boundary() {
        assert_eq!(format_time_ago(at(259_200_000), at(0)), "3 days ago");
        // Just under three days stays in hours
        assert_eq!(format_time_ago(at(259_199_999), at(0)), "72 hours ago");
    }

    #[test]
    fn test_pretty_time_difference_seconds_only() {
        assert_eq!(pretty_time_difference(at(45_000), at(0)), "45 seconds");
        assert_eq!(pretty_time_difference(at(1_000), at(0)), "1 second");
        assert_eq!(pretty_time_difference(at(0), at(0)), "0 seconds");
    }

    #[test]
    fn test_pretty_time_difference_minutes() {
        assert_eq!(pretty_time_difference(at(300_000), at(0)), "5 minutes");
        assert_eq!(
            pretty_time_difference(at(90_000), at(0)),
            "1 minute 30 seconds"
        );
    }

    #[test]
    fn test_pretty_time_difference_hours() {
        assert_eq!(pretty_time_difference(at(3_600_000), at(0)), "1 hour");
        assert_eq!(
            pretty_time_difference(at(3_660_000), at(0)),
            "1 hour 1 minute"
        );
        assert_eq!(
            pretty_time_difference(at(7_500_000), at(0)),
            "2 hours 5 minutes"
        );
        // Leftover seconds are dropped once hours are shown
        assert_eq!(
            pretty_time_difference(at(3_659_000), at(0)),
            "1 hour"
        );
    }

    #[test]
    fn test_pretty_time_difference_order_independent() {
        assert_eq!(pretty_time_difference(at(0), at(300_000)), "5 minutes");
    }

    #[test]
    fn test_prettify_timestamp_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 4, 5, 6).unwrap();
        let text = prettify_timestamp(ts);
        // Local offset shifts the values, but the shape is fixed
        assert_eq!(text.len(), 19);
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[7..8], "-");
        assert_eq!(&text[10..11], " ");
        assert_eq!(&text[13..14], ":");
        assert_eq!(&text[16..17], ":");
    }
}
