//! Human-readable renderings of timestamps and byte sizes.

use chrono::{DateTime, TimeZone, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Render `then` relative to `now`, e.g. "3 hours ago" or "a minute from now".
#[must_use]
pub fn naturaltime<Tz: TimeZone>(then: &DateTime<Tz>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then.with_timezone(&Utc)).num_seconds();
    if delta == 0 {
        return "now".to_string();
    }

    let suffix = if delta > 0 { "ago" } else { "from now" };
    let secs = delta.abs();

    let phrase = match secs {
        1 => "a second".to_string(),
        s if s < MINUTE => format!("{s} seconds"),
        s if s < 2 * MINUTE => "a minute".to_string(),
        s if s < HOUR => format!("{} minutes", s / MINUTE),
        s if s < 2 * HOUR => "an hour".to_string(),
        s if s < DAY => format!("{} hours", s / HOUR),
        s if s < WEEK => plural(s / DAY, "day"),
        s if s < MONTH => plural(s / WEEK, "week"),
        s if s < YEAR => plural(s / MONTH, "month"),
        s => plural(s / YEAR, "year"),
    };

    format!("{phrase} {suffix}")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Render a byte count with IEC units and one decimal, e.g. "2.0 MiB".
#[must_use]
pub fn naturalsize(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes == 1 {
        return "1 Byte".to_string();
    }
    if bytes < 1024 {
        return format!("{bytes} Bytes");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }

    format!("{value:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(seconds: i64) -> String {
        let now = Utc::now();
        naturaltime(&(now - Duration::seconds(seconds)), now)
    }

    #[test]
    fn test_naturaltime_short_spans() {
        assert_eq!(ago(0), "now");
        assert_eq!(ago(1), "a second ago");
        assert_eq!(ago(42), "42 seconds ago");
        assert_eq!(ago(61), "a minute ago");
        assert_eq!(ago(5 * MINUTE), "5 minutes ago");
        assert_eq!(ago(HOUR + 5), "an hour ago");
        assert_eq!(ago(3 * HOUR), "3 hours ago");
    }

    #[test]
    fn test_naturaltime_long_spans() {
        assert_eq!(ago(DAY), "1 day ago");
        assert_eq!(ago(3 * DAY), "3 days ago");
        assert_eq!(ago(2 * WEEK), "2 weeks ago");
        assert_eq!(ago(2 * MONTH), "2 months ago");
        assert_eq!(ago(3 * YEAR), "3 years ago");
    }

    #[test]
    fn test_naturaltime_future() {
        assert_eq!(ago(-3 * HOUR), "3 hours from now");
    }

    #[test]
    fn test_naturaltime_with_offset() {
        let now = Utc::now();
        let then = (now - Duration::minutes(10)).fixed_offset();
        assert_eq!(naturaltime(&then, now), "10 minutes ago");
    }

    #[test]
    fn test_naturalsize() {
        assert_eq!(naturalsize(1), "1 Byte");
        assert_eq!(naturalsize(300), "300 Bytes");
        assert_eq!(naturalsize(1536), "1.5 KiB");
        assert_eq!(naturalsize(2 * 1024 * 1024), "2.0 MiB");
        assert_eq!(naturalsize(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }
}
