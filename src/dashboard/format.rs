//! View derivation helpers
//!
//! Pure input → output formatting for the rendering layer. None of these
//! touch state or panic on bad input: unparseable timestamps yield the
//! empty string, and values that already look derived pass through.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Formats a timestamp as a coarse relative age: "Just now", "{m}m ago",
/// "{h}h ago", or "{d}d ago".
///
/// Inputs that already contain "ago" are returned unchanged, so feeding a
/// derived value back in is harmless.
pub fn format_relative_time(value: &str) -> String {
    relative_time_at(value, Utc::now())
}

/// Formats a timestamp as a clock time for the current day, "Yesterday",
/// a short weekday inside the week, or a short month+day beyond that.
pub fn format_clock_or_relative_date(value: &str) -> String {
    clock_or_relative_date_at(value, Local::now())
}

fn relative_time_at(value: &str, now: DateTime<Utc>) -> String {
    if value.contains("ago") {
        return value.to_string();
    }
    let Some(then) = parse_timestamp(value) else {
        return String::new();
    };

    let elapsed = now.signed_duration_since(then);
    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

fn clock_or_relative_date_at(value: &str, now: DateTime<Local>) -> String {
    let Some(then) = parse_timestamp(value) else {
        return String::new();
    };
    let then = then.with_timezone(&Local);

    let elapsed = now.signed_duration_since(then);
    if elapsed.num_hours() < 24 {
        then.format("%H:%M").to_string()
    } else if elapsed.num_hours() < 48 {
        "Yesterday".to_string()
    } else if elapsed.num_days() < 7 {
        then.format("%a").to_string()
    } else {
        then.format("%b %-d").to_string()
    }
}

/// Accepts RFC 3339 and the backend's occasional `YYYY-MM-DD HH:MM:SS`
/// form; the latter is interpreted as local time.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Local
            .from_local_datetime(&naive)
            .single()
            .map(|parsed| parsed.with_timezone(&Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    // Already-derived values must pass through unchanged.
    fn relative_time_is_idempotent_on_derived_values() {
        assert_eq!(relative_time_at("5m ago", fixed_now()), "5m ago");
        assert_eq!(relative_time_at("2d ago", fixed_now()), "2d ago");
    }

    #[test]
    fn relative_time_buckets() {
        let now = fixed_now();
        let stamp = |offset: Duration| (now - offset).to_rfc3339();

        assert_eq!(relative_time_at(&stamp(Duration::seconds(20)), now), "Just now");
        assert_eq!(relative_time_at(&stamp(Duration::minutes(5)), now), "5m ago");
        assert_eq!(relative_time_at(&stamp(Duration::hours(3)), now), "3h ago");
        assert_eq!(relative_time_at(&stamp(Duration::days(4)), now), "4d ago");
    }

    #[test]
    fn relative_time_rejects_garbage() {
        assert_eq!(relative_time_at("not a timestamp", fixed_now()), "");
        assert_eq!(relative_time_at("", fixed_now()), "");
    }

    #[test]
    fn clock_for_timestamps_within_a_day() {
        let now = Local::now();
        let then = now - Duration::hours(2);
        assert_eq!(
            clock_or_relative_date_at(&then.to_rfc3339(), now),
            then.format("%H:%M").to_string()
        );
    }

    #[test]
    fn yesterday_between_one_and_two_days() {
        let now = Local::now();
        let then = now - Duration::hours(30);
        assert_eq!(clock_or_relative_date_at(&then.to_rfc3339(), now), "Yesterday");
    }

    #[test]
    fn weekday_inside_the_week() {
        let now = Local::now();
        let then = now - Duration::days(4);
        assert_eq!(
            clock_or_relative_date_at(&then.to_rfc3339(), now),
            then.format("%a").to_string()
        );
    }

    #[test]
    fn month_and_day_beyond_a_week() {
        let now = Local::now();
        let then = now - Duration::days(30);
        assert_eq!(
            clock_or_relative_date_at(&then.to_rfc3339(), now),
            then.format("%b %-d").to_string()
        );
    }

    #[test]
    // Invalid input yields empty output, never a panic.
    fn clock_rejects_garbage() {
        assert_eq!(clock_or_relative_date_at("yesterday-ish", Local::now()), "");
        assert_eq!(clock_or_relative_date_at("", Local::now()), "");
    }

    #[test]
    fn parses_backend_datetime_form() {
        assert!(parse_timestamp("2025-03-15 11:30:00").is_some());
        assert!(parse_timestamp("2025-03-15T11:30:00Z").is_some());
        assert!(parse_timestamp("2025-03-15T11:30:00+02:00").is_some());
    }
}
