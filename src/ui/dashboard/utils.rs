//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use crate::model::BookingStatus;
use ratatui::prelude::Color;

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Section(_) => Color::Cyan,
        Source::Cycle => Color::Yellow,
        Source::Availability => Color::Green,
    }
}

/// Get a ratatui color for a booking status tag
pub fn get_status_color(status: BookingStatus) -> Color {
    match status {
        BookingStatus::Confirmed => Color::Green,
        BookingStatus::Pending => Color::Yellow,
        BookingStatus::Completed => Color::Blue,
        BookingStatus::Cancelled => Color::Red,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some(date_part) = timestamp.split(' ').next() {
        if let Some(time_part) = timestamp.split(' ').nth(1) {
            // Extract MM-DD from date and HH:MM from time
            if let Some(month_day) = date_part.get(5..10) {
                if let Some(hour_min) = time_part.get(0..5) {
                    return format!("{} {}", month_day, hour_min);
                }
            }
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_timestamp_strips_year_and_seconds() {
        assert_eq!(
            format_compact_timestamp("2025-03-15 11:30:42"),
            "03-15 11:30"
        );
    }

    #[test]
    fn compact_timestamp_falls_back_on_unexpected_input() {
        assert_eq!(format_compact_timestamp("11:30"), "11:30");
    }
}
