//! Upcoming bookings panel component

use super::super::utils::get_status_color;
use crate::dashboard::format::format_clock_or_relative_date;
use crate::dashboard::section::Section;
use crate::dashboard::state::DashboardState;

use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Render the upcoming bookings panel with inline error and retry hint.
pub fn render_bookings_panel(f: &mut Frame, area: ratatui::layout::Rect, view: &DashboardState) {
    let section = view.section(Section::Bookings);
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = &section.error {
        lines.push(Line::from(Span::styled(
            format!(
                "! {} - press {} to retry",
                error,
                Section::Bookings.hotkey()
            ),
            Style::default().fg(Color::Red),
        )));
    }

    if view.snapshot.bookings.is_empty() {
        let placeholder = if section.loading {
            "Loading bookings..."
        } else if section.error.is_none() {
            "No upcoming bookings"
        } else {
            ""
        };
        if !placeholder.is_empty() {
            lines.push(Line::from(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    for booking in &view.snapshot.bookings {
        let status = booking.status_kind();
        let when = booking
            .date
            .as_deref()
            .map(format_clock_or_relative_date)
            .unwrap_or_default();
        let tourist = booking
            .tourist
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Unknown traveler".to_string());

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", status),
                Style::default().fg(get_status_color(status)),
            ),
            Span::styled(
                booking.tour_title.clone().unwrap_or_else(|| "Tour".to_string()),
                Style::default().fg(Color::White),
            ),
            Span::raw(" - "),
            Span::styled(tourist, Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled(when, Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("  {} guests  ${:.2}", booking.guest_count, booking.total_price),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let block = Block::default()
        .title("UPCOMING BOOKINGS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if section.error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Cyan)
        })
        .padding(Padding::uniform(1));

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}
