//! Dashboard stat cards component

use crate::dashboard::section::Section;
use crate::dashboard::state::DashboardState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render the four stat cards for the stats section.
pub fn render_stats_section(f: &mut Frame, area: ratatui::layout::Rect, view: &DashboardState) {
    let section = view.section(Section::Stats);
    let stats = view.snapshot.stats.as_ref();

    let placeholder = if section.loading { "..." } else { "-" };
    let value = |text: Option<String>| text.unwrap_or_else(|| placeholder.to_string());

    let cards = [
        (
            "TOTAL BOOKINGS",
            value(stats.map(|s| s.total_bookings.to_string())),
        ),
        (
            "COMPLETED",
            value(stats.map(|s| s.completed_bookings.to_string())),
        ),
        (
            "EARNINGS",
            value(stats.map(|s| format!("${:.2}", s.total_earnings))),
        ),
        (
            "RATING",
            value(stats.map(|s| format!("{:.1}", s.average_rating))),
        ),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    // Stale numbers stay on screen under an inline error.
    let border_style = if section.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Cyan)
    };

    for (chunk, (label, text)) in chunks.iter().zip(cards) {
        let title = if section.error.is_some() {
            format!("{} [press {}]", label, Section::Stats.hotkey())
        } else {
            label.to_string()
        };
        let card = Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border_style),
            );
        f.render_widget(card, *chunk);
    }
}
