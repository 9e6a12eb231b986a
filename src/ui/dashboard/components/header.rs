//! Dashboard header component
//!
//! Renders the title line and the session status line

use crate::dashboard::format::format_relative_time;
use crate::dashboard::state::DashboardState;
use crate::ui::app::App;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render the header with title and refresh status.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, view: &DashboardState, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!(
        "BUDDY DASHBOARD v{} - {}",
        version, app.environment
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(title, header_chunks[0]);

    let availability = match view.snapshot.profile.as_ref() {
        Some(profile) if profile.is_available => {
            Span::styled("AVAILABLE", Style::default().fg(Color::Green))
        }
        Some(_) => Span::styled("AWAY", Style::default().fg(Color::DarkGray)),
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    };

    let refreshed = if view.is_refreshing {
        Span::styled("Refreshing...", Style::default().fg(Color::LightBlue))
    } else {
        match view.last_refreshed_at {
            Some(at) => {
                let age = format_relative_time(&at.to_rfc3339());
                Span::styled(
                    format!("Updated {}", if age.is_empty() { "-".to_string() } else { age }),
                    Style::default().fg(Color::DarkGray),
                )
            }
            None => Span::styled("Loading...", Style::default().fg(Color::LightBlue)),
        }
    };

    let mut status_spans = vec![
        Span::styled(app.user.name.clone(), Style::default().fg(Color::White)),
        Span::raw("  |  "),
        availability,
        Span::raw("  |  "),
        refreshed,
    ];
    if let Some(profile) = view.snapshot.profile.as_ref() {
        status_spans.push(Span::raw("  |  "));
        status_spans.push(Span::styled(
            format!("{:.1} ({} reviews)", profile.rating, profile.review_count),
            Style::default().fg(Color::Yellow),
        ));
        if let Some(location) = &profile.location {
            status_spans.push(Span::raw("  |  "));
            status_spans.push(Span::styled(
                location.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    if app.access_denied {
        status_spans.push(Span::raw("  |  "));
        status_spans.push(Span::styled(
            "ACCESS DENIED",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let status = Paragraph::new(Line::from(status_spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(status, header_chunks[1]);
}
