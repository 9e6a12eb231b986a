//! Recent messages panel component

use crate::dashboard::format::format_relative_time;
use crate::dashboard::section::Section;
use crate::dashboard::state::DashboardState;
use crate::ui::app::App;

use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Render the recent conversations panel with unread badges.
pub fn render_messages_panel(
    f: &mut Frame,
    area: ratatui::layout::Rect,
    view: &DashboardState,
    app: &App,
) {
    let section = view.section(Section::Messages);
    let user_id = app.user.id.to_string();
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = &section.error {
        lines.push(Line::from(Span::styled(
            format!(
                "! {} - press {} to retry",
                error,
                Section::Messages.hotkey()
            ),
            Style::default().fg(Color::Red),
        )));
    }

    if view.snapshot.conversations.is_empty() {
        let placeholder = if section.loading {
            "Loading messages..."
        } else if section.error.is_none() {
            "No conversations yet"
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

    for conversation in &view.snapshot.conversations {
        let unread = conversation.unread_count_for(&user_id);
        let name = conversation
            .participant
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Traveler".to_string());
        let age = conversation
            .updated_at
            .as_deref()
            .map(format_relative_time)
            .unwrap_or_default();

        let mut row = vec![Span::styled(
            name,
            if unread > 0 {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            },
        )];
        if unread > 0 {
            row.push(Span::styled(
                format!(" ({})", unread),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        row.push(Span::raw("  "));
        row.push(Span::styled(age, Style::default().fg(Color::DarkGray)));
        lines.push(Line::from(row));

        if let Some(last) = &conversation.last_message {
            let own_message = last
                .sender_id
                .as_ref()
                .is_some_and(|sender| sender.matches(&user_id));
            let prefix = if own_message { "You: " } else { "" };
            lines.push(Line::from(Span::styled(
                format!("      {}{}", prefix, last.content),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .title("RECENT MESSAGES")
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
