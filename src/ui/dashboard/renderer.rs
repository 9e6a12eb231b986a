//! Dashboard main renderer

use super::components::{bookings, footer, header, logs, messages, stats};
use crate::dashboard::state::DashboardState;
use crate::ui::app::App;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

pub fn render_dashboard(f: &mut Frame, view: &DashboardState, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Percentage(30),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], view, app);
    stats::render_stats_section(f, main_chunks[1], view);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[2]);

    bookings::render_bookings_panel(f, content_chunks[0], view);
    messages::render_messages_panel(f, content_chunks[1], view, app);

    logs::render_logs_panel(f, main_chunks[3], app);
    footer::render_footer(f, main_chunks[4]);
}
