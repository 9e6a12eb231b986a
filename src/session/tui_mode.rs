//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::config::{Config, get_config_path};
use crate::print_cmd_warn;
use crate::ui::{self, ExitReason};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the dashboard in TUI mode
///
/// This function handles:
/// 1. Terminal setup and cleanup
/// 2. UI application initialization and execution
/// 3. Session-invalidation handling after the UI exits
pub async fn run_tui_mode(session: SessionData) -> Result<(), Box<dyn Error>> {
    // Print session start message
    print_session_starting("TUI", &session.user.name);

    // Terminal setup. Focus change events feed the foreground flag that
    // gates the periodic refresh.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    // Initialize the terminal with Crossterm backend
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let shutdown_sender = session.shutdown_sender.clone();
    let worker_handle = session.worker_handle;

    // Create the application and run it
    let app = ui::App::new(
        session.snapshot_receiver,
        session.handle,
        session.event_receiver,
        session.session_signals,
        session.shutdown_sender,
        session.foreground,
        session.user,
        session.environment,
    );
    let result = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    let exit_reason = result?;

    // Make sure the worker stops even if the UI exited on its own
    let _ = shutdown_sender.send(());
    print_session_shutdown();
    let _ = worker_handle.await;

    if exit_reason == ExitReason::SessionInvalidated {
        Config::clear(&get_config_path()?)?;
        print_cmd_warn!(
            "Session expired",
            "Please sign in again with `buddy-dash login`."
        );
    }
    print_session_exit_success();

    Ok(())
}
