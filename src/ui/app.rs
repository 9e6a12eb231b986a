//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::dashboard::orchestrator::DashboardHandle;
use crate::dashboard::section::Section;
use crate::dashboard::state::DashboardState;
use crate::environment::Environment;
use crate::events::{Event as WorkerEvent, SessionSignal};
use crate::model::SessionUser;
use crate::ui::dashboard::render_dashboard;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// Why the UI loop ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The user quit.
    Quit,
    /// The backend rejected the stored credentials; the session layer
    /// clears them and returns to the login boundary.
    SessionInvalidated,
}

/// Application state
pub struct App {
    /// Read side of the dashboard state owned by the refresh worker.
    snapshot_receiver: watch::Receiver<DashboardState>,

    /// Command handle into the refresh worker.
    handle: DashboardHandle,

    /// Receives events from the refresh worker.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Receives session control signals.
    session_signals: broadcast::Receiver<SessionSignal>,

    /// Broadcasts shutdown signal to the refresh worker.
    shutdown_sender: broadcast::Sender<()>,

    /// Foreground flag gating periodic refresh; driven by terminal focus.
    foreground: Arc<AtomicBool>,

    /// The signed-in buddy.
    pub(crate) user: SessionUser,

    /// The environment in which the application is running.
    pub(crate) environment: Environment,

    /// Activity logs for display.
    pub(crate) activity_logs: VecDeque<WorkerEvent>,

    /// Set when the backend reported the account may not use the dashboard.
    pub(crate) access_denied: bool,
}

impl App {
    /// Creates a new instance of the application.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        snapshot_receiver: watch::Receiver<DashboardState>,
        handle: DashboardHandle,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        session_signals: broadcast::Receiver<SessionSignal>,
        shutdown_sender: broadcast::Sender<()>,
        foreground: Arc<AtomicBool>,
        user: SessionUser,
        environment: Environment,
    ) -> Self {
        Self {
            snapshot_receiver,
            handle,
            event_receiver,
            session_signals,
            shutdown_sender,
            foreground,
            user,
            environment,
            activity_logs: VecDeque::new(),
            access_denied: false,
        }
    }

    /// Add an event to activity logs with size limit
    fn add_to_activity_log(&mut self, event: WorkerEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }
}

/// Runs the application UI in a loop, handling events and rendering the dashboard.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> std::io::Result<ExitReason> {
    loop {
        // Queue all incoming worker events for the activity log
        while let Ok(event) = app.event_receiver.try_recv() {
            app.add_to_activity_log(event);
        }

        // React to session signals before drawing
        if let Ok(signal) = app.session_signals.try_recv() {
            match signal {
                SessionSignal::Invalidated => {
                    let _ = app.shutdown_sender.send(());
                    return Ok(ExitReason::SessionInvalidated);
                }
                SessionSignal::AccessDenied => {
                    app.access_denied = true;
                }
            }
        }

        let view = app.snapshot_receiver.borrow().clone();
        terminal.draw(|f| render_dashboard(f, &view, &app))?;

        // Poll for terminal events
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Skip events that are not KeyEventKind::Press
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }

                    match key.code {
                        // Handle exit events
                        KeyCode::Esc | KeyCode::Char('q') => {
                            let _ = app.shutdown_sender.send(());
                            return Ok(ExitReason::Quit);
                        }
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            let _ = app.shutdown_sender.send(());
                            return Ok(ExitReason::Quit);
                        }
                        // Manual full refresh notifies on completion
                        KeyCode::Char('r') => app.handle.refresh_all(true).await,
                        KeyCode::Char('a') => app.handle.toggle_availability().await,
                        // Per-section retry
                        KeyCode::Char(c @ '1'..='4') => {
                            if let Some(section) =
                                Section::ALL.into_iter().find(|s| s.hotkey() == c)
                            {
                                app.handle.refresh_section(section).await;
                            }
                        }
                        _ => {}
                    }
                }
                // Terminal focus gates the periodic refresh; a tick that
                // fires while unfocused is dropped by the worker.
                Event::FocusGained => app.foreground.store(true, Ordering::Relaxed),
                Event::FocusLost => app.foreground.store(false, Ordering::Relaxed),
                _ => {}
            }
        }
    }
}
