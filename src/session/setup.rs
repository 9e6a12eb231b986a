//! Session setup and initialization

use crate::api::{BuddyApi, BuddyApiClient};
use crate::config::Config;
use crate::dashboard::orchestrator::DashboardHandle;
use crate::dashboard::state::DashboardState;
use crate::environment::Environment;
use crate::events::{Event, SessionSignal};
use crate::model::SessionUser;
use crate::runtime::start_dashboard_worker;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Read side of the dashboard state
    pub snapshot_receiver: watch::Receiver<DashboardState>,
    /// Command handle for refreshes and the availability toggle
    pub handle: DashboardHandle,
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Session control signals (invalidation, access denial)
    pub session_signals: broadcast::Receiver<SessionSignal>,
    /// Shutdown sender to stop the refresh worker
    pub shutdown_sender: broadcast::Sender<()>,
    /// Join handle for the refresh worker task
    pub worker_handle: JoinHandle<()>,
    /// Foreground flag gating the periodic refresh
    pub foreground: Arc<AtomicBool>,
    /// The signed-in buddy
    pub user: SessionUser,
    /// Environment the session talks to
    pub environment: Environment,
}

/// Sets up a dashboard session against the marketplace API
///
/// This function handles the common setup required for both TUI and
/// headless modes:
/// 1. Builds the authenticated API client from the stored session
/// 2. Sets up the shutdown channel
/// 3. Starts the refresh worker
/// 4. Queues the initial full refresh
pub async fn setup_session(
    config: Config,
    env: Environment,
    refresh_interval: Duration,
) -> Result<SessionData, Box<dyn Error>> {
    let user = config.user.clone();
    let api: Arc<dyn BuddyApi> = Arc::new(BuddyApiClient::new(env, Some(config.access_token)));
    let environment = *api.environment();

    let foreground = Arc::new(AtomicBool::new(true));

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let (snapshot_receiver, handle, event_receiver, session_signals, worker_handle) =
        start_dashboard_worker(
            api,
            refresh_interval,
            foreground.clone(),
            shutdown_sender.subscribe(),
        );

    // The initial load goes through the same queue as every other trigger.
    handle.refresh_all(false).await;

    Ok(SessionData {
        snapshot_receiver,
        handle,
        event_receiver,
        session_signals,
        shutdown_sender,
        worker_handle,
        foreground,
        user,
        environment,
    })
}
