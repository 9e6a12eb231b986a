//! Runtime wiring for the dashboard refresh worker

use crate::api::BuddyApi;
use crate::consts::cli_consts;
use crate::dashboard::orchestrator::{DashboardHandle, RefreshOrchestrator};
use crate::dashboard::state::DashboardState;
use crate::events::{Event, EventSender, SessionSignal};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Start the refresh worker that owns the dashboard state.
///
/// Returns the read side of the state, the command handle for the
/// rendering layer, the worker event stream, and the session-signal
/// receiver.
pub fn start_dashboard_worker(
    api: Arc<dyn BuddyApi>,
    refresh_interval: Duration,
    foreground: Arc<AtomicBool>,
    shutdown: broadcast::Receiver<()>,
) -> (
    watch::Receiver<DashboardState>,
    DashboardHandle,
    mpsc::Receiver<Event>,
    broadcast::Receiver<SessionSignal>,
    JoinHandle<()>,
) {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(cli_consts::EVENT_QUEUE_SIZE);
    let (command_sender, command_receiver) = mpsc::channel(cli_consts::COMMAND_QUEUE_SIZE);
    let (session_sender, session_receiver) = broadcast::channel::<SessionSignal>(4);

    let (orchestrator, snapshot_receiver) = RefreshOrchestrator::new(
        api,
        EventSender::new(event_sender),
        session_sender,
        foreground,
    );

    let worker_handle =
        tokio::spawn(orchestrator.run(command_receiver, shutdown, refresh_interval));

    (
        snapshot_receiver,
        DashboardHandle::new(command_sender),
        event_receiver,
        session_receiver,
        worker_handle,
    )
}
