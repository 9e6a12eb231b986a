//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::config::{Config, get_config_path};
use crate::events::SessionSignal;
use crate::print_cmd_warn;
use std::error::Error;
use tokio::sync::broadcast::error::RecvError;

/// Runs the dashboard in headless mode
///
/// This function handles:
/// 1. Console event logging
/// 2. Session invalidation and Ctrl+C shutdown handling
/// 3. Event loop management
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    // Print session start message
    print_session_starting("headless", &session.user.name);

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut invalidated = false;

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            signal = session.session_signals.recv() => {
                match signal {
                    Ok(SessionSignal::Invalidated) => {
                        invalidated = true;
                        let _ = session.shutdown_sender.send(());
                    }
                    Ok(SessionSignal::AccessDenied) => {
                        print_cmd_warn!(
                            "Access denied",
                            "This account is not allowed to use the buddy dashboard."
                        );
                    }
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    // Wait for the refresh worker to finish
    print_session_shutdown();
    let _ = session.worker_handle.await;

    if invalidated {
        Config::clear(&get_config_path()?)?;
        print_cmd_warn!(
            "Session expired",
            "Please sign in again with `buddy-dash login`."
        );
    }
    print_session_exit_success();

    Ok(())
}
