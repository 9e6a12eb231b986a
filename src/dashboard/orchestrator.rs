//! Refresh orchestration for the dashboard sections
//!
//! A single task owns all dashboard state. Every trigger (initial load,
//! periodic timer, manual refresh, per-section retry, availability toggle)
//! goes through one command queue, so mutation happens in exactly one
//! place and commands apply in issuance order.

use crate::api::BuddyApi;
use crate::api::error::ApiError;
use crate::dashboard::section::Section;
use crate::dashboard::state::{DashboardSnapshot, DashboardState};
use crate::events::{EventSender, EventType, SessionSignal};
use crate::logging::LogLevel;
use chrono::Local;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;

/// A refresh trigger. The periodic timer and the manual paths enqueue the
/// same commands; the orchestrator is the only consumer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RefreshCommand {
    /// Refresh every section. `notify` requests cycle-level notifications
    /// once the cycle settles; the timer path never sets it.
    FullRefresh { notify: bool },
    /// Re-fetch exactly one section, leaving the others untouched.
    SectionRefresh(Section),
    /// Flip the buddy's availability flag.
    ToggleAvailability,
}

/// Cloneable handle exposing the dashboard actions to the rendering layer.
///
/// Once the orchestrator is torn down the queue is closed and sends are
/// silently discarded, so late callers cannot mutate anything.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<RefreshCommand>,
}

impl DashboardHandle {
    pub fn new(commands: mpsc::Sender<RefreshCommand>) -> Self {
        Self { commands }
    }

    pub async fn refresh_all(&self, notify: bool) {
        let _ = self
            .commands
            .send(RefreshCommand::FullRefresh { notify })
            .await;
    }

    pub async fn refresh_section(&self, section: Section) {
        let _ = self
            .commands
            .send(RefreshCommand::SectionRefresh(section))
            .await;
    }

    pub async fn toggle_availability(&self) {
        let _ = self.commands.send(RefreshCommand::ToggleAvailability).await;
    }
}

/// What a settled cycle observed, used to deduplicate session side effects:
/// however many sections report the same auth failure, the signal fires
/// once per cycle.
#[derive(Default)]
struct CycleOutcome {
    unauthorized: bool,
    forbidden: bool,
}

pub struct RefreshOrchestrator {
    api: Arc<dyn BuddyApi>,
    state: DashboardState,
    snapshot_tx: watch::Sender<DashboardState>,
    events: EventSender,
    session_tx: broadcast::Sender<SessionSignal>,
    foreground: Arc<AtomicBool>,
}

impl RefreshOrchestrator {
    pub fn new(
        api: Arc<dyn BuddyApi>,
        events: EventSender,
        session_tx: broadcast::Sender<SessionSignal>,
        foreground: Arc<AtomicBool>,
    ) -> (Self, watch::Receiver<DashboardState>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(DashboardState::default());
        (
            Self {
                api,
                state: DashboardState::default(),
                snapshot_tx,
                events,
                session_tx,
                foreground,
            },
            snapshot_rx,
        )
    }

    /// Main loop. Commands are handled one at a time; the in-flight command
    /// is raced against shutdown so teardown drops its fetches without
    /// applying their results.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<RefreshCommand>,
        mut shutdown: broadcast::Receiver<()>,
        refresh_interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // An interval's first tick fires immediately; the initial load is
        // already queued as a command, so consume it.
        ticker.tick().await;

        loop {
            let command = tokio::select! {
                _ = shutdown.recv() => break,
                command = commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
                _ = ticker.tick() => {
                    // A backgrounded tick is lost, not queued for catch-up.
                    if !self.foreground.load(Ordering::Relaxed) {
                        continue;
                    }
                    RefreshCommand::FullRefresh { notify: false }
                }
            };

            tokio::select! {
                _ = shutdown.recv() => break,
                _ = self.handle_command(command) => {}
            }
        }
    }

    async fn handle_command(&mut self, command: RefreshCommand) {
        match command {
            RefreshCommand::FullRefresh { notify } => self.run_full_refresh(notify).await,
            RefreshCommand::SectionRefresh(section) => self.run_section_refresh(section).await,
            RefreshCommand::ToggleAvailability => self.toggle_availability().await,
        }
    }

    /// Refresh all four sections concurrently and wait for every one to
    /// settle. Failures stay isolated to their section; the cycle itself
    /// always completes.
    pub async fn run_full_refresh(&mut self, notify: bool) {
        self.state.begin_cycle();
        self.publish();
        self.events
            .send_cycle_event(
                "Refreshing dashboard...".to_string(),
                EventType::Refresh,
                LogLevel::Debug,
            )
            .await;

        let (profile, stats, bookings, conversations) = tokio::join!(
            self.api.fetch_profile(),
            self.api.fetch_stats(),
            self.api.fetch_bookings(),
            self.api.fetch_conversations(),
        );

        let mut outcome = CycleOutcome::default();
        self.apply_section(Section::Profile, profile, &mut outcome, |snapshot, payload| {
            snapshot.profile = Some(payload)
        })
        .await;
        self.apply_section(Section::Stats, stats, &mut outcome, |snapshot, payload| {
            snapshot.stats = Some(payload)
        })
        .await;
        self.apply_section(Section::Bookings, bookings, &mut outcome, |snapshot, payload| {
            snapshot.bookings = payload
        })
        .await;
        self.apply_section(
            Section::Messages,
            conversations,
            &mut outcome,
            |snapshot, payload| snapshot.conversations = payload,
        )
        .await;

        self.state.finish_cycle(Local::now());
        self.settle_cycle(outcome, notify).await;
        self.publish();
    }

    /// Re-fetch one section. The other sections and the cycle flags are
    /// not touched.
    pub async fn run_section_refresh(&mut self, section: Section) {
        self.state.section_mut(section).begin();
        self.publish();

        let mut outcome = CycleOutcome::default();
        match section {
            Section::Profile => {
                let result = self.api.fetch_profile().await;
                self.apply_section(section, result, &mut outcome, |snapshot, payload| {
                    snapshot.profile = Some(payload)
                })
                .await;
            }
            Section::Stats => {
                let result = self.api.fetch_stats().await;
                self.apply_section(section, result, &mut outcome, |snapshot, payload| {
                    snapshot.stats = Some(payload)
                })
                .await;
            }
            Section::Bookings => {
                let result = self.api.fetch_bookings().await;
                self.apply_section(section, result, &mut outcome, |snapshot, payload| {
                    snapshot.bookings = payload
                })
                .await;
            }
            Section::Messages => {
                let result = self.api.fetch_conversations().await;
                self.apply_section(section, result, &mut outcome, |snapshot, payload| {
                    snapshot.conversations = payload
                })
                .await;
            }
        }

        self.settle_cycle(outcome, false).await;
        self.publish();
    }

    /// Apply one settled fetch: success replaces the payload and clears the
    /// error, failure records the error and leaves the stale payload alone.
    async fn apply_section<T>(
        &mut self,
        section: Section,
        result: Result<T, ApiError>,
        outcome: &mut CycleOutcome,
        store: fn(&mut DashboardSnapshot, T),
    ) {
        match result {
            Ok(payload) => {
                store(&mut self.state.snapshot, payload);
                self.state.section_mut(section).succeed();
            }
            Err(error) => {
                outcome.unauthorized |= matches!(error, ApiError::Unauthorized);
                outcome.forbidden |= matches!(error, ApiError::Forbidden);
                let log_level = error.log_level();
                let message = format!("Failed to load {}: {}", section, error);
                self.state.section_mut(section).fail(error.to_string());
                self.events
                    .send_section_event(section, message, EventType::Error, log_level)
                    .await;
            }
        }
    }

    async fn settle_cycle(&mut self, outcome: CycleOutcome, notify: bool) {
        if outcome.unauthorized {
            let _ = self.session_tx.send(SessionSignal::Invalidated);
            self.events
                .send_cycle_event(
                    "Session expired, signing out".to_string(),
                    EventType::Error,
                    LogLevel::Error,
                )
                .await;
        } else if outcome.forbidden {
            let _ = self.session_tx.send(SessionSignal::AccessDenied);
        }

        // Cycle-level notifications only for explicitly requested
        // refreshes; timer-driven cycles stay quiet and their failures
        // surface inline on the owning section.
        if notify {
            if self.state.has_section_errors() {
                self.events
                    .send_cycle_event(
                        "Some sections failed to refresh".to_string(),
                        EventType::Notice,
                        LogLevel::Warn,
                    )
                    .await;
            } else {
                self.events
                    .send_cycle_event(
                        "Dashboard refreshed".to_string(),
                        EventType::Success,
                        LogLevel::Info,
                    )
                    .await;
            }
        }
    }

    async fn toggle_availability(&mut self) {
        let Some(current) = self
            .state
            .snapshot
            .profile
            .as_ref()
            .map(|profile| profile.is_available)
        else {
            return;
        };
        let target = !current;

        match self.api.set_availability(target).await {
            Ok(()) => {
                if let Some(profile) = self.state.snapshot.profile.as_mut() {
                    profile.is_available = target;
                }
                let message = if target {
                    "You are now visible to travelers"
                } else {
                    "You are now shown as away"
                };
                self.events
                    .send_availability_event(message.to_string(), EventType::Success, LogLevel::Info)
                    .await;
                self.publish();
            }
            Err(error) => {
                if error == ApiError::Unauthorized {
                    let _ = self.session_tx.send(SessionSignal::Invalidated);
                }
                let log_level = error.log_level();
                self.events
                    .send_availability_event(
                        format!("Availability update failed: {}", error),
                        EventType::Error,
                        log_level,
                    )
                    .await;
            }
        }
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBuddyApi;
    use crate::environment::Environment;
    use crate::events::Event;
    use crate::model::{Booking, BuddyProfile, BuddyStats, IdValue};
    use tokio::sync::broadcast::error::TryRecvError;

    fn sample_profile() -> BuddyProfile {
        BuddyProfile {
            id: IdValue::Text("b1".to_string()),
            name: "Ada".to_string(),
            avatar_url: None,
            location: Some("Lisbon".to_string()),
            is_available: true,
            rating: 4.8,
            review_count: 12,
        }
    }

    fn sample_booking(id: &str) -> Booking {
        Booking {
            id: IdValue::Text(id.to_string()),
            status: Some("confirmed".to_string()),
            tour_title: Some("Old town walk".to_string()),
            tourist: None,
            date: None,
            location: None,
            guest_count: 2,
            total_price: 60.0,
        }
    }

    struct Harness {
        orchestrator: RefreshOrchestrator,
        snapshot_rx: watch::Receiver<DashboardState>,
        event_rx: mpsc::Receiver<Event>,
        session_rx: broadcast::Receiver<SessionSignal>,
        foreground: Arc<AtomicBool>,
    }

    fn harness(api: impl BuddyApi + 'static) -> Harness {
        let (event_tx, event_rx) = mpsc::channel(64);
        let (session_tx, session_rx) = broadcast::channel(8);
        let foreground = Arc::new(AtomicBool::new(true));
        let (orchestrator, snapshot_rx) = RefreshOrchestrator::new(
            Arc::new(api),
            EventSender::new(event_tx),
            session_tx,
            foreground.clone(),
        );
        Harness {
            orchestrator,
            snapshot_rx,
            event_rx,
            session_rx,
            foreground,
        }
    }

    fn drain_events(event_rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn full_refresh_settles_every_section() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile()
            .times(1)
            .returning(|| Ok(sample_profile()));
        api.expect_fetch_stats()
            .times(1)
            .returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Ok(vec![sample_booking("bk1")]));
        api.expect_fetch_conversations().times(1).returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;

        let state = &h.orchestrator.state;
        for section in Section::ALL {
            assert!(!state.section(section).loading, "{} still loading", section);
            assert!(state.section(section).error.is_none());
        }
        assert!(!state.is_refreshing);
        assert!(state.last_refreshed_at.is_some());
        assert_eq!(state.snapshot.bookings, vec![sample_booking("bk1")]);
        assert!(state.snapshot.profile.is_some());
    }

    #[tokio::test]
    async fn failed_section_keeps_stale_payload() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile()
            .times(2)
            .returning(|| Ok(sample_profile()));
        api.expect_fetch_stats()
            .times(2)
            .returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Ok(vec![sample_booking("bk1")]));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Err(ApiError::Network("connection failed".to_string())));
        api.expect_fetch_conversations().times(2).returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;
        h.orchestrator.run_full_refresh(false).await;

        let state = &h.orchestrator.state;
        // Stale payload stays, error is recorded, nothing else regresses.
        assert_eq!(state.snapshot.bookings, vec![sample_booking("bk1")]);
        assert!(state.section(Section::Bookings).error.is_some());
        assert!(!state.section(Section::Bookings).loading);
        assert!(state.section(Section::Profile).error.is_none());
        assert!(state.section(Section::Stats).error.is_none());
        assert!(state.section(Section::Messages).error.is_none());
    }

    #[tokio::test]
    async fn success_clears_a_previous_error() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_stats()
            .times(1)
            .returning(|| Err(ApiError::Unknown("backend hiccup".to_string())));
        api.expect_fetch_stats()
            .times(1)
            .returning(|| Ok(BuddyStats::default()));
        let mut h = harness(api);

        h.orchestrator.run_section_refresh(Section::Stats).await;
        assert!(h.orchestrator.state.section(Section::Stats).error.is_some());

        h.orchestrator.run_section_refresh(Section::Stats).await;
        let stats = h.orchestrator.state.section(Section::Stats);
        assert!(stats.error.is_none());
        assert!(!stats.loading);
        assert!(h.orchestrator.state.snapshot.stats.is_some());
    }

    #[tokio::test]
    async fn section_refresh_leaves_other_sections_untouched() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile()
            .times(1)
            .returning(|| Ok(sample_profile()));
        api.expect_fetch_stats()
            .times(1)
            .returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Ok(vec![sample_booking("bk1")]));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Err(ApiError::NotFound));
        api.expect_fetch_conversations().times(1).returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;
        let profile_before = h.orchestrator.state.snapshot.profile.clone();

        h.orchestrator.run_section_refresh(Section::Bookings).await;

        let state = &h.orchestrator.state;
        assert!(state.section(Section::Bookings).error.is_some());
        for section in [Section::Profile, Section::Stats, Section::Messages] {
            assert!(!state.section(section).loading);
            assert!(state.section(section).error.is_none());
        }
        assert_eq!(
            state.snapshot.profile.as_ref().map(|p| p.name.clone()),
            profile_before.map(|p| p.name)
        );
    }

    #[tokio::test]
    async fn unauthorized_invalidates_the_session_once_per_cycle() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile()
            .times(1)
            .returning(|| Err(ApiError::Unauthorized));
        api.expect_fetch_stats()
            .times(1)
            .returning(|| Err(ApiError::Unauthorized));
        api.expect_fetch_bookings()
            .times(1)
            .returning(|| Ok(vec![]));
        api.expect_fetch_conversations().times(1).returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;

        assert_eq!(h.session_rx.try_recv(), Ok(SessionSignal::Invalidated));
        assert_eq!(h.session_rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn manual_refresh_emits_one_success_notification() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile().returning(|| Ok(sample_profile()));
        api.expect_fetch_stats().returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings().returning(|| Ok(vec![]));
        api.expect_fetch_conversations().returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(true).await;

        let notifications: Vec<Event> = drain_events(&mut h.event_rx)
            .into_iter()
            .filter(|event| {
                event.source == crate::events::Source::Cycle
                    && event.event_type == EventType::Success
            })
            .collect();
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn background_refresh_stays_quiet() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile().returning(|| Ok(sample_profile()));
        api.expect_fetch_stats().returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings()
            .returning(|| Err(ApiError::Network("offline".to_string())));
        api.expect_fetch_conversations().returning(|| Ok(vec![]));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;

        let cycle_notifications = drain_events(&mut h.event_rx)
            .into_iter()
            .filter(|event| {
                event.source == crate::events::Source::Cycle
                    && matches!(event.event_type, EventType::Success | EventType::Notice)
            })
            .count();
        assert_eq!(cycle_notifications, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn backgrounded_ticks_issue_no_fetches() {
        // No expectations registered: any fetch would panic the worker.
        let api = MockBuddyApi::new();
        let h = harness(api);
        h.foreground.store(false, Ordering::Relaxed);

        let (_command_tx, command_rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let snapshot_rx = h.snapshot_rx.clone();
        let worker = tokio::spawn(
            h.orchestrator
                .run(command_rx, shutdown_rx, Duration::from_secs(30)),
        );

        tokio::time::sleep(Duration::from_secs(95)).await;
        shutdown_tx.send(()).expect("worker should still be running");
        worker.await.expect("worker should shut down cleanly");

        let state = snapshot_rx.borrow();
        assert!(state.snapshot.profile.is_none());
        assert!(!state.is_refreshing);
    }

    #[tokio::test(start_paused = true)]
    async fn foreground_ticks_run_a_full_refresh() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile().returning(|| Ok(sample_profile()));
        api.expect_fetch_stats().returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings().returning(|| Ok(vec![]));
        api.expect_fetch_conversations().returning(|| Ok(vec![]));
        let h = harness(api);

        let (_command_tx, command_rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let snapshot_rx = h.snapshot_rx.clone();
        let worker = tokio::spawn(
            h.orchestrator
                .run(command_rx, shutdown_rx, Duration::from_secs(30)),
        );

        tokio::time::sleep(Duration::from_secs(31)).await;
        shutdown_tx.send(()).expect("worker should still be running");
        worker.await.expect("worker should shut down cleanly");

        assert!(snapshot_rx.borrow().snapshot.profile.is_some());
    }

    /// Stub whose fetches never resolve, for teardown-while-in-flight tests.
    struct StalledApi {
        environment: Environment,
    }

    #[async_trait::async_trait]
    impl BuddyApi for StalledApi {
        fn environment(&self) -> &Environment {
            &self.environment
        }

        async fn fetch_profile(&self) -> Result<BuddyProfile, ApiError> {
            std::future::pending().await
        }

        async fn fetch_stats(&self) -> Result<BuddyStats, ApiError> {
            std::future::pending().await
        }

        async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
            std::future::pending().await
        }

        async fn fetch_conversations(&self) -> Result<Vec<crate::model::Conversation>, ApiError> {
            std::future::pending().await
        }

        async fn set_availability(&self, _available: bool) -> Result<(), ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_in_flight_fetches() {
        let h = harness(StalledApi {
            environment: Environment::Local,
        });

        let (command_tx, command_rx) = mpsc::channel(4);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let snapshot_rx = h.snapshot_rx.clone();
        let worker = tokio::spawn(
            h.orchestrator
                .run(command_rx, shutdown_rx, Duration::from_secs(30)),
        );

        command_tx
            .send(RefreshCommand::FullRefresh { notify: false })
            .await
            .expect("queue should be open");
        // Let the cycle start and stall on the fetches.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(snapshot_rx.borrow().is_refreshing);

        shutdown_tx.send(()).expect("worker should still be running");
        worker.await.expect("cancelled fetches must not panic");

        // The stalled fetches never produced payloads or errors.
        let state = snapshot_rx.borrow();
        assert!(state.snapshot.profile.is_none());
        for section in Section::ALL {
            assert!(state.section(section).error.is_none());
        }
    }

    #[tokio::test]
    async fn handle_discards_commands_after_teardown() {
        let (command_tx, command_rx) = mpsc::channel(4);
        drop(command_rx);
        let handle = DashboardHandle::new(command_tx);

        // Must not panic or block.
        handle.refresh_all(true).await;
        handle.refresh_section(Section::Bookings).await;
        handle.toggle_availability().await;
    }

    #[tokio::test]
    async fn availability_toggle_updates_the_profile_payload() {
        let mut api = MockBuddyApi::new();
        api.expect_fetch_profile().returning(|| Ok(sample_profile()));
        api.expect_fetch_stats().returning(|| Ok(BuddyStats::default()));
        api.expect_fetch_bookings().returning(|| Ok(vec![]));
        api.expect_fetch_conversations().returning(|| Ok(vec![]));
        api.expect_set_availability()
            .with(mockall::predicate::eq(false))
            .times(1)
            .returning(|_| Ok(()));
        let mut h = harness(api);

        h.orchestrator.run_full_refresh(false).await;
        h.orchestrator.toggle_availability().await;

        let profile = h.orchestrator.state.snapshot.profile.as_ref().unwrap();
        assert!(!profile.is_available);
    }
}
