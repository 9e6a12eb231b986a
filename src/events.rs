//! Event System
//!
//! Types and implementations for refresh worker events and logging

use crate::dashboard::section::Section;
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Where an event originated inside the refresh worker.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// One of the four dashboard data sections.
    Section(Section),
    /// A whole refresh cycle (start, completion, success notification).
    Cycle,
    /// The availability toggle.
    Availability,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Notice,
}

/// Out-of-band control signals the session layer reacts to.
///
/// Emitted at most once per refresh cycle regardless of how many sections
/// report the same failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionSignal {
    /// Credentials were rejected; clear the stored session and return to
    /// the login boundary.
    Invalidated,
    /// The account is not allowed to use the buddy dashboard.
    AccessDenied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn section_with_level(
        section: Section,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(Source::Section(section), msg, event_type, log_level)
    }

    pub fn cycle_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Source::Cycle, msg, event_type, log_level)
    }

    pub fn availability_with_level(
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(Source::Availability, msg, event_type, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

/// Common event sending utilities for the refresh worker
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send_section_event(
        &self,
        section: Section,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::section_with_level(
                section, message, event_type, log_level,
            ))
            .await;
    }

    pub async fn send_cycle_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::cycle_with_level(message, event_type, log_level))
            .await;
    }

    pub async fn send_availability_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::availability_with_level(
                message, event_type, log_level,
            ))
            .await;
    }
}
