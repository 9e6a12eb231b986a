//! Dashboard state management
//!
//! Per-section loading/error flags, the aggregate snapshot of last
//! successful payloads, and the whole-cycle refresh flags. Owned
//! exclusively by the refresh orchestrator; the rendering layer receives
//! read-only clones over a watch channel.

use crate::dashboard::section::Section;
use crate::model::{Booking, BuddyProfile, BuddyStats, Conversation};
use chrono::{DateTime, Local};

/// Loading/error flags for one section.
///
/// The error is cleared the moment a new attempt starts, so a section never
/// carries a stale error into a fresh fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionState {
    pub loading: bool,
    pub error: Option<String>,
}

impl SectionState {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self) {
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// Last successfully fetched payload per section. A section that fails
/// keeps its previous payload here, stale but present, so the panels can
/// keep rendering data under an inline error.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub profile: Option<BuddyProfile>,
    pub stats: Option<BuddyStats>,
    pub bookings: Vec<Booking>,
    pub conversations: Vec<Conversation>,
}

/// Complete dashboard state: snapshot, per-section flags, and cycle flags.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    sections: [SectionState; Section::COUNT],
    pub snapshot: DashboardSnapshot,
    /// Whole-cycle flag, distinct from the per-section loading flags.
    pub is_refreshing: bool,
    /// Completion time of the last full refresh cycle.
    pub last_refreshed_at: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn section(&self, section: Section) -> &SectionState {
        &self.sections[section.index()]
    }

    pub(crate) fn section_mut(&mut self, section: Section) -> &mut SectionState {
        &mut self.sections[section.index()]
    }

    /// Start a full refresh cycle: every section goes loading with its
    /// error cleared.
    pub(crate) fn begin_cycle(&mut self) {
        self.is_refreshing = true;
        for section in Section::ALL {
            self.section_mut(section).begin();
        }
    }

    /// End a full refresh cycle once every section has settled.
    pub(crate) fn finish_cycle(&mut self, completed_at: DateTime<Local>) {
        self.is_refreshing = false;
        self.last_refreshed_at = Some(completed_at);
    }

    pub fn has_section_errors(&self) -> bool {
        self.sections.iter().any(|state| state.error.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cycle_marks_every_section_loading() {
        let mut state = DashboardState::default();
        state.section_mut(Section::Stats).fail("boom".to_string());

        state.begin_cycle();

        assert!(state.is_refreshing);
        for section in Section::ALL {
            assert!(state.section(section).loading);
            assert!(state.section(section).error.is_none());
        }
    }

    #[test]
    fn finish_cycle_clears_the_refreshing_flag_and_stamps_completion() {
        let mut state = DashboardState::default();
        state.begin_cycle();

        let completed_at = Local::now();
        state.finish_cycle(completed_at);

        assert!(!state.is_refreshing);
        assert_eq!(state.last_refreshed_at, Some(completed_at));
    }

    #[test]
    fn failure_keeps_loading_false_and_records_message() {
        let mut state = DashboardState::default();
        state.section_mut(Section::Bookings).begin();
        state
            .section_mut(Section::Bookings)
            .fail("network error".to_string());

        let bookings = state.section(Section::Bookings);
        assert!(!bookings.loading);
        assert_eq!(bookings.error.as_deref(), Some("network error"));
        assert!(state.has_section_errors());
    }
}
