//! Dashboard data loading
//!
//! The section registry, the state the refresh worker owns, the command
//! queue that drives it, and the pure view-derivation helpers.

pub mod format;
pub mod orchestrator;
pub mod section;
pub mod state;

pub use orchestrator::{DashboardHandle, RefreshCommand, RefreshOrchestrator};
pub use section::Section;
pub use state::{DashboardSnapshot, DashboardState, SectionState};
