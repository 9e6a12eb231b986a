use crate::api::error::ApiError;
use crate::environment::Environment;
use crate::model::{Booking, BuddyProfile, BuddyStats, Conversation};

pub(crate) mod client;
pub use client::{BuddyApiClient, LoginResponse};
pub mod error;

#[cfg(test)]
use mockall::{automock, predicate::*};

/// The section registry: every dashboard section maps to exactly one fetch
/// on this trait. Fetches take no input beyond the auth context already
/// injected into the client.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BuddyApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetch the signed-in buddy's profile.
    async fn fetch_profile(&self) -> Result<BuddyProfile, ApiError>;

    /// Fetch aggregate booking/earnings statistics.
    async fn fetch_stats(&self) -> Result<BuddyStats, ApiError>;

    /// Fetch upcoming bookings. Tries the confirmed-only endpoint first and
    /// falls back to the unfiltered listing on failure.
    async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    /// Fetch recent conversations, falling back to the full conversation
    /// listing when the recent endpoint fails.
    async fn fetch_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    /// Update the buddy's availability flag.
    async fn set_availability(&self, available: bool) -> Result<(), ApiError>;
}
