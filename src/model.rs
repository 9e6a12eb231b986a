//! Domain types for the buddy dashboard
//!
//! Everything here mirrors the marketplace REST API's JSON payloads. The
//! backend is loosely typed in places (numeric-or-string ids, three
//! different unread-count shapes), so the tolerant representations live at
//! the deserialization boundary and the rest of the crate sees one
//! canonical form.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// An id that the backend serializes as either a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(u64),
}

impl IdValue {
    /// Id equality by string form, tolerating numeric vs string mismatches.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            IdValue::Text(s) => s == other,
            IdValue::Number(n) => n.to_string() == other,
        }
    }
}

impl Default for IdValue {
    fn default() -> Self {
        IdValue::Text(String::new())
    }
}

impl Display for IdValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IdValue::Text(s) => write!(f, "{}", s),
            IdValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// The signed-in buddy's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyProfile {
    #[serde(default)]
    pub id: IdValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
}

/// Aggregate numbers for the stat cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyStats {
    #[serde(default)]
    pub total_bookings: u64,
    #[serde(default)]
    pub upcoming_bookings: u64,
    #[serde(default)]
    pub completed_bookings: u64,
    #[serde(default)]
    pub total_earnings: f64,
    #[serde(default)]
    pub average_rating: f64,
}

/// Booking lifecycle states recognized by the dashboard.
///
/// Anything the backend sends outside this set is treated as pending.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Case-insensitive classification of a raw status string.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("confirmed") => BookingStatus::Confirmed,
            Some("completed") => BookingStatus::Completed,
            Some("cancelled") => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }
}

/// The counterpart shown on a booking or conversation row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default)]
    pub id: IdValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// One tour booking as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default)]
    pub id: IdValue,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "title")]
    pub tour_title: Option<String>,
    #[serde(default)]
    pub tourist: Option<Participant>,
    #[serde(default, alias = "startDate")]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub guest_count: u32,
    #[serde(default)]
    pub total_price: f64,
}

impl Booking {
    pub fn status_kind(&self) -> BookingStatus {
        BookingStatus::classify(self.status.as_deref())
    }
}

/// The last message preview on a conversation row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    #[serde(default, alias = "text")]
    pub content: String,
    #[serde(default, alias = "sender")]
    pub sender_id: Option<IdValue>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Unread counts arrive from the backend in one of three shapes: a plain
/// total, a map keyed by user id, or an array of per-user entries. The
/// untagged union normalizes them once at deserialization instead of
/// re-inspecting the raw record on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnreadCounts {
    Total(u64),
    PerUser(HashMap<String, u64>),
    Entries(Vec<UnreadEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadEntry {
    #[serde(default)]
    pub user_id: IdValue,
    #[serde(default)]
    pub count: u64,
}

impl UnreadCounts {
    /// Resolves the unread count for one user, by string form of the id.
    pub fn count_for(&self, user_id: &str) -> u64 {
        match self {
            UnreadCounts::Total(n) => *n,
            UnreadCounts::PerUser(map) => map.get(user_id).copied().unwrap_or(0),
            UnreadCounts::Entries(entries) => entries
                .iter()
                .find(|entry| entry.user_id.matches(user_id))
                .map(|entry| entry.count)
                .unwrap_or(0),
        }
    }
}

/// A conversation row on the messages panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default)]
    pub id: IdValue,
    #[serde(default, alias = "otherUser")]
    pub participant: Option<Participant>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, alias = "unreadCounts", alias = "unread")]
    pub unread_count: Option<UnreadCounts>,
}

impl Conversation {
    /// Unread messages for the given user, `0` when nothing is recorded.
    pub fn unread_count_for(&self, user_id: &str) -> u64 {
        self.unread_count
            .as_ref()
            .map(|counts| counts.count_for(user_id))
            .unwrap_or(0)
    }
}

/// The signed-in user record persisted alongside the session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: IdValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(json: &str) -> Conversation {
        serde_json::from_str(json).expect("conversation should deserialize")
    }

    #[test]
    // A conversation with no unread-related field resolves to zero.
    fn unread_count_absent_is_zero() {
        let convo = conversation(r#"{ "id": "c1" }"#);
        assert_eq!(convo.unread_count_for("u1"), 0);
    }

    #[test]
    fn unread_count_scalar_shape() {
        let convo = conversation(r#"{ "id": "c1", "unreadCount": 4 }"#);
        assert_eq!(convo.unread_count_for("u1"), 4);
    }

    #[test]
    fn unread_count_keyed_map_shape() {
        let convo = conversation(r#"{ "id": "c1", "unreadCounts": { "u1": 2, "u2": 9 } }"#);
        assert_eq!(convo.unread_count_for("u1"), 2);
        assert_eq!(convo.unread_count_for("u3"), 0);
    }

    #[test]
    fn unread_count_entry_array_shape() {
        let convo = conversation(
            r#"{ "id": "c1", "unreadCounts": [ { "userId": "u1", "count": 3 } ] }"#,
        );
        assert_eq!(convo.unread_count_for("u1"), 3);
        assert_eq!(convo.unread_count_for("u2"), 0);
    }

    #[test]
    // Numeric ids in entries must match their string form.
    fn unread_count_coerces_numeric_ids() {
        let convo =
            conversation(r#"{ "id": "c1", "unreadCounts": [ { "userId": 7, "count": 5 } ] }"#);
        assert_eq!(convo.unread_count_for("7"), 5);
    }

    #[test]
    fn classify_status_is_case_insensitive() {
        assert_eq!(
            BookingStatus::classify(Some("CONFIRMED")),
            BookingStatus::Confirmed
        );
        assert_eq!(
            BookingStatus::classify(Some("Completed")),
            BookingStatus::Completed
        );
        assert_eq!(
            BookingStatus::classify(Some("cancelled")),
            BookingStatus::Cancelled
        );
    }

    #[test]
    fn classify_status_defaults_to_pending() {
        assert_eq!(BookingStatus::classify(None), BookingStatus::Pending);
        assert_eq!(
            BookingStatus::classify(Some("weird")),
            BookingStatus::Pending
        );
        assert_eq!(BookingStatus::classify(Some("")), BookingStatus::Pending);
    }

    #[test]
    fn booking_tolerates_partial_payload() {
        let booking: Booking =
            serde_json::from_str(r#"{ "id": 12, "status": "confirmed", "totalPrice": 80.5 }"#)
                .expect("booking should deserialize");
        assert!(booking.id.matches("12"));
        assert_eq!(booking.status_kind(), BookingStatus::Confirmed);
        assert_eq!(booking.total_price, 80.5);
        assert!(booking.tourist.is_none());
    }
}
