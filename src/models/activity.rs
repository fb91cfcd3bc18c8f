//! Activity log entries, filters, and the shared pagination envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who performed a logged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    /// A human operator
    User,
    /// The platform itself (scheduled jobs, automation)
    System,
    /// An in-container robot
    Robot,
}

/// Immutable, append-only activity record associated with a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Unique identifier
    pub id: i64,
    /// Container this entry belongs to
    pub container_id: i64,
    /// Who performed the action
    pub actor_type: ActorType,
    /// Identifier of the actor (user id, robot serial, job name)
    pub actor_id: String,
    /// Action type; an open set defined by the backend ("settings_changed",
    /// "shutdown", "harvest_completed", ...)
    pub action_type: String,
    /// Human-readable description
    pub description: String,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
}

/// Filters and cursor for the activity log endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityFilter {
    /// Restrict to one action type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Restrict to one actor type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_type: Option<ActorType>,
    /// Inclusive lower bound on the entry timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the entry timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// 1-based page number
    pub page: u64,
    /// Page size
    pub page_size: u64,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            action_type: None,
            actor_type: None,
            from: None,
            to: None,
            page: 1,
            page_size: 20,
        }
    }
}

impl ActivityFilter {
    /// Stable cache-key fragment for this filter set.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "a={:?};ac={:?};f={:?};t={:?};pg={};ps={}",
            self.action_type, self.actor_type, self.from, self.to, self.page, self.page_size
        )
    }
}

/// Payload for appending an activity entry (non-critical write path).
#[derive(Debug, Clone, Serialize)]
pub struct NewActivityEntry {
    /// Who performed the action
    pub actor_type: ActorType,
    /// Identifier of the actor
    pub actor_id: String,
    /// Action type
    pub action_type: String,
    /// Human-readable description
    pub description: String,
}

/// Pagination envelope shared by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Total records matching the query
    pub total: u64,
    /// 1-based page number
    pub page: u64,
    /// Page size used
    pub page_size: u64,
    /// Whether further pages exist
    pub has_more: bool,
}

impl<T> Page<T> {
    /// An empty first page, used as the initial view-model state.
    #[must_use]
    pub const fn empty(page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            has_more: false,
        }
    }
}
