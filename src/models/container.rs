//! Container records and their satellite types.
//!
//! A container is a physical or virtual farming unit owned by a tenant. The
//! backend serves these records as snake_case JSON; the structs here mirror
//! that contract directly, while [`ContainerOverview`] is the derived display
//! model the adaptor hands to the view models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a container is a physical unit or a virtual (simulated) one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    /// A real farming unit on a site
    Physical,
    /// A simulated unit with no hardware behind it
    Virtual,
}

/// Lifecycle status of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerStatus {
    /// Registered but not yet commissioned
    Created,
    /// In normal operation
    Active,
    /// Temporarily out of service for upkeep
    Maintenance,
    /// Decommissioned or shut down
    Inactive,
}

impl ContainerStatus {
    /// Label the view layer renders for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Active => "Active",
            Self::Maintenance => "Maintenance",
            Self::Inactive => "Inactive",
        }
    }
}

/// Free-form location record attached to a container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// City name
    pub city: String,
    /// Country name
    pub country: String,
    /// Optional street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Mutable per-container settings, edited as a unit by the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    /// Owning tenant id
    pub tenant_id: i64,
    /// Purpose of the container (must be one of the allowed purposes)
    pub purpose: String,
    /// Location of the unit
    pub location: Location,
    /// Free-form operator notes, at most 1000 characters
    #[serde(default)]
    pub notes: String,
    /// Whether the digital shadow service is enabled
    pub has_shadow_service: bool,
    /// Whether robotics runs against a simulator instead of hardware
    pub robotics_simulation_enabled: bool,
    /// Whether this unit reports into the connected ecosystem
    pub ecosystem_connected: bool,
}

/// Container record as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Physical or virtual
    pub container_type: ContainerType,
    /// Lifecycle status
    pub status: ContainerStatus,
    /// Mutable settings block
    pub settings: ContainerSettings,
    /// Ecosystem integration settings; the backend serves this inconsistently
    /// as either an object or a bare environment string, so it stays raw here
    /// and is normalized by the adaptor.
    #[serde(default)]
    pub ecosystem_settings: Option<serde_json::Value>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContainer {
    /// Display name
    pub name: String,
    /// Physical or virtual
    pub container_type: ContainerType,
    /// Initial settings block
    pub settings: ContainerSettings,
}

/// Display model for the overview/header area of a container page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerOverview {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Physical or virtual
    pub container_type: ContainerType,
    /// Lifecycle status
    pub status: ContainerStatus,
    /// Status label as rendered
    pub status_label: &'static str,
    /// Owning tenant id
    pub tenant_id: i64,
    /// Purpose of the container
    pub purpose: String,
    /// "City, Country" display string
    pub location_label: String,
    /// Normalized ecosystem environment name, if connected
    pub ecosystem_environment: Option<String>,
    /// Mutable settings block, as currently stored
    pub settings: ContainerSettings,
    /// Relative-time string for the last update ("3 minutes ago")
    pub updated_relative: String,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// One row of the per-seed-type crop summary, aggregated server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSummaryRow {
    /// Seed type name
    pub seed_type: String,
    /// Number of crops of this type currently in the container
    pub count: i64,
    /// Date the oldest of these crops was planted
    #[serde(default)]
    pub first_planted: Option<NaiveDate>,
    /// Date of the most recent harvest of this type
    #[serde(default)]
    pub last_harvested: Option<NaiveDate>,
    /// Average yield per harvest in kilograms, if any harvests exist
    #[serde(default)]
    pub avg_yield_kg: Option<f64>,
}

/// A single named external-integration config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentLink {
    /// Whether the integration is active
    pub enabled: bool,
    /// Target environment name (e.g. "staging", "production")
    pub environment: String,
}

/// Per-container map of named integration configs, replaced whole on update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentLinks {
    /// Integration name to its config
    pub links: BTreeMap<String, EnvironmentLink>,
}

/// Query criteria for the container list endpoint.
///
/// Serialized into the request query string; `None` fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterCriteria {
    /// Restrict to one tenant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    /// Restrict to one lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContainerStatus>,
    /// Restrict to physical or virtual units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_type: Option<ContainerType>,
    /// Restrict to one purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Free-text name search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl FilterCriteria {
    /// Stable cache-key fragment for this criteria set.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "t={:?};s={:?};ty={:?};p={:?};q={:?};pg={:?};ps={:?}",
            self.tenant_id,
            self.status,
            self.container_type,
            self.purpose,
            self.search,
            self.page,
            self.page_size
        )
    }
}

/// Available filter values, served by the backend for populating dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// All statuses present across containers
    pub statuses: Vec<String>,
    /// All purposes in use
    pub purposes: Vec<String>,
    /// Tenant ids with at least one container
    pub tenant_ids: Vec<i64>,
}
