//! Pure transforms from wire records to display models.
//!
//! Everything here is synchronous and side-effect free so the adaptor and the
//! view models can call it freely. The ugliest job is normalizing
//! `ecosystem_settings`, which the backend serves as either an object or a
//! bare string depending on the record's age.

use crate::models::{Container, ContainerOverview};
use chrono::{DateTime, Utc};

/// Renders a timestamp as a relative-time string against `now`.
///
/// Granularity matches what the console shows: seconds collapse to
/// "just now", then minutes, hours, and days; anything older than a week
/// falls back to the calendar date.
#[must_use]
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let seconds = delta.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = delta.num_minutes();
    if minutes < 60 {
        return format_unit(minutes, "minute");
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return format_unit(hours, "hour");
    }
    let days = delta.num_days();
    if days < 7 {
        return format_unit(days, "day");
    }
    then.format("%Y-%m-%d").to_string()
}

fn format_unit(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Normalizes the two wire representations of `ecosystem_settings`.
///
/// Old records carry a bare environment string, new ones an object with an
/// `environment` key. Anything else (null, malformed) normalizes to `None`.
#[must_use]
pub fn normalize_ecosystem_settings(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(environment) if !environment.is_empty() => {
            Some(environment.clone())
        }
        serde_json::Value::Object(map) => map
            .get("environment")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
        _ => None,
    }
}

/// Builds the overview display model from a wire container record.
#[must_use]
pub fn overview_from_container(container: &Container, now: DateTime<Utc>) -> ContainerOverview {
    let location = &container.settings.location;
    ContainerOverview {
        id: container.id,
        name: container.name.clone(),
        container_type: container.container_type,
        status: container.status,
        status_label: container.status.label(),
        tenant_id: container.settings.tenant_id,
        purpose: container.settings.purpose.clone(),
        location_label: format!("{}, {}", location.city, location.country),
        ecosystem_environment: normalize_ecosystem_settings(container.ecosystem_settings.as_ref()),
        settings: container.settings.clone(),
        updated_relative: format_relative_time(container.updated_at, now),
        updated_at: container.updated_at,
    }
}
