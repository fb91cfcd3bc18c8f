//! Shared test utilities for `ContainerConsole`.
//!
//! Provides an in-memory [`StubGateway`] standing in for the HTTP client,
//! call counters for asserting cache behavior, and fixture builders with
//! sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::adaptor::ContainerGateway;
use crate::errors::{Error, Result};
use crate::models::{
    ActivityFilter, ActivityLogEntry, ActorType, Container, ContainerSettings, ContainerStatus,
    ContainerType, CropSummaryRow, DashboardMetrics, EnvironmentLink, EnvironmentLinks,
    FilterCriteria, FilterOptions, Location, NewActivityEntry, NewContainer, Page, TimeRange,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Shared per-endpoint call counters, cloneable so tests can keep a handle
/// after the gateway moves into an adaptor.
#[derive(Clone, Default)]
pub struct CallCounters {
    inner: Arc<Mutex<HashMap<&'static str, usize>>>,
}

impl CallCounters {
    /// Number of calls recorded for one endpoint.
    pub fn get(&self, endpoint: &'static str) -> usize {
        *self.inner.lock().unwrap().get(endpoint).unwrap_or(&0)
    }

    fn record(&self, endpoint: &'static str) {
        *self.inner.lock().unwrap().entry(endpoint).or_default() += 1;
    }
}

/// Cloneable one-shot failure switchboard for [`StubGateway`].
#[derive(Clone, Default)]
pub struct FailureInjector {
    inner: Arc<Mutex<HashSet<&'static str>>>,
}

impl FailureInjector {
    /// Makes the next call to `endpoint` fail with an HTTP 500.
    pub fn fail_next(&self, endpoint: &'static str) {
        self.inner.lock().unwrap().insert(endpoint);
    }

    fn take(&self, endpoint: &'static str) -> bool {
        self.inner.lock().unwrap().remove(endpoint)
    }
}

/// In-memory gateway serving fixtures, with failure injection.
#[derive(Default)]
pub struct StubGateway {
    counters: CallCounters,
    failures: FailureInjector,
}

impl StubGateway {
    /// Handle to the call counters that survives moving the gateway.
    pub fn counters(&self) -> CallCounters {
        self.counters.clone()
    }

    /// Handle to the failure switchboard that survives moving the gateway.
    pub fn failures(&self) -> FailureInjector {
        self.failures.clone()
    }

    /// Number of calls recorded for one endpoint.
    pub fn calls(&self, endpoint: &'static str) -> usize {
        self.counters.get(endpoint)
    }

    /// Makes the next call to `endpoint` fail with an HTTP 500.
    pub fn fail_next(&self, endpoint: &'static str) {
        self.failures.fail_next(endpoint);
    }

    fn record(&self, endpoint: &'static str) -> Result<()> {
        self.counters.record(endpoint);
        if self.failures.take(endpoint) {
            return Err(Error::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ContainerGateway for StubGateway {
    async fn list_containers(&self, criteria: &FilterCriteria) -> Result<Page<Container>> {
        self.record("list_containers")?;
        let items: Vec<Container> = (1..=3).map(sample_container).collect();
        let page_size = criteria.page_size.unwrap_or(20);
        Ok(Page {
            total: items.len() as u64,
            items,
            page: criteria.page.unwrap_or(1),
            page_size,
            has_more: false,
        })
    }

    async fn create_container(&self, new: &NewContainer) -> Result<Container> {
        self.record("create_container")?;
        let mut container = sample_container(100);
        container.name = new.name.clone();
        container.container_type = new.container_type;
        container.settings = new.settings.clone();
        container.status = ContainerStatus::Created;
        Ok(container)
    }

    async fn get_container(&self, id: i64) -> Result<Container> {
        self.record("get_container")?;
        Ok(sample_container(id))
    }

    async fn update_container(&self, id: i64, settings: &ContainerSettings) -> Result<Container> {
        self.record("update_container")?;
        let mut container = sample_container(id);
        container.settings = settings.clone();
        Ok(container)
    }

    async fn delete_container(&self, _id: i64) -> Result<()> {
        self.record("delete_container")
    }

    async fn shutdown_container(&self, id: i64) -> Result<Container> {
        self.record("shutdown_container")?;
        let mut container = sample_container(id);
        container.status = ContainerStatus::Inactive;
        Ok(container)
    }

    async fn get_metrics(&self, _id: i64, range: TimeRange) -> Result<DashboardMetrics> {
        self.record("get_metrics")?;
        let mut metrics = sample_metrics(22.0);
        // Distinct CO2 reading per range so tests can tell which range a
        // fetch used.
        metrics.co2 = match range {
            TimeRange::LastHour => 801.0,
            TimeRange::Last24Hours => 800.0,
            TimeRange::Last7Days => 807.0,
            TimeRange::Last30Days => 830.0,
        };
        Ok(metrics)
    }

    async fn get_metric_snapshots(
        &self,
        _id: i64,
        _range: TimeRange,
    ) -> Result<Vec<DashboardMetrics>> {
        self.record("get_metric_snapshots")?;
        Ok(vec![
            sample_metrics(21.0),
            sample_metrics(22.0),
            sample_metrics(23.5),
        ])
    }

    async fn get_filter_options(&self) -> Result<FilterOptions> {
        self.record("get_filter_options")?;
        Ok(FilterOptions {
            statuses: vec!["active".to_string(), "maintenance".to_string()],
            purposes: vec!["production".to_string(), "research".to_string()],
            tenant_ids: vec![12, 34],
        })
    }

    async fn get_activity_logs(
        &self,
        id: i64,
        filter: &ActivityFilter,
    ) -> Result<Page<ActivityLogEntry>> {
        self.record("get_activity_logs")?;
        let filtered: Vec<ActivityLogEntry> = activity_dataset(id)
            .into_iter()
            .filter(|entry| {
                filter
                    .action_type
                    .as_ref()
                    .is_none_or(|action| entry.action_type == *action)
                    && filter
                        .actor_type
                        .is_none_or(|actor| entry.actor_type == actor)
                    && filter.from.is_none_or(|from| entry.timestamp >= from)
                    && filter.to.is_none_or(|to| entry.timestamp < to)
            })
            .collect();

        let total = filtered.len() as u64;
        let start = ((filter.page - 1) * filter.page_size) as usize;
        let items: Vec<ActivityLogEntry> = filtered
            .into_iter()
            .skip(start)
            .take(filter.page_size as usize)
            .collect();
        Ok(Page {
            items,
            total,
            page: filter.page,
            page_size: filter.page_size,
            has_more: filter.page * filter.page_size < total,
        })
    }

    async fn append_activity_log(
        &self,
        id: i64,
        entry: &NewActivityEntry,
    ) -> Result<ActivityLogEntry> {
        self.record("append_activity_log")?;
        Ok(ActivityLogEntry {
            id: 999,
            container_id: id,
            actor_type: entry.actor_type,
            actor_id: entry.actor_id.clone(),
            action_type: entry.action_type.clone(),
            description: entry.description.clone(),
            timestamp: activity_base_time(),
        })
    }

    async fn get_crop_summary(&self, _id: i64) -> Result<Vec<CropSummaryRow>> {
        self.record("get_crop_summary")?;
        Ok(vec![
            CropSummaryRow {
                seed_type: "basil".to_string(),
                count: 240,
                first_planted: Some(chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()),
                last_harvested: Some(chrono::NaiveDate::from_ymd_opt(2026, 1, 28).unwrap()),
                avg_yield_kg: Some(1.4),
            },
            CropSummaryRow {
                seed_type: "lettuce".to_string(),
                count: 180,
                first_planted: Some(chrono::NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()),
                last_harvested: None,
                avg_yield_kg: None,
            },
        ])
    }

    async fn get_environment_links(&self, _id: i64) -> Result<EnvironmentLinks> {
        self.record("get_environment_links")?;
        Ok(sample_links())
    }

    async fn update_environment_links(
        &self,
        _id: i64,
        links: &EnvironmentLinks,
    ) -> Result<EnvironmentLinks> {
        self.record("update_environment_links")?;
        Ok(links.clone())
    }
}

/// Fixed reference time the activity fixtures hang off.
pub fn activity_base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
}

/// Twelve activity entries spaced twelve hours apart, newest first.
///
/// Action types alternate between `settings_changed` and `harvest_completed`;
/// actor types cycle through system, user, and robot.
fn activity_dataset(container_id: i64) -> Vec<ActivityLogEntry> {
    let base = activity_base_time();
    (0..12)
        .map(|i| ActivityLogEntry {
            id: i + 1,
            container_id,
            actor_type: match i % 3 {
                0 => ActorType::System,
                1 => ActorType::User,
                _ => ActorType::Robot,
            },
            actor_id: format!("actor-{}", i % 3),
            action_type: if i % 2 == 0 {
                "settings_changed".to_string()
            } else {
                "harvest_completed".to_string()
            },
            description: format!("Activity {}", i + 1),
            timestamp: base - Duration::hours(12 * i) - Duration::seconds(1),
        })
        .collect()
}

/// Container settings fixture with sensible defaults.
pub fn sample_settings() -> ContainerSettings {
    ContainerSettings {
        tenant_id: 12,
        purpose: "production".to_string(),
        location: Location {
            city: "Munich".to_string(),
            country: "Germany".to_string(),
            address: None,
        },
        notes: String::new(),
        has_shadow_service: true,
        robotics_simulation_enabled: false,
        ecosystem_connected: true,
    }
}

/// Container fixture with sensible defaults.
pub fn sample_container(id: i64) -> Container {
    Container {
        id,
        name: format!("Unit {id}"),
        container_type: ContainerType::Physical,
        status: ContainerStatus::Active,
        settings: sample_settings(),
        ecosystem_settings: Some(serde_json::json!({"environment": "production"})),
        created_at: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap(),
    }
}

/// Metrics fixture; only the air temperature varies per call site.
pub fn sample_metrics(air_temperature: f64) -> DashboardMetrics {
    DashboardMetrics {
        air_temperature,
        humidity: 65.0,
        co2: 800.0,
        yield_total_kg: 14.2,
        yield_average_kg: 1.3,
        space_utilization_percent: 72.0,
        chart_points: Vec::new(),
        recorded_at: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(),
    }
}

/// Environment links fixture with one enabled and one disabled link.
pub fn sample_links() -> EnvironmentLinks {
    let mut links = EnvironmentLinks::default();
    links.links.insert(
        "climate-control".to_string(),
        EnvironmentLink {
            enabled: true,
            environment: "production".to_string(),
        },
    );
    links.links.insert(
        "seed-registry".to_string(),
        EnvironmentLink {
            enabled: false,
            environment: "staging".to_string(),
        },
    );
    links
}

/// Activity entry payload fixture.
pub fn sample_activity_entry() -> NewActivityEntry {
    NewActivityEntry {
        actor_type: ActorType::User,
        actor_id: "console".to_string(),
        action_type: "settings_changed".to_string(),
        description: "Settings updated".to_string(),
    }
}
