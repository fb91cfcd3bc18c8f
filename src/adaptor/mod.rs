//! Transform and caching layer between the API client and the view models.
//!
//! The adaptor owns the session-scoped TTL caches and the wire-to-display
//! transforms. Reads are cache-checked; every mutating call invalidates the
//! affected container's keys before returning. The [`ContainerGateway`] trait
//! is the seam to the HTTP client so the whole layer runs against a stub in
//! tests.

/// Pure wire-to-display transforms
pub mod transform;

use crate::api::ContainerApi;
use crate::cache::TtlCache;
use crate::errors::Result;
use crate::models::{
    ActivityFilter, ActivityLogEntry, Container, ContainerOverview, ContainerSettings,
    CropSummaryRow, DashboardMetrics, EnvironmentLinks, FilterCriteria, FilterOptions,
    NewActivityEntry, NewContainer, Page, TimeRange,
};
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Seam between the adaptor and the HTTP client.
///
/// Implemented by [`ContainerApi`] in production and by the in-memory stub in
/// tests. One method per backend endpoint, mirroring the client exactly.
pub trait ContainerGateway: Send + Sync {
    /// List containers matching the filter criteria
    fn list_containers(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<Page<Container>>> + Send;
    /// Create a container
    fn create_container(&self, new: &NewContainer) -> impl Future<Output = Result<Container>> + Send;
    /// Get one container by id
    fn get_container(&self, id: i64) -> impl Future<Output = Result<Container>> + Send;
    /// Partially update a container's settings
    fn update_container(
        &self,
        id: i64,
        settings: &ContainerSettings,
    ) -> impl Future<Output = Result<Container>> + Send;
    /// Logically delete a container
    fn delete_container(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
    /// Request a container shutdown
    fn shutdown_container(&self, id: i64) -> impl Future<Output = Result<Container>> + Send;
    /// Get dashboard metrics over a time range
    fn get_metrics(
        &self,
        id: i64,
        range: TimeRange,
    ) -> impl Future<Output = Result<DashboardMetrics>> + Send;
    /// Get historical metric snapshots over a time range
    fn get_metric_snapshots(
        &self,
        id: i64,
        range: TimeRange,
    ) -> impl Future<Output = Result<Vec<DashboardMetrics>>> + Send;
    /// Get the values available for list filtering
    fn get_filter_options(&self) -> impl Future<Output = Result<FilterOptions>> + Send;
    /// Get one page of a container's activity log
    fn get_activity_logs(
        &self,
        id: i64,
        filter: &ActivityFilter,
    ) -> impl Future<Output = Result<Page<ActivityLogEntry>>> + Send;
    /// Append an entry to a container's activity log
    fn append_activity_log(
        &self,
        id: i64,
        entry: &NewActivityEntry,
    ) -> impl Future<Output = Result<ActivityLogEntry>> + Send;
    /// Get the per-seed-type crop summary
    fn get_crop_summary(&self, id: i64) -> impl Future<Output = Result<Vec<CropSummaryRow>>> + Send;
    /// Get a container's environment links
    fn get_environment_links(&self, id: i64)
    -> impl Future<Output = Result<EnvironmentLinks>> + Send;
    /// Replace a container's environment links as a whole
    fn update_environment_links(
        &self,
        id: i64,
        links: &EnvironmentLinks,
    ) -> impl Future<Output = Result<EnvironmentLinks>> + Send;
}

impl ContainerGateway for ContainerApi {
    async fn list_containers(&self, criteria: &FilterCriteria) -> Result<Page<Container>> {
        Self::list_containers(self, criteria).await
    }

    async fn create_container(&self, new: &NewContainer) -> Result<Container> {
        Self::create_container(self, new).await
    }

    async fn get_container(&self, id: i64) -> Result<Container> {
        Self::get_container(self, id).await
    }

    async fn update_container(&self, id: i64, settings: &ContainerSettings) -> Result<Container> {
        Self::update_container(self, id, settings).await
    }

    async fn delete_container(&self, id: i64) -> Result<()> {
        Self::delete_container(self, id).await
    }

    async fn shutdown_container(&self, id: i64) -> Result<Container> {
        Self::shutdown_container(self, id).await
    }

    async fn get_metrics(&self, id: i64, range: TimeRange) -> Result<DashboardMetrics> {
        Self::get_metrics(self, id, range).await
    }

    async fn get_metric_snapshots(
        &self,
        id: i64,
        range: TimeRange,
    ) -> Result<Vec<DashboardMetrics>> {
        Self::get_metric_snapshots(self, id, range).await
    }

    async fn get_filter_options(&self) -> Result<FilterOptions> {
        Self::get_filter_options(self).await
    }

    async fn get_activity_logs(
        &self,
        id: i64,
        filter: &ActivityFilter,
    ) -> Result<Page<ActivityLogEntry>> {
        Self::get_activity_logs(self, id, filter).await
    }

    async fn append_activity_log(
        &self,
        id: i64,
        entry: &NewActivityEntry,
    ) -> Result<ActivityLogEntry> {
        Self::append_activity_log(self, id, entry).await
    }

    async fn get_crop_summary(&self, id: i64) -> Result<Vec<CropSummaryRow>> {
        Self::get_crop_summary(self, id).await
    }

    async fn get_environment_links(&self, id: i64) -> Result<EnvironmentLinks> {
        Self::get_environment_links(self, id).await
    }

    async fn update_environment_links(
        &self,
        id: i64,
        links: &EnvironmentLinks,
    ) -> Result<EnvironmentLinks> {
        Self::update_environment_links(self, id, links).await
    }
}

/// Default time-to-live for cached reads.
const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Cache-checked, transforming gateway in front of the API client.
pub struct ContainerAdaptor<G> {
    gateway: G,
    list_cache: TtlCache<Page<Container>>,
    overview_cache: TtlCache<ContainerOverview>,
    metrics_cache: TtlCache<DashboardMetrics>,
    snapshots_cache: TtlCache<Vec<DashboardMetrics>>,
    activity_cache: TtlCache<Page<ActivityLogEntry>>,
    crops_cache: TtlCache<Vec<CropSummaryRow>>,
    links_cache: TtlCache<EnvironmentLinks>,
    options_cache: TtlCache<FilterOptions>,
}

impl<G: ContainerGateway> ContainerAdaptor<G> {
    /// Creates an adaptor with the default 30-second TTL.
    pub fn new(gateway: G) -> Self {
        Self::with_ttl(gateway, DEFAULT_TTL)
    }

    /// Creates an adaptor with an explicit TTL for every cache.
    pub fn with_ttl(gateway: G, ttl: Duration) -> Self {
        Self {
            gateway,
            list_cache: TtlCache::new(ttl),
            overview_cache: TtlCache::new(ttl),
            metrics_cache: TtlCache::new(ttl),
            snapshots_cache: TtlCache::new(ttl),
            activity_cache: TtlCache::new(ttl),
            crops_cache: TtlCache::new(ttl),
            links_cache: TtlCache::new(ttl),
            options_cache: TtlCache::new(ttl),
        }
    }

    /// Lists containers, cache-checked per criteria set.
    pub async fn list(&self, criteria: &FilterCriteria) -> Result<Page<Container>> {
        let key = format!("list:{}", criteria.cache_key());
        if let Some(page) = self.list_cache.get(&key).await {
            debug!(key, "container list served from cache");
            return Ok(page);
        }
        let page = self.gateway.list_containers(criteria).await?;
        self.list_cache.insert(key, page.clone()).await;
        Ok(page)
    }

    /// Fetches one container and maps it to the overview display model.
    pub async fn overview(&self, id: i64) -> Result<ContainerOverview> {
        let key = format!("overview:{id}");
        if let Some(overview) = self.overview_cache.get(&key).await {
            debug!(key, "overview served from cache");
            return Ok(overview);
        }
        let container = self.gateway.get_container(id).await?;
        let overview = transform::overview_from_container(&container, Utc::now());
        self.overview_cache.insert(key, overview.clone()).await;
        Ok(overview)
    }

    /// Fetches dashboard metrics, cache-checked per container and range.
    pub async fn metrics(&self, id: i64, range: TimeRange) -> Result<DashboardMetrics> {
        let key = format!("metrics:{id}:{}", range.as_query_param());
        if let Some(metrics) = self.metrics_cache.get(&key).await {
            debug!(key, "metrics served from cache");
            return Ok(metrics);
        }
        let metrics = self.gateway.get_metrics(id, range).await?;
        self.metrics_cache.insert(key, metrics.clone()).await;
        Ok(metrics)
    }

    /// Fetches dashboard metrics bypassing the cache, then refreshes it.
    ///
    /// The polling loop uses this so each tick reflects the backend rather
    /// than its own previous answer.
    pub async fn fresh_metrics(&self, id: i64, range: TimeRange) -> Result<DashboardMetrics> {
        let metrics = self.gateway.get_metrics(id, range).await?;
        let key = format!("metrics:{id}:{}", range.as_query_param());
        self.metrics_cache.insert(key, metrics.clone()).await;
        Ok(metrics)
    }

    /// Fetches historical metric snapshots, cache-checked.
    pub async fn metric_snapshots(
        &self,
        id: i64,
        range: TimeRange,
    ) -> Result<Vec<DashboardMetrics>> {
        let key = format!("snapshots:{id}:{}", range.as_query_param());
        if let Some(snapshots) = self.snapshots_cache.get(&key).await {
            return Ok(snapshots);
        }
        let snapshots = self.gateway.get_metric_snapshots(id, range).await?;
        self.snapshots_cache.insert(key, snapshots.clone()).await;
        Ok(snapshots)
    }

    /// Fetches one activity page, cache-checked per filter set.
    pub async fn activity(
        &self,
        id: i64,
        filter: &ActivityFilter,
    ) -> Result<Page<ActivityLogEntry>> {
        let key = format!("activity:{id}:{}", filter.cache_key());
        if let Some(page) = self.activity_cache.get(&key).await {
            return Ok(page);
        }
        let page = self.gateway.get_activity_logs(id, filter).await?;
        self.activity_cache.insert(key, page.clone()).await;
        Ok(page)
    }

    /// Fetches the crop summary, cache-checked.
    pub async fn crop_summary(&self, id: i64) -> Result<Vec<CropSummaryRow>> {
        let key = format!("crops:{id}");
        if let Some(rows) = self.crops_cache.get(&key).await {
            return Ok(rows);
        }
        let rows = self.gateway.get_crop_summary(id).await?;
        self.crops_cache.insert(key, rows.clone()).await;
        Ok(rows)
    }

    /// Fetches the environment links, cache-checked.
    pub async fn environment_links(&self, id: i64) -> Result<EnvironmentLinks> {
        let key = format!("links:{id}");
        if let Some(links) = self.links_cache.get(&key).await {
            return Ok(links);
        }
        let links = self.gateway.get_environment_links(id).await?;
        self.links_cache.insert(key, links.clone()).await;
        Ok(links)
    }

    /// Fetches the filter options, cache-checked.
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        if let Some(options) = self.options_cache.get("options").await {
            return Ok(options);
        }
        let options = self.gateway.get_filter_options().await?;
        self.options_cache.insert("options", options.clone()).await;
        Ok(options)
    }

    /// Creates a container and drops list/options caches.
    pub async fn create(&self, new: &NewContainer) -> Result<Container> {
        let container = self.gateway.create_container(new).await?;
        self.list_cache.clear().await;
        self.options_cache.clear().await;
        Ok(container)
    }

    /// Updates a container's settings and invalidates its cached reads.
    pub async fn update_settings(
        &self,
        id: i64,
        settings: &ContainerSettings,
    ) -> Result<Container> {
        let container = self.gateway.update_container(id, settings).await?;
        self.invalidate_container(id).await;
        Ok(container)
    }

    /// Logically deletes a container and invalidates its cached reads.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete_container(id).await?;
        self.invalidate_container(id).await;
        Ok(())
    }

    /// Requests a shutdown and invalidates the container's cached reads.
    pub async fn shutdown(&self, id: i64) -> Result<Container> {
        let container = self.gateway.shutdown_container(id).await?;
        self.invalidate_container(id).await;
        Ok(container)
    }

    /// Replaces the environment links and invalidates the cached copy.
    pub async fn update_environment_links(
        &self,
        id: i64,
        links: &EnvironmentLinks,
    ) -> Result<EnvironmentLinks> {
        let updated = self.gateway.update_environment_links(id, links).await?;
        self.links_cache.invalidate(&format!("links:{id}")).await;
        Ok(updated)
    }

    /// Appends an activity entry; failures are logged and swallowed.
    ///
    /// Activity writes are non-critical: the user's primary action already
    /// succeeded by the time this runs, so a failed log write must never
    /// surface as an error.
    pub async fn log_activity(&self, id: i64, entry: &NewActivityEntry) {
        match self.gateway.append_activity_log(id, entry).await {
            Ok(_) => {
                self.activity_cache
                    .invalidate_prefix(&format!("activity:{id}:"))
                    .await;
            }
            Err(e) => {
                warn!(container_id = id, error = %e, "activity log write failed; continuing");
            }
        }
    }

    /// Drops every cached read for one container, plus the list cache.
    async fn invalidate_container(&self, id: i64) {
        self.overview_cache
            .invalidate(&format!("overview:{id}"))
            .await;
        self.metrics_cache
            .invalidate_prefix(&format!("metrics:{id}:"))
            .await;
        self.snapshots_cache
            .invalidate_prefix(&format!("snapshots:{id}:"))
            .await;
        self.activity_cache
            .invalidate_prefix(&format!("activity:{id}:"))
            .await;
        self.crops_cache.invalidate(&format!("crops:{id}")).await;
        self.links_cache.invalidate(&format!("links:{id}")).await;
        self.list_cache.clear().await;
    }
}
