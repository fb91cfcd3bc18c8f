//! Typed REST client for the container-farm backend.
//!
//! One async method per endpoint. Each method builds the URL, attaches the
//! bearer token when configured, issues the request on a shared timeout-bound
//! client, and turns non-2xx statuses into [`Error::Api`] carrying the
//! server-provided message. No retry or idempotency logic lives here;
//! callers own that.

use crate::config::connection::ConnectionConfig;
use crate::errors::{Error, Result};
use crate::models::{
    ActivityFilter, ActivityLogEntry, Container, ContainerSettings, CropSummaryRow,
    DashboardMetrics, EnvironmentLinks, FilterCriteria, FilterOptions, NewActivityEntry,
    NewContainer, Page, TimeRange,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::trace;

/// Container-farm API client
pub struct ContainerApi {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token attached to every request when present
    token: Option<String>,
}

impl ContainerApi {
    /// Create a new client from connection settings
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        trace!(%method, %url, "issuing API request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// List containers matching the filter criteria
    pub async fn list_containers(&self, criteria: &FilterCriteria) -> Result<Page<Container>> {
        let response = self
            .request(Method::GET, "/api/v1/containers/")
            .query(criteria)
            .send()
            .await?;
        into_result(response).await
    }

    /// Create a container
    pub async fn create_container(&self, new: &NewContainer) -> Result<Container> {
        let response = self
            .request(Method::POST, "/api/v1/containers/")
            .json(new)
            .send()
            .await?;
        into_result(response).await
    }

    /// Get one container by id
    pub async fn get_container(&self, id: i64) -> Result<Container> {
        let response = self
            .request(Method::GET, &format!("/api/v1/containers/{id}"))
            .send()
            .await?;
        into_result(response).await
    }

    /// Partially update a container's settings
    pub async fn update_container(
        &self,
        id: i64,
        settings: &ContainerSettings,
    ) -> Result<Container> {
        let response = self
            .request(Method::PUT, &format!("/api/v1/containers/{id}"))
            .json(settings)
            .send()
            .await?;
        into_result(response).await
    }

    /// Logically delete a container
    pub async fn delete_container(&self, id: i64) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/api/v1/containers/{id}"))
            .send()
            .await?;
        into_unit_result(response).await
    }

    /// Request a container shutdown; returns the updated record
    pub async fn shutdown_container(&self, id: i64) -> Result<Container> {
        let response = self
            .request(Method::POST, &format!("/api/v1/containers/{id}/shutdown"))
            .send()
            .await?;
        into_result(response).await
    }

    /// Get dashboard metrics for a container over a time range
    pub async fn get_metrics(&self, id: i64, range: TimeRange) -> Result<DashboardMetrics> {
        let response = self
            .request(Method::GET, &format!("/api/v1/containers/{id}/metrics"))
            .query(&[("range", range.as_query_param())])
            .send()
            .await?;
        into_result(response).await
    }

    /// Get historical metric snapshots for a container over a time range
    pub async fn get_metric_snapshots(
        &self,
        id: i64,
        range: TimeRange,
    ) -> Result<Vec<DashboardMetrics>> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/v1/containers/{id}/metric-snapshots"),
            )
            .query(&[("range", range.as_query_param())])
            .send()
            .await?;
        into_result(response).await
    }

    /// Get the values available for list filtering
    pub async fn get_filter_options(&self) -> Result<FilterOptions> {
        let response = self
            .request(Method::GET, "/api/v1/containers/filter-options")
            .send()
            .await?;
        into_result(response).await
    }

    /// Get one page of a container's activity log
    pub async fn get_activity_logs(
        &self,
        id: i64,
        filter: &ActivityFilter,
    ) -> Result<Page<ActivityLogEntry>> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/v1/containers/{id}/activity-logs"),
            )
            .query(filter)
            .send()
            .await?;
        into_result(response).await
    }

    /// Append an entry to a container's activity log
    pub async fn append_activity_log(
        &self,
        id: i64,
        entry: &NewActivityEntry,
    ) -> Result<ActivityLogEntry> {
        let response = self
            .request(
                Method::POST,
                &format!("/api/v1/containers/{id}/activity-logs"),
            )
            .json(entry)
            .send()
            .await?;
        into_result(response).await
    }

    /// Get the per-seed-type crop summary for a container
    pub async fn get_crop_summary(&self, id: i64) -> Result<Vec<CropSummaryRow>> {
        let response = self
            .request(Method::GET, &format!("/api/v1/containers/{id}/crop-summary"))
            .send()
            .await?;
        into_result(response).await
    }

    /// Get a container's environment links
    pub async fn get_environment_links(&self, id: i64) -> Result<EnvironmentLinks> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/v1/containers/{id}/environment-links"),
            )
            .send()
            .await?;
        into_result(response).await
    }

    /// Replace a container's environment links as a whole
    pub async fn update_environment_links(
        &self,
        id: i64,
        links: &EnvironmentLinks,
    ) -> Result<EnvironmentLinks> {
        let response = self
            .request(
                Method::PUT,
                &format!("/api/v1/containers/{id}/environment-links"),
            )
            .json(links)
            .send()
            .await?;
        into_result(response).await
    }
}

async fn into_result<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        // Decode from text so a malformed body surfaces as a deserialization
        // error rather than a transport error.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: extract_error_message(&body, status.as_u16()),
        })
    }
}

async fn into_unit_result(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: extract_error_message(&body, status.as_u16()),
        })
    }
}

/// Pulls the server-provided message out of an error body.
///
/// The backend wraps errors as `{"detail": "..."}` (sometimes `"message"`);
/// anything else is passed through verbatim, and an empty body falls back to
/// the bare status code.
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.trim().to_string()
    }
}
