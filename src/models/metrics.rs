//! Dashboard metrics and their display models.
//!
//! [`DashboardMetrics`] is a read-only, point-in-time (or time-windowed)
//! reading regenerated by the backend per query. The metrics view model turns
//! it into [`MetricCard`]s classified against configured thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point in an embedded chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Sample timestamp
    pub timestamp: DateTime<Utc>,
    /// Sample value
    pub value: f64,
}

/// Point-in-time dashboard readings for one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Air temperature in degrees Celsius
    pub air_temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// CO2 concentration in ppm
    pub co2: f64,
    /// Total yield over the queried window in kilograms
    pub yield_total_kg: f64,
    /// Average yield per harvest in kilograms
    pub yield_average_kg: f64,
    /// Grow-space utilization in percent
    pub space_utilization_percent: f64,
    /// Chart series for the queried window
    #[serde(default)]
    pub chart_points: Vec<ChartPoint>,
    /// When this reading was taken
    pub recorded_at: DateTime<Utc>,
}

/// Time window selectable on the metrics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Last 60 minutes
    LastHour,
    /// Last 24 hours
    #[default]
    Last24Hours,
    /// Last 7 days
    Last7Days,
    /// Last 30 days
    Last30Days,
}

impl TimeRange {
    /// Value sent as the `range` query parameter.
    #[must_use]
    pub const fn as_query_param(self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::Last24Hours => "24h",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
        }
    }
}

/// Classification of a reading against its configured threshold band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    /// Within the configured band
    Ok,
    /// Below the configured minimum
    TooLow,
    /// Above the configured maximum
    TooHigh,
}

/// Display card for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    /// Stable metric identifier ("air_temperature", "humidity", ...)
    pub metric: &'static str,
    /// Label as rendered
    pub label: &'static str,
    /// Current reading
    pub value: f64,
    /// Configured target value
    pub target: f64,
    /// Display unit
    pub unit: &'static str,
    /// Classification against the threshold band
    pub status: MetricStatus,
}
