//! Wire and display data models.
//!
//! Wire types mirror the backend's JSON contracts (snake_case fields) and are
//! deserialized directly by the API client. Display models are produced by the
//! adaptor layer and carry derived fields the view layer renders as-is.

/// Activity log entries, filters, and pagination envelope
pub mod activity;
/// Container records, settings, and filter criteria
pub mod container;
/// Dashboard metrics, chart points, and trend display models
pub mod metrics;

pub use activity::{ActivityFilter, ActivityLogEntry, ActorType, NewActivityEntry, Page};
pub use container::{
    Container, ContainerOverview, ContainerSettings, ContainerStatus, ContainerType,
    CropSummaryRow, EnvironmentLink, EnvironmentLinks, FilterCriteria, FilterOptions, Location,
    NewContainer,
};
pub use metrics::{ChartPoint, DashboardMetrics, MetricCard, MetricStatus, TimeRange};
