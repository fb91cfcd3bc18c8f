//! Observable per-page state objects consumed by the view layer.
//!
//! Each view model is a mutable struct holding its page's state plus an
//! explicit listener set; public methods mutate state and synchronously
//! notify listeners. Errors from the data layer are classified into
//! [`crate::errors::UiError`] at this boundary and stored in state.

/// Activity log page: pagination, filters, grouping, summary stats
pub mod activity;
/// Detail page: parallel load orchestration, tabs, polling lifecycle
pub mod detail;
/// Header strip: identity, status, shutdown confirmation flow
pub mod header;
/// Metrics page: cards, trends, health score
pub mod metrics;
/// Settings page: edit mode, dirty tracking, validation, save/cancel
pub mod settings;

pub use activity::{ActivitySummary, ContainerActivityViewModel};
pub use detail::{ContainerDetailViewModel, DetailTab};
pub use header::ContainerHeaderViewModel;
pub use metrics::{ContainerMetricsViewModel, MetricTrend, TrendDirection};
pub use settings::ContainerSettingsViewModel;
