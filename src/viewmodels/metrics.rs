//! Metrics page view model.
//!
//! Derives per-metric display cards, trend comparisons between consecutive
//! snapshots, and the container health score from raw dashboard readings and
//! the configured threshold bands.

use crate::config::thresholds::{MetricThresholds, ThresholdBand};
use crate::errors::UiError;
use crate::models::{DashboardMetrics, MetricCard, MetricStatus};
use crate::observer::{ListenerId, ListenerSet};
use crate::polling::PollEvent;

/// Direction of a metric's movement between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    /// Reading increased by more than the stability margin
    Up,
    /// Reading decreased by more than the stability margin
    Down,
    /// Reading moved less than the stability margin
    Stable,
}

/// Trend of one metric between the previous and current snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTrend {
    /// Direction of the change
    pub direction: TrendDirection,
    /// Percentage change relative to the previous reading
    pub change_percent: f64,
}

/// Movement below this percentage counts as stable.
const STABILITY_MARGIN_PERCENT: f64 = 0.5;

/// Computes the trend from a previous to a current reading.
///
/// A zero previous reading yields a stable trend, since a percentage change
/// has no meaning against it.
#[must_use]
pub fn calculate_trend(current: f64, previous: f64) -> MetricTrend {
    if previous == 0.0 {
        return MetricTrend {
            direction: TrendDirection::Stable,
            change_percent: 0.0,
        };
    }
    let change_percent = (current - previous) / previous * 100.0;
    let direction = if change_percent.abs() < STABILITY_MARGIN_PERCENT {
        TrendDirection::Stable
    } else if change_percent > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };
    MetricTrend {
        direction,
        change_percent,
    }
}

fn classify(value: f64, band: &ThresholdBand) -> MetricStatus {
    if value < band.min {
        MetricStatus::TooLow
    } else if value > band.max {
        MetricStatus::TooHigh
    } else {
        MetricStatus::Ok
    }
}

/// Builds the display cards for the three classified environment metrics.
#[must_use]
pub fn metric_cards(metrics: &DashboardMetrics, thresholds: &MetricThresholds) -> Vec<MetricCard> {
    vec![
        MetricCard {
            metric: "air_temperature",
            label: "Air temperature",
            value: metrics.air_temperature,
            target: thresholds.air_temperature.target,
            unit: "°C",
            status: classify(metrics.air_temperature, &thresholds.air_temperature),
        },
        MetricCard {
            metric: "humidity",
            label: "Humidity",
            value: metrics.humidity,
            target: thresholds.humidity.target,
            unit: "%",
            status: classify(metrics.humidity, &thresholds.humidity),
        },
        MetricCard {
            metric: "co2",
            label: "CO2",
            value: metrics.co2,
            target: thresholds.co2.target,
            unit: "ppm",
            status: classify(metrics.co2, &thresholds.co2),
        },
    ]
}

/// Computes the 0-100 health score for a snapshot.
///
/// Starts at 100; each environment metric outside its band deducts 20.
/// Over-utilized grow space deducts 10, under-utilized deducts 5. The result
/// is clamped to [0, 100].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn health_score(metrics: &DashboardMetrics, thresholds: &MetricThresholds) -> u8 {
    let mut score: i32 = 100;

    for band in [
        (&thresholds.air_temperature, metrics.air_temperature),
        (&thresholds.humidity, metrics.humidity),
        (&thresholds.co2, metrics.co2),
    ] {
        if !band.0.contains(band.1) {
            score -= 20;
        }
    }

    if metrics.space_utilization_percent > thresholds.utilization.high {
        score -= 10;
    } else if metrics.space_utilization_percent < thresholds.utilization.low {
        score -= 5;
    }

    score.clamp(0, 100) as u8
}

/// Observable state of the metrics page.
#[derive(Debug, Default)]
pub struct MetricsState {
    /// Most recent snapshot
    pub current: Option<DashboardMetrics>,
    /// Snapshot before the current one, used for trends
    pub previous: Option<DashboardMetrics>,
    /// Last polling failure, if the poller gave up
    pub error: Option<UiError>,
}

/// View model backing the metrics page.
pub struct ContainerMetricsViewModel {
    thresholds: MetricThresholds,
    state: MetricsState,
    listeners: ListenerSet,
}

impl ContainerMetricsViewModel {
    /// Creates an empty view model with the given threshold configuration.
    #[must_use]
    pub fn new(thresholds: MetricThresholds) -> Self {
        Self {
            thresholds,
            state: MetricsState::default(),
            listeners: ListenerSet::new(),
        }
    }

    /// Current page state.
    #[must_use]
    pub const fn state(&self) -> &MetricsState {
        &self.state
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Removes a change listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Applies a fresh snapshot, shifting the current one into `previous`.
    pub fn apply_snapshot(&mut self, metrics: DashboardMetrics) {
        self.state.previous = self.state.current.take();
        self.state.current = Some(metrics);
        self.state.error = None;
        self.listeners.notify();
    }

    /// Applies a polling event (fresh metrics or a terminal poll failure).
    pub fn apply_poll_event(&mut self, event: &PollEvent) {
        match event {
            PollEvent::Metrics(metrics) => self.apply_snapshot(metrics.clone()),
            PollEvent::Failed(error) => {
                self.state.error = Some(error.clone());
                self.listeners.notify();
            }
        }
    }

    /// Display cards for the current snapshot, if one is loaded.
    #[must_use]
    pub fn cards(&self) -> Vec<MetricCard> {
        self.state
            .current
            .as_ref()
            .map(|metrics| metric_cards(metrics, &self.thresholds))
            .unwrap_or_default()
    }

    /// Trend of one metric between the previous and current snapshot.
    ///
    /// `None` until two snapshots have been applied or for unknown metrics.
    #[must_use]
    pub fn trend_for(&self, metric: &str) -> Option<MetricTrend> {
        let current = self.state.current.as_ref()?;
        let previous = self.state.previous.as_ref()?;
        let pick = |m: &DashboardMetrics| match metric {
            "air_temperature" => Some(m.air_temperature),
            "humidity" => Some(m.humidity),
            "co2" => Some(m.co2),
            "yield_total_kg" => Some(m.yield_total_kg),
            "space_utilization_percent" => Some(m.space_utilization_percent),
            _ => None,
        };
        Some(calculate_trend(pick(current)?, pick(previous)?))
    }

    /// Health score of the current snapshot, if one is loaded.
    #[must_use]
    pub fn health_score(&self) -> Option<u8> {
        self.state
            .current
            .as_ref()
            .map(|metrics| health_score(metrics, &self.thresholds))
    }
}
