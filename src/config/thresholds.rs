//! Metric threshold configuration loading from thresholds.toml
//!
//! Each environment metric has an acceptable band and a target value used by
//! the metrics page to classify readings and compute the health score. Sites
//! can override the compiled-in defaults with a `thresholds.toml` file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Acceptable band and target for one metric.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    /// Lowest acceptable reading
    pub min: f64,
    /// Highest acceptable reading
    pub max: f64,
    /// Ideal reading shown as the target on the metric card
    pub target: f64,
}

impl ThresholdBand {
    /// Whether a reading falls inside the band (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Acceptable grow-space utilization window in percent.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct UtilizationBounds {
    /// Below this the space is under-utilized
    pub low: f64,
    /// Above this the space is over-utilized
    pub high: f64,
}

/// Full set of threshold bands, one per classified metric.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MetricThresholds {
    /// Air temperature band in degrees Celsius
    pub air_temperature: ThresholdBand,
    /// Relative humidity band in percent
    pub humidity: ThresholdBand,
    /// CO2 band in ppm
    pub co2: ThresholdBand,
    /// Space utilization window
    pub utilization: UtilizationBounds,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            air_temperature: ThresholdBand {
                min: 18.0,
                max: 26.0,
                target: 22.0,
            },
            humidity: ThresholdBand {
                min: 50.0,
                max: 80.0,
                target: 65.0,
            },
            co2: ThresholdBand {
                min: 400.0,
                max: 1200.0,
                target: 800.0,
            },
            utilization: UtilizationBounds {
                low: 40.0,
                high: 90.0,
            },
        }
    }
}

/// Loads metric thresholds from a TOML file
///
/// # Arguments
/// * `path` - Path to the thresholds.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_thresholds<P: AsRef<Path>>(path: P) -> Result<MetricThresholds> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read thresholds file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse thresholds.toml: {e}"),
    })
}

/// Loads metric thresholds from the default location (./thresholds.toml)
pub fn load_default_thresholds() -> Result<MetricThresholds> {
    load_thresholds("thresholds.toml")
}
