//! Balancing configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! station_order = "permissive"
//! capacity_tolerance = 1e-6
//!
//! [quality]
//! bottleneck_utilization = 99.0
//!
//! [recommendations]
//! satisfied_message = "Balance OK"
//!
//! [[recommendations.rules]]
//! metric = "line_efficiency"
//! comparison = "below"
//! threshold = 85.0
//! priority = 10
//! message = "Efficiency {value}% is below target {threshold}%"
//! ```
//!
//! Supplying `recommendations.rules` replaces the default rule table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::balancing::{StationOrder, MAX_CAPACITY_TOLERANCE};
use crate::error::{BalanceError, Result};
use crate::metrics::{QualityThresholds, RecommendationTable};

/// Options of a balancing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Station ordering rule of the assigner.
    pub station_order: StationOrder,
    /// Slack allowed when checking a task against remaining station time.
    ///
    /// At most [`MAX_CAPACITY_TOLERANCE`].
    pub capacity_tolerance: f64,
    /// Utilization thresholds of the quality indicators.
    pub quality: QualityThresholds,
    /// Recommendation rules.
    pub recommendations: RecommendationTable,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            station_order: StationOrder::default(),
            capacity_tolerance: 1e-9,
            quality: QualityThresholds::default(),
            recommendations: RecommendationTable::default(),
        }
    }
}

impl BalanceConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: BalanceConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Sets the station ordering rule.
    pub fn with_station_order(mut self, station_order: StationOrder) -> Self {
        self.station_order = station_order;
        self
    }

    /// Replaces the recommendation table.
    pub fn with_recommendations(mut self, table: RecommendationTable) -> Self {
        self.recommendations = table;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// [`BalanceError::Configuration`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.capacity_tolerance;
        if !(0.0..=MAX_CAPACITY_TOLERANCE).contains(&tolerance) {
            return Err(BalanceError::Configuration(format!(
                "capacity_tolerance must be between 0 and {MAX_CAPACITY_TOLERANCE} (got {tolerance})"
            )));
        }
        self.quality.validate()?;
        self.recommendations.validate()
    }
}
