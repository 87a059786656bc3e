//! Threshold-based improvement recommendations.
//!
//! Recommendations are data, not code: a [`RecommendationTable`] is a list
//! of [`RecommendationRule`]s, each comparing one line metric against a
//! threshold. The default table can be replaced wholesale from a config
//! file.
//!
//! Fired rules are ranked by `priority` (highest first); rules with equal
//! priority keep their table order.

use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, Result};

/// Line metric a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Line efficiency (%).
    LineEfficiency,
    /// Mean station utilization (%).
    AverageUtilization,
    /// Lowest station utilization (%).
    MinUtilization,
    /// Highest station utilization (%).
    MaxUtilization,
    /// Highest minus lowest station utilization (percentage points).
    UtilizationSpread,
    /// Stations above the theoretical minimum.
    ExcessStations,
    /// Smoothness index.
    SmoothnessIndex,
}

/// Strict comparison against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Fires when `value > threshold`.
    Above,
    /// Fires when `value < threshold`.
    Below,
}

impl Comparison {
    fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }
}

/// One row of the recommendation table.
///
/// `message` may contain `{value}` and `{threshold}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    /// Metric to inspect.
    pub metric: Metric,
    /// Direction of the comparison.
    pub comparison: Comparison,
    /// Threshold value.
    pub threshold: f64,
    /// Rank of the recommendation (higher = listed first).
    #[serde(default)]
    pub priority: u8,
    /// Recommendation text.
    pub message: String,
}

impl RecommendationRule {
    /// Creates a rule.
    pub fn new(
        metric: Metric,
        comparison: Comparison,
        threshold: f64,
        priority: u8,
        message: impl Into<String>,
    ) -> Self {
        Self {
            metric,
            comparison,
            threshold,
            priority,
            message: message.into(),
        }
    }

    fn render(&self, value: f64) -> String {
        self.message
            .replace("{value}", &format_number(value))
            .replace("{threshold}", &format_number(self.threshold))
    }
}

/// Metric values a table is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecommendationInputs {
    /// Line efficiency (%).
    pub line_efficiency: f64,
    /// Mean station utilization (%).
    pub avg_utilization: f64,
    /// Lowest station utilization (%).
    pub min_utilization: f64,
    /// Highest station utilization (%).
    pub max_utilization: f64,
    /// Stations above the theoretical minimum.
    pub excess_stations: usize,
    /// Smoothness index.
    pub smoothness_index: f64,
}

impl RecommendationInputs {
    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::LineEfficiency => self.line_efficiency,
            Metric::AverageUtilization => self.avg_utilization,
            Metric::MinUtilization => self.min_utilization,
            Metric::MaxUtilization => self.max_utilization,
            Metric::UtilizationSpread => self.max_utilization - self.min_utilization,
            Metric::ExcessStations => self.excess_stations as f64,
            Metric::SmoothnessIndex => self.smoothness_index,
        }
    }
}

/// Ordered set of recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationTable {
    /// Rules, in table order.
    pub rules: Vec<RecommendationRule>,
    /// Returned alone when no rule fires.
    pub satisfied_message: String,
}

impl Default for RecommendationTable {
    fn default() -> Self {
        Self {
            rules: vec![
                RecommendationRule::new(
                    Metric::MaxUtilization,
                    Comparison::Above,
                    95.0,
                    90,
                    "Bottleneck risk: the busiest station runs at {value}% utilization; \
                     redistribute its tasks or relax the cycle time",
                ),
                RecommendationRule::new(
                    Metric::LineEfficiency,
                    Comparison::Below,
                    70.0,
                    80,
                    "Line efficiency is {value}%; rebalance the line",
                ),
                RecommendationRule::new(
                    Metric::UtilizationSpread,
                    Comparison::Above,
                    20.0,
                    70,
                    "Significant imbalance of {value} points between stations; \
                     review the task distribution",
                ),
                RecommendationRule::new(
                    Metric::MinUtilization,
                    Comparison::Below,
                    50.0,
                    60,
                    "The least loaded station runs at {value}% utilization; consolidate tasks",
                ),
                RecommendationRule::new(
                    Metric::AverageUtilization,
                    Comparison::Below,
                    80.0,
                    50,
                    "Average utilization is {value}%; consider reducing the number of stations",
                ),
                RecommendationRule::new(
                    Metric::ExcessStations,
                    Comparison::Above,
                    2.0,
                    40,
                    "Station count is {value} above the theoretical minimum",
                ),
            ],
            satisfied_message: "Current balance is satisfactory".to_string(),
        }
    }
}

impl RecommendationTable {
    /// Creates a table with no rules.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            satisfied_message: RecommendationTable::default().satisfied_message,
        }
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: RecommendationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Checks that every threshold is finite and every message non-empty.
    pub fn validate(&self) -> Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            if !rule.threshold.is_finite() {
                return Err(BalanceError::Configuration(format!(
                    "recommendation rule {i} has a non-finite threshold"
                )));
            }
            if rule.message.trim().is_empty() {
                return Err(BalanceError::Configuration(format!(
                    "recommendation rule {i} has an empty message"
                )));
            }
        }
        Ok(())
    }

    /// Returns the messages of all fired rules, highest priority first.
    ///
    /// Falls back to `satisfied_message` when nothing fires.
    pub fn evaluate(&self, inputs: &RecommendationInputs) -> Vec<String> {
        let mut fired: Vec<(&RecommendationRule, f64)> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let value = inputs.value(rule.metric);
                rule.comparison
                    .holds(value, rule.threshold)
                    .then_some((rule, value))
            })
            .collect();

        // Stable: equal priorities keep table order.
        fired.sort_by(|a, b| b.0.priority.cmp(&a.0.priority));

        if fired.is_empty() {
            return vec![self.satisfied_message.clone()];
        }
        fired
            .into_iter()
            .map(|(rule, value)| rule.render(value))
            .collect()
    }
}

/// Integers print without decimals, everything else with one.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}
