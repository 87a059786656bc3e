//! Line balance metrics (KPIs).
//!
//! Computes standard line balancing indicators from the stations of a
//! completed balancing run and the line parameters.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Utilization | station total / cycle time × 100 |
//! | Idle time | max(0, cycle time − station total) |
//! | Line efficiency | Σ station totals / (stations × cycle time) × 100 |
//! | Smoothness index | sqrt(Σ (station total − cycle time)² / stations) |
//! | Theoretical throughput | 1 / cycle time |
//! | Real throughput | 1 / max station total |
//! | Daily capacity | real throughput × available time |
//! | Capacity utilization | min(100, demand / daily capacity × 100) |
//!
//! # Reference
//! Groover (2015), "Automation, Production Systems, and Computer-Integrated
//! Manufacturing", Ch. 15: Manual Assembly Lines

use serde::{Deserialize, Serialize};

use super::{RecommendationInputs, RecommendationTable};
use crate::error::{BalanceError, Result};
use crate::models::{LineParameters, Station};

/// Two station totals closer than this are treated as equal.
const TIME_EPSILON: f64 = 1e-9;

/// Utilization thresholds for the quality indicators (%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Every station at or above this → perfect balance.
    pub perfect_balance_utilization: f64,
    /// Stations at or above this count as bottlenecks.
    pub bottleneck_utilization: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            perfect_balance_utilization: 95.0,
            bottleneck_utilization: 98.0,
        }
    }
}

impl QualityThresholds {
    /// Checks that both thresholds are finite percentages.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("perfect_balance_utilization", self.perfect_balance_utilization),
            ("bottleneck_utilization", self.bottleneck_utilization),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BalanceError::Configuration(format!(
                    "quality threshold {name} must be a non-negative percentage (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// Line-level efficiency figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EfficiencyMetrics {
    /// Line efficiency (%).
    pub line_efficiency: f64,
    /// Mean station utilization (%).
    pub avg_utilization: f64,
    /// Lowest station utilization (%).
    pub min_utilization: f64,
    /// Highest station utilization (%).
    pub max_utilization: f64,
    /// `max_utilization - min_utilization` (percentage points).
    pub imbalance: f64,
    /// Sum of station idle times.
    pub total_idle_time: f64,
    /// Idle time as a share of `stations × cycle time` (%).
    pub idle_percent: f64,
    /// Root-mean-square deviation of station totals from the cycle time.
    pub smoothness_index: f64,
}

/// Output rate and capacity figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductionMetrics {
    /// Units per time unit if every station ran at the cycle time.
    pub theoretical_throughput: f64,
    /// Units per time unit, paced by the slowest station.
    pub real_throughput: f64,
    /// Units per period at the real throughput.
    pub daily_capacity: f64,
    /// Units per period at the theoretical throughput.
    pub max_daily_capacity: f64,
    /// Demand as a share of daily capacity, capped at 100 (%).
    pub capacity_utilization: f64,
    /// Time between finished units (slowest station total).
    pub time_per_unit: f64,
}

/// Per-station figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMetrics {
    /// 1-based station number.
    pub index: usize,
    /// Assigned task IDs in assignment order.
    pub task_ids: Vec<String>,
    /// Number of assigned tasks.
    pub task_count: usize,
    /// Sum of assigned durations.
    pub total_time: f64,
    /// Station capacity (cycle time).
    pub capacity: f64,
    /// Utilization (%).
    pub utilization: f64,
    /// Idle time.
    pub idle_time: f64,
    /// Whether this station has the largest total on the line.
    pub is_bottleneck: bool,
}

/// Qualitative view of the balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityIndicators {
    /// Every station at or above the perfect-balance utilization.
    pub perfect_balance: bool,
    /// Stations at or above the bottleneck utilization.
    pub bottleneck_count: usize,
    /// `max(0, 100 - variance(utilizations))`; 100 for a single station.
    pub smoothing_factor: f64,
    /// `min utilization / max utilization × 100`.
    pub distribution_index: f64,
    /// Improvement suggestions, most important first.
    pub recommendations: Vec<String>,
}

/// Complete statistics of a balanced line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineMetrics {
    /// Number of stations.
    pub station_count: usize,
    /// Theoretical minimum number of stations.
    pub min_stations: usize,
    /// Cycle time.
    pub cycle_time: f64,
    /// Sum of all assigned task durations.
    pub total_task_time: f64,
    /// Units required per period.
    pub demand: u32,
    /// Available time per period.
    pub available_time: f64,
    /// Efficiency figures.
    pub efficiency: EfficiencyMetrics,
    /// Throughput and capacity figures.
    pub production: ProductionMetrics,
    /// Per-station figures, in station order.
    pub stations: Vec<StationMetrics>,
    /// Quality indicators and recommendations.
    pub quality: QualityIndicators,
}

impl LineMetrics {
    /// Computes metrics for a set of stations.
    ///
    /// # Arguments
    /// * `stations` - Stations of a completed balancing run.
    /// * `params` - Demand and available time of the line.
    /// * `thresholds` - Utilization thresholds for the quality indicators.
    /// * `table` - Recommendation rules.
    pub fn calculate(
        stations: &[Station],
        params: &LineParameters,
        thresholds: &QualityThresholds,
        table: &RecommendationTable,
    ) -> Self {
        if stations.is_empty() {
            return Self::empty(params);
        }

        let cycle_time = params.cycle_time();
        let n = stations.len() as f64;
        let total_task_time: f64 = stations.iter().map(Station::total_time).sum();
        let min_stations = params.min_stations(total_task_time);

        let utilizations: Vec<f64> = stations.iter().map(Station::utilization).collect();
        let avg_utilization = utilizations.iter().sum::<f64>() / n;
        let min_utilization = utilizations.iter().copied().fold(f64::INFINITY, f64::min);
        let max_utilization = utilizations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let productive_time = n * cycle_time;
        let total_idle_time: f64 = stations.iter().map(Station::idle_time).sum();
        let squared_deviation: f64 = stations
            .iter()
            .map(|s| (s.total_time() - cycle_time).powi(2))
            .sum();

        let efficiency = EfficiencyMetrics {
            line_efficiency: total_task_time / productive_time * 100.0,
            avg_utilization,
            min_utilization,
            max_utilization,
            imbalance: max_utilization - min_utilization,
            total_idle_time,
            idle_percent: total_idle_time / productive_time * 100.0,
            smoothness_index: (squared_deviation / n).sqrt(),
        };

        let slowest = stations
            .iter()
            .map(Station::total_time)
            .fold(0.0, f64::max);
        let production = production_metrics(params, slowest);

        let station_metrics = stations
            .iter()
            .map(|s| StationMetrics {
                index: s.index(),
                task_ids: s.task_ids().to_vec(),
                task_count: s.task_count(),
                total_time: s.total_time(),
                capacity: s.capacity(),
                utilization: s.utilization(),
                idle_time: s.idle_time(),
                is_bottleneck: (s.total_time() - slowest).abs() <= TIME_EPSILON,
            })
            .collect();

        let inputs = RecommendationInputs {
            line_efficiency: efficiency.line_efficiency,
            avg_utilization,
            min_utilization,
            max_utilization,
            excess_stations: stations.len().saturating_sub(min_stations),
            smoothness_index: efficiency.smoothness_index,
        };
        let quality = quality_indicators(&utilizations, thresholds, table.evaluate(&inputs));

        Self {
            station_count: stations.len(),
            min_stations,
            cycle_time,
            total_task_time,
            demand: params.demand(),
            available_time: params.available_time(),
            efficiency,
            production,
            stations: station_metrics,
            quality,
        }
    }

    /// Metrics of a line with no stations.
    pub fn empty(params: &LineParameters) -> Self {
        Self {
            station_count: 0,
            min_stations: 0,
            cycle_time: params.cycle_time(),
            total_task_time: 0.0,
            demand: params.demand(),
            available_time: params.available_time(),
            efficiency: EfficiencyMetrics::default(),
            production: ProductionMetrics::default(),
            stations: Vec::new(),
            quality: QualityIndicators {
                recommendations: vec!["No stations have been assigned".to_string()],
                ..QualityIndicators::default()
            },
        }
    }

    /// Line efficiency (%).
    pub fn line_efficiency(&self) -> f64 {
        self.efficiency.line_efficiency
    }

    /// Real throughput (units per time unit).
    pub fn throughput(&self) -> f64 {
        self.production.real_throughput
    }

    /// Per-station utilization (%), in station order.
    pub fn utilizations(&self) -> Vec<f64> {
        self.stations.iter().map(|s| s.utilization).collect()
    }

    /// Whether the balance reaches the theoretical minimum station count.
    pub fn is_optimal_count(&self) -> bool {
        self.station_count == self.min_stations
    }
}

fn production_metrics(params: &LineParameters, slowest_station: f64) -> ProductionMetrics {
    let theoretical_throughput = 1.0 / params.cycle_time();
    let real_throughput = if slowest_station > 0.0 {
        1.0 / slowest_station
    } else {
        0.0
    };
    let daily_capacity = real_throughput * params.available_time();
    let capacity_utilization = if daily_capacity > 0.0 {
        (f64::from(params.demand()) / daily_capacity * 100.0).min(100.0)
    } else {
        0.0
    };

    ProductionMetrics {
        theoretical_throughput,
        real_throughput,
        daily_capacity,
        max_daily_capacity: theoretical_throughput * params.available_time(),
        capacity_utilization,
        time_per_unit: slowest_station,
    }
}

fn quality_indicators(
    utilizations: &[f64],
    thresholds: &QualityThresholds,
    recommendations: Vec<String>,
) -> QualityIndicators {
    let n = utilizations.len() as f64;
    let min = utilizations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = utilizations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let smoothing_factor = if utilizations.len() > 1 {
        let mean = utilizations.iter().sum::<f64>() / n;
        let variance = utilizations.iter().map(|u| (u - mean).powi(2)).sum::<f64>() / n;
        (100.0 - variance).max(0.0)
    } else {
        100.0
    };

    let distribution_index = if max > 0.0 { min / max * 100.0 } else { 100.0 };

    QualityIndicators {
        perfect_balance: utilizations
            .iter()
            .all(|&u| u >= thresholds.perfect_balance_utilization),
        bottleneck_count: utilizations
            .iter()
            .filter(|&&u| u >= thresholds.bottleneck_utilization)
            .count(),
        smoothing_factor,
        distribution_index,
        recommendations,
    }
}
