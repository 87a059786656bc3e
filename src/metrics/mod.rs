//! Line balance metrics and improvement recommendations.
//!
//! - [`LineMetrics`]: efficiency, throughput, per-station and quality
//!   figures of a balanced line.
//! - [`RecommendationTable`]: threshold rules turning those figures into
//!   ranked improvement suggestions.

mod kpi;
mod recommendations;

pub use kpi::{
    EfficiencyMetrics, LineMetrics, ProductionMetrics, QualityIndicators, QualityThresholds,
    StationMetrics,
};
pub use recommendations::{
    Comparison, Metric, RecommendationInputs, RecommendationRule, RecommendationTable,
};
