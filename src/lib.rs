//! Assembly line balancing with the Ranked Positional Weight heuristic.
//!
//! Groups precedence-constrained tasks into workstations so that no
//! station exceeds the cycle time implied by demand and available time,
//! then reports efficiency, throughput and quality metrics for the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TaskSpec`, `TaskGraph`, `Station`,
//!   `LineParameters`
//! - **`validation`**: Task field checks and reference errors
//! - **`balancing`**: Positional weights, rank order, greedy station assignment
//! - **`metrics`**: Line KPIs and threshold-based recommendations
//! - **`config`**: TOML-loadable balancing options
//! - **`line`**: `ProductionLine` facade running the whole pipeline
//!
//! # Logging
//!
//! Events are emitted through `tracing`. The crate never installs a
//! subscriber.
//!
//! # References
//!
//! - Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//!   Positional Weight Technique"
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines"
//! - Groover (2015), "Automation, Production Systems, and Computer-Integrated
//!   Manufacturing"

pub mod balancing;
pub mod config;
pub mod error;
pub mod line;
pub mod metrics;
pub mod models;
pub mod validation;

pub use config::BalanceConfig;
pub use error::{BalanceError, Result};
pub use line::{BalanceResult, ProductionLine};
pub use metrics::LineMetrics;
pub use models::{LineParameters, Station, Task, TaskGraph, TaskSpec};
