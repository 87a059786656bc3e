//! Production line facade.
//!
//! [`ProductionLine`] owns the task graph, the line parameters and the
//! result of the last successful balancing run.
//!
//! # Balancing pipeline
//!
//! 1. Validate demand and available time, derive the cycle time.
//! 2. Reject an empty line, unresolved references and precedence cycles.
//! 3. Recompute positional weights from scratch.
//! 4. Rank tasks and assign them to stations.
//! 5. Compute metrics.
//!
//! The line's stations, ranking and parameters are replaced only when every
//! step succeeds. A failed run leaves the previous result in place.
//!
//! # Example
//!
//! ```
//! use u_linebalance::ProductionLine;
//!
//! let mut line = ProductionLine::new(10, 60.0).unwrap();
//! line.add_task("A", "Mount frame", 2.0, &[]).unwrap();
//! line.add_task("B", "Prepare wiring", 1.0, &[]).unwrap();
//! line.add_task("C", "Fit motor", 3.0, &["A"]).unwrap();
//! line.add_task("D", "Route cables", 2.0, &["B"]).unwrap();
//! line.add_task("E", "Final test", 1.0, &["C", "D"]).unwrap();
//!
//! let result = line.balance(10, 60.0).unwrap();
//! assert_eq!(result.stations.len(), 2);
//! assert_eq!(result.stations[0].task_ids(), ["A", "B", "C"]);
//! assert!((result.metrics.line_efficiency() - 75.0).abs() < 1e-10);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::balancing::{rank_tasks, PositionalWeights, RankedTask, StationAssigner};
use crate::config::BalanceConfig;
use crate::error::{BalanceError, Result};
use crate::metrics::LineMetrics;
use crate::models::{LineParameters, Station, Task, TaskGraph, TaskSpec};
use crate::validation::{ReferenceError, ValidationError, ValidationErrorKind};

/// Stations and metrics of one balancing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResult {
    /// Stations in creation order.
    pub stations: Vec<Station>,
    /// Line metrics.
    pub metrics: LineMetrics,
}

impl BalanceResult {
    /// Task ID → 1-based station index.
    pub fn assignments(&self) -> BTreeMap<String, usize> {
        self.stations
            .iter()
            .flat_map(|s| s.task_ids().iter().map(move |id| (id.clone(), s.index())))
            .collect()
    }

    /// Station index of a task.
    pub fn station_of(&self, task_id: &str) -> Option<usize> {
        self.stations
            .iter()
            .find(|s| s.contains(task_id))
            .map(Station::index)
    }
}

/// A production line to balance.
#[derive(Debug, Clone)]
pub struct ProductionLine {
    graph: TaskGraph,
    params: LineParameters,
    config: BalanceConfig,
    stations: Vec<Station>,
    ranked: Vec<RankedTask>,
    metrics: Option<LineMetrics>,
}

impl ProductionLine {
    /// Creates an empty line.
    ///
    /// # Errors
    /// [`BalanceError::Configuration`] for zero demand or a non-positive
    /// available time.
    pub fn new(demand: u32, available_time: f64) -> Result<Self> {
        Ok(Self {
            graph: TaskGraph::new(),
            params: LineParameters::new(demand, available_time)?,
            config: BalanceConfig::default(),
            stations: Vec::new(),
            ranked: Vec::new(),
            metrics: None,
        })
    }

    /// Replaces the balancing configuration.
    ///
    /// # Errors
    /// [`BalanceError::Configuration`] if the config is out of range.
    pub fn with_config(mut self, config: BalanceConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Adds one task.
    ///
    /// Predecessors may be added later; unresolved references are reported
    /// by [`validate`](Self::validate) and rejected by
    /// [`balance`](Self::balance).
    ///
    /// # Errors
    /// [`BalanceError::Validation`] with every field problem of the task.
    pub fn add_task(
        &mut self,
        id: &str,
        description: &str,
        duration: f64,
        predecessors: &[&str],
    ) -> Result<()> {
        self.graph
            .add_task(id, description, duration, predecessors)
            .map_err(BalanceError::Validation)
    }

    /// Adds one task from a spec.
    pub fn add(&mut self, spec: TaskSpec) -> Result<()> {
        self.graph.add(spec).map_err(BalanceError::Validation)
    }

    /// Adds several tasks at once; nothing is added if any is invalid.
    pub fn extend_tasks<I>(&mut self, specs: I) -> Result<()>
    where
        I: IntoIterator<Item = TaskSpec>,
    {
        self.graph
            .extend_tasks(specs)
            .map_err(BalanceError::Validation)
    }

    /// Unresolved predecessor references.
    pub fn validate(&self) -> Vec<ReferenceError> {
        self.graph.validate()
    }

    /// Whether the precedence graph contains a cycle.
    pub fn detect_cycle(&self) -> bool {
        self.graph.detect_cycle()
    }

    /// Balances the line for the given demand and available time.
    ///
    /// # Errors
    /// - [`BalanceError::Configuration`]: invalid demand or available time
    /// - [`BalanceError::Validation`]: the line has no tasks
    /// - [`BalanceError::References`]: unresolved predecessors
    /// - [`BalanceError::Cycle`]: the precedence graph is cyclic
    /// - [`BalanceError::Infeasible`]: a task exceeds the cycle time, or
    ///   assignment stalled
    pub fn balance(&mut self, demand: u32, available_time: f64) -> Result<BalanceResult> {
        let params = LineParameters::new(demand, available_time)?;
        self.check_balanceable()?;

        info!(
            tasks = self.graph.len(),
            cycle_time = params.cycle_time(),
            "balancing line"
        );

        self.graph.clear_weights();
        let weights = PositionalWeights::compute(&self.graph);
        for (id, weight) in weights.iter() {
            self.graph.set_weight(id, weight);
        }
        let ranked = rank_tasks(&self.graph, &weights);

        let stations = StationAssigner::new(params.cycle_time())
            .with_station_order(self.config.station_order)
            .with_tolerance(self.config.capacity_tolerance)
            .assign(&ranked)
            .inspect_err(|e| warn!(error = %e, "balancing failed"))?;

        let metrics = LineMetrics::calculate(
            &stations,
            &params,
            &self.config.quality,
            &self.config.recommendations,
        );

        info!(
            stations = stations.len(),
            min_stations = metrics.min_stations,
            efficiency = metrics.line_efficiency(),
            "line balanced"
        );

        self.params = params;
        self.stations = stations.clone();
        self.ranked = ranked;
        self.metrics = Some(metrics.clone());

        Ok(BalanceResult { stations, metrics })
    }

    /// Balances with the line's current demand and available time.
    pub fn rebalance(&mut self) -> Result<BalanceResult> {
        let params = self.params;
        self.balance(params.demand(), params.available_time())
    }

    fn check_balanceable(&self) -> Result<()> {
        if self.graph.is_empty() {
            warn!("balancing rejected: line has no tasks");
            return Err(BalanceError::Validation(vec![ValidationError::new(
                ValidationErrorKind::EmptyLine,
                "The line has no tasks to balance",
            )]));
        }

        let references = self.graph.validate();
        if !references.is_empty() {
            warn!(count = references.len(), "balancing rejected: unresolved references");
            return Err(BalanceError::References(references));
        }

        if let Some(path) = self.graph.find_cycle() {
            warn!(cycle = %path.join(" -> "), "balancing rejected: precedence cycle");
            return Err(BalanceError::Cycle { path });
        }

        Ok(())
    }

    /// Cycle time of the current parameters.
    pub fn cycle_time(&self) -> f64 {
        self.params.cycle_time()
    }

    /// Theoretical minimum station count for the current tasks.
    pub fn min_stations(&self) -> usize {
        self.params.min_stations(self.graph.total_duration())
    }

    /// Current demand and available time.
    pub fn parameters(&self) -> &LineParameters {
        &self.params
    }

    /// Active configuration.
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Tasks that can start immediately, in ID order.
    pub fn tasks_without_predecessors(&self) -> Vec<&Task> {
        self.graph.roots().collect()
    }

    /// Rank order of the last successful run.
    pub fn ranked_tasks(&self) -> &[RankedTask] {
        &self.ranked
    }

    /// Stations of the last successful run.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Metrics of the last successful run.
    pub fn metrics(&self) -> Option<&LineMetrics> {
        self.metrics.as_ref()
    }

    /// Discards the result of the last run.
    pub fn clear_stations(&mut self) {
        self.stations.clear();
        self.ranked.clear();
        self.metrics = None;
    }

    /// The precedence graph.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }
}
