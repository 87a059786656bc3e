//! Greedy station assignment.
//!
//! # Algorithm
//!
//! 0. Reject the run up front if any task alone exceeds the cycle time.
//! 1. Walk the ranked tasks from the top.
//! 2. Skip a task while any of its predecessors is unassigned.
//! 3. Place it in the first existing station (creation order) with enough
//!    remaining time. Under [`StationOrder::Enforced`] the scan starts at
//!    the latest station holding one of its predecessors.
//! 4. If none fits, open a new station.
//! 5. After each placement restart from the top of the ranking, so newly
//!    released successors are considered in rank order.
//! 6. A full pass that places nothing is a failure: the remaining tasks
//!    are reported as [`BalanceError::Infeasible`].
//!
//! # Complexity
//! O(n² · s) in the worst case (n tasks, s stations): every placement
//! restarts a pass over the remaining tasks, and each placement scans the
//! stations. Fine for the tens to low hundreds of tasks of one line.
//!
//! # Reference
//! Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//! Positional Weight Technique"

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::RankedTask;
use crate::error::{BalanceError, Result};
use crate::models::Station;

/// Largest slack accepted on the capacity check.
pub const MAX_CAPACITY_TOLERANCE: f64 = 1e-6;

/// Whether a task may be placed in a station created before the station of
/// one of its predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationOrder {
    /// A task's station index is never lower than any predecessor's.
    #[default]
    Enforced,
    /// Only require predecessors to be assigned somewhere.
    Permissive,
}

/// Packs ranked tasks into stations of fixed capacity.
#[derive(Debug, Clone)]
pub struct StationAssigner {
    cycle_time: f64,
    station_order: StationOrder,
    tolerance: f64,
}

impl StationAssigner {
    /// Creates an assigner for stations of capacity `cycle_time`.
    pub fn new(cycle_time: f64) -> Self {
        Self {
            cycle_time,
            station_order: StationOrder::Enforced,
            tolerance: 1e-9,
        }
    }

    /// Sets the station ordering rule.
    pub fn with_station_order(mut self, station_order: StationOrder) -> Self {
        self.station_order = station_order;
        self
    }

    /// Sets the floating-point slack allowed on the capacity check.
    ///
    /// Clamped to `0..=`[`MAX_CAPACITY_TOLERANCE`]; NaN falls back to 0.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = if tolerance.is_nan() {
            0.0
        } else {
            tolerance.clamp(0.0, MAX_CAPACITY_TOLERANCE)
        };
        self
    }

    /// Assigns every task to a station.
    ///
    /// `ranked` must already be in rank order.
    ///
    /// # Errors
    /// [`BalanceError::Infeasible`] when a task exceeds the cycle time
    /// (checked before any station is opened), or when a full pass over
    /// the remaining tasks places nothing.
    pub fn assign(&self, ranked: &[RankedTask]) -> Result<Vec<Station>> {
        if let Some(err) = self.oversized(ranked) {
            return Err(err);
        }

        let mut stations: Vec<Station> = Vec::new();
        // task id → position in `stations`
        let mut station_of: HashMap<&str, usize> = HashMap::new();
        let mut pending: Vec<&RankedTask> = ranked.iter().collect();

        while !pending.is_empty() {
            let mut placed = None;

            for (pos, task) in pending.iter().enumerate() {
                if let Some(first_slot) = self.first_candidate(task, &station_of) {
                    placed = Some((pos, self.place(task, first_slot, &mut stations)));
                    break;
                }
            }

            let Some((pos, slot)) = placed else {
                return Err(self.stalled(&pending));
            };

            let task = pending.remove(pos);
            station_of.insert(task.id.as_str(), slot);
            debug!(
                task = %task.id,
                station = slot + 1,
                duration = task.duration,
                "task assigned"
            );
        }

        Ok(stations)
    }

    /// First station position the task may occupy, or `None` while a
    /// predecessor is still unassigned.
    fn first_candidate(
        &self,
        task: &RankedTask,
        station_of: &HashMap<&str, usize>,
    ) -> Option<usize> {
        let mut latest = 0;
        for pred in &task.predecessors {
            let slot = *station_of.get(pred.as_str())?;
            latest = latest.max(slot);
        }
        match self.station_order {
            StationOrder::Enforced => Some(latest),
            StationOrder::Permissive => Some(0),
        }
    }

    /// Places the task, opening a station if needed. Returns its position.
    fn place(&self, task: &RankedTask, first_slot: usize, stations: &mut Vec<Station>) -> usize {
        let start = first_slot.min(stations.len());
        if let Some(offset) = stations[start..]
            .iter()
            .position(|s| s.fits(task.duration, self.tolerance))
        {
            let slot = start + offset;
            stations[slot].push(task.id.as_str(), task.duration);
            return slot;
        }

        let mut station = Station::new(stations.len() + 1, self.cycle_time);
        station.push(task.id.as_str(), task.duration);
        stations.push(station);
        debug!(station = stations.len(), "opened station");
        stations.len() - 1
    }

    /// Oversized tasks and everything downstream of them, in rank order.
    fn oversized(&self, ranked: &[RankedTask]) -> Option<BalanceError> {
        let mut blocked: HashSet<&str> = ranked
            .iter()
            .filter(|t| self.is_oversized(t))
            .map(|t| t.id.as_str())
            .collect();
        if blocked.is_empty() {
            return None;
        }
        let oversized: Vec<String> = ranked
            .iter()
            .filter(|t| blocked.contains(t.id.as_str()))
            .map(|t| t.id.clone())
            .collect();

        loop {
            let before = blocked.len();
            for task in ranked {
                if task.predecessors.iter().any(|p| blocked.contains(p.as_str())) {
                    blocked.insert(task.id.as_str());
                }
            }
            if blocked.len() == before {
                break;
            }
        }

        Some(BalanceError::Infeasible {
            stuck: ranked
                .iter()
                .filter(|t| blocked.contains(t.id.as_str()))
                .map(|t| t.id.clone())
                .collect(),
            oversized,
        })
    }

    fn is_oversized(&self, task: &RankedTask) -> bool {
        task.duration > self.cycle_time + self.tolerance
    }

    /// Only reachable through predecessors that never get assigned.
    fn stalled(&self, pending: &[&RankedTask]) -> BalanceError {
        BalanceError::Infeasible {
            stuck: pending.iter().map(|t| t.id.clone()).collect(),
            oversized: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, duration: f64, weight: f64, preds: &[&str]) -> RankedTask {
        RankedTask {
            id: id.to_string(),
            duration,
            weight,
            predecessors: preds.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn ids(station: &Station) -> Vec<&str> {
        station.task_ids().iter().map(String::as_str).collect()
    }

    /// Sample line in rank order: A, B, C, D, E.
    fn sample_ranked() -> Vec<RankedTask> {
        vec![
            task("A", 2.0, 6.0, &[]),
            task("B", 1.0, 4.0, &[]),
            task("C", 3.0, 4.0, &["A"]),
            task("D", 2.0, 3.0, &["B"]),
            task("E", 1.0, 1.0, &["C", "D"]),
        ]
    }

    #[test]
    fn test_sample_assignment() {
        let stations = StationAssigner::new(6.0).assign(&sample_ranked()).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(ids(&stations[0]), vec!["A", "B", "C"]);
        assert_eq!(ids(&stations[1]), vec!["D", "E"]);
        assert_eq!(stations[0].index(), 1);
        assert_eq!(stations[1].index(), 2);
        assert!((stations[0].total_time() - 6.0).abs() < 1e-10);
        assert!((stations[1].total_time() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_waits_for_predecessor() {
        // Y outranks X but depends on it.
        let ranked = vec![task("Y", 1.0, 9.0, &["X"]), task("X", 1.0, 2.0, &[])];
        let stations = StationAssigner::new(5.0).assign(&ranked).unwrap();
        assert_eq!(ids(&stations[0]), vec!["X", "Y"]);
    }

    #[test]
    fn test_first_fit_backfills_earlier_station() {
        // P fills station 1 partially, Q forces station 2, R fits back in 1.
        let ranked = vec![
            task("P", 3.0, 10.0, &[]),
            task("Q", 4.0, 9.0, &[]),
            task("R", 2.0, 8.0, &[]),
        ];
        let stations = StationAssigner::new(5.0).assign(&ranked).unwrap();
        assert_eq!(ids(&stations[0]), vec!["P", "R"]);
        assert_eq!(ids(&stations[1]), vec!["Q"]);
    }

    #[test]
    fn test_enforced_order_keeps_successor_downstream() {
        // P(3) opens station 1, Q(4) opens station 2.
        // S(1) depends on Q: it fits in station 1 but must follow Q.
        let ranked = vec![
            task("P", 3.0, 10.0, &[]),
            task("Q", 4.0, 9.0, &[]),
            task("S", 1.0, 1.0, &["Q"]),
        ];
        let stations = StationAssigner::new(5.0).assign(&ranked).unwrap();
        assert_eq!(ids(&stations[0]), vec!["P"]);
        assert_eq!(ids(&stations[1]), vec!["Q", "S"]);
    }

    #[test]
    fn test_permissive_order_backfills_successor() {
        let ranked = vec![
            task("P", 3.0, 10.0, &[]),
            task("Q", 4.0, 9.0, &[]),
            task("S", 1.0, 1.0, &["Q"]),
        ];
        let stations = StationAssigner::new(5.0)
            .with_station_order(StationOrder::Permissive)
            .assign(&ranked)
            .unwrap();
        assert_eq!(ids(&stations[0]), vec!["P", "S"]);
        assert_eq!(ids(&stations[1]), vec!["Q"]);
    }

    #[test]
    fn test_oversized_task_is_infeasible() {
        // A alone would fit; the run is rejected before it is placed.
        let ranked = vec![task("A", 2.0, 9.0, &[]), task("BIG", 7.0, 7.0, &[])];
        let err = StationAssigner::new(6.0).assign(&ranked).unwrap_err();
        match err {
            BalanceError::Infeasible { stuck, oversized } => {
                assert_eq!(stuck, vec!["BIG"]);
                assert_eq!(oversized, vec!["BIG"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_successor_of_oversized_is_stuck() {
        let ranked = vec![task("BIG", 7.0, 8.0, &[]), task("T", 1.0, 1.0, &["BIG"])];
        let err = StationAssigner::new(6.0).assign(&ranked).unwrap_err();
        match err {
            BalanceError::Infeasible { stuck, oversized } => {
                assert_eq!(stuck, vec!["BIG", "T"]);
                assert_eq!(oversized, vec!["BIG"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_detected_with_tolerance() {
        let ranked = vec![
            task("C", 7.5, 7.5, &[]),
            task("A", 4.0, 4.0, &[]),
            task("B", 3.5, 3.5, &[]),
        ];
        let err = StationAssigner::new(6.0)
            .with_tolerance(2.0)
            .assign(&ranked)
            .unwrap_err();
        match err {
            BalanceError::Infeasible { stuck, oversized } => {
                assert_eq!(stuck, vec!["C"]);
                assert_eq!(oversized, vec!["C"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tolerance_is_clamped() {
        // 6 + 1e-6 slack: a 3.5 task never joins a 4.0 one.
        let ranked = vec![task("A", 4.0, 4.0, &[]), task("B", 3.5, 3.5, &[])];
        let stations = StationAssigner::new(6.0)
            .with_tolerance(2.0)
            .assign(&ranked)
            .unwrap();
        assert_eq!(stations.len(), 2);
        assert!(stations.iter().all(|s| s.total_time() <= 6.0 + MAX_CAPACITY_TOLERANCE));

        let stations = StationAssigner::new(6.0)
            .with_tolerance(f64::NAN)
            .assign(&ranked)
            .unwrap();
        assert_eq!(stations.len(), 2);
    }

    #[test]
    fn test_unresolvable_predecessor_stalls() {
        let ranked = vec![task("A", 1.0, 1.0, &["MISSING"])];
        let err = StationAssigner::new(6.0).assign(&ranked).unwrap_err();
        assert!(matches!(err, BalanceError::Infeasible { .. }));
    }

    #[test]
    fn test_task_equal_to_cycle_time() {
        let ranked = vec![task("A", 6.0, 12.0, &[]), task("B", 6.0, 6.0, &["A"])];
        let stations = StationAssigner::new(6.0).assign(&ranked).unwrap();
        assert_eq!(stations.len(), 2);
        assert!((stations[0].utilization() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_input() {
        let stations = StationAssigner::new(6.0).assign(&[]).unwrap();
        assert!(stations.is_empty());
    }
}
