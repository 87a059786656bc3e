//! Ranked task order.
//!
//! Tasks are ranked by a fully deterministic total order:
//! 1. Positional weight, descending
//! 2. Number of direct predecessors, ascending
//! 3. Task ID, ascending (lexicographic)
//!
//! Weights are compared exactly with [`f64::total_cmp`]; they are computed
//! deterministically from the same durations on every run, so equal inputs
//! always produce bit-identical weights.

use serde::Serialize;
use std::cmp::Ordering;

use super::PositionalWeights;
use crate::models::TaskGraph;

/// A task as seen by the station assigner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTask {
    /// Task ID.
    pub id: String,
    /// Task duration.
    pub duration: f64,
    /// Positional weight.
    pub weight: f64,
    /// Direct predecessor IDs (sorted).
    pub predecessors: Vec<String>,
}

impl RankedTask {
    /// Number of direct predecessors.
    pub fn predecessor_count(&self) -> usize {
        self.predecessors.len()
    }
}

/// Compares two tasks by rank (`Less` = assigned first).
pub fn compare_rank(a: &RankedTask, b: &RankedTask) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.predecessor_count().cmp(&b.predecessor_count()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranks every task of the graph.
///
/// Tasks without a computed weight rank with weight 0.
pub fn rank_tasks(graph: &TaskGraph, weights: &PositionalWeights) -> Vec<RankedTask> {
    let mut ranked: Vec<RankedTask> = graph
        .tasks()
        .map(|task| RankedTask {
            id: task.id().to_string(),
            duration: task.duration(),
            weight: weights.get(task.id()).unwrap_or(0.0),
            predecessors: task.predecessors().iter().cloned().collect(),
        })
        .collect();

    ranked.sort_by(compare_rank);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskSpec;

    fn ranked(id: &str, weight: f64, preds: &[&str]) -> RankedTask {
        RankedTask {
            id: id.to_string(),
            duration: 1.0,
            weight,
            predecessors: preds.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_weight_descending() {
        let a = ranked("A", 6.0, &[]);
        let b = ranked("B", 4.0, &[]);
        assert_eq!(compare_rank(&a, &b), Ordering::Less);
        assert_eq!(compare_rank(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_tie_broken_by_predecessor_count() {
        let b = ranked("B", 4.0, &[]);
        let c = ranked("C", 4.0, &["A"]);
        assert_eq!(compare_rank(&b, &c), Ordering::Less);
        // Fewer predecessors wins even against a smaller ID
        let a = ranked("A", 4.0, &["X", "Y"]);
        assert_eq!(compare_rank(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_tie_broken_by_id() {
        let x = ranked("X1", 3.0, &["P"]);
        let y = ranked("X2", 3.0, &["Q"]);
        assert_eq!(compare_rank(&x, &y), Ordering::Less);
        assert_eq!(compare_rank(&x, &x), Ordering::Equal);
    }

    #[test]
    fn test_rank_sample_line() {
        let mut graph = TaskGraph::new();
        graph
            .extend_tasks([
                TaskSpec::new("A", "a", 2.0),
                TaskSpec::new("B", "b", 1.0),
                TaskSpec::new("C", "c", 3.0).with_predecessor("A"),
                TaskSpec::new("D", "d", 2.0).with_predecessor("B"),
                TaskSpec::new("E", "e", 1.0).with_predecessors(["C", "D"]),
            ])
            .unwrap();
        let weights = PositionalWeights::compute(&graph);

        let order: Vec<String> = rank_tasks(&graph, &weights)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(order, vec!["A", "B", "C", "D", "E"]);
    }
}
