//! Positional weight computation.
//!
//! `weight(t) = duration(t) + Σ weight(s)` over the direct successors `s`
//! of `t`. A task deep in the precedence graph therefore weighs little,
//! and a task that gates much downstream work weighs a lot.
//!
//! # Algorithm
//! Memoized post-order traversal with an explicit stack. Each task gets a
//! slot holding its weight plus a separate `computed` flag, so the
//! memo never relies on a sentinel weight value. Every task is expanded
//! once, so the traversal is O(n + e) and does not recurse.
//!
//! # Reference
//! Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//! Positional Weight Technique", Journal of Industrial Engineering 12(6)

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::models::TaskGraph;

#[derive(Debug, Clone, Copy, Default)]
struct WeightSlot {
    weight: f64,
    computed: bool,
}

/// Positional weights for every task of a graph.
///
/// Built fresh on each call to [`compute`](Self::compute); nothing carries
/// over between runs.
#[derive(Debug, Clone, Default)]
pub struct PositionalWeights {
    slots: BTreeMap<String, WeightSlot>,
}

impl PositionalWeights {
    /// Computes the positional weight of every task.
    ///
    /// Only meaningful on an acyclic graph. On a cyclic graph the traversal
    /// still terminates, but weights along the cycle are incomplete.
    pub fn compute(graph: &TaskGraph) -> Self {
        let mut slots: BTreeMap<String, WeightSlot> = graph
            .ids()
            .map(|id| (id.to_string(), WeightSlot::default()))
            .collect();
        let mut in_progress: HashSet<&str> = HashSet::new();

        for root in graph.ids() {
            // (task, successors already pushed)
            let mut stack: Vec<(&str, bool)> = vec![(root, false)];

            while let Some((id, expanded)) = stack.pop() {
                let Some(task) = graph.get(id) else {
                    continue;
                };

                if expanded {
                    let successor_sum: f64 = task
                        .successors()
                        .iter()
                        .map(|s| slots.get(s).map_or(0.0, |slot| slot.weight))
                        .sum();
                    let weight = task.duration() + successor_sum;
                    if let Some(slot) = slots.get_mut(id) {
                        slot.weight = weight;
                        slot.computed = true;
                    }
                    in_progress.remove(id);
                    trace!(task = id, weight, "positional weight computed");
                    continue;
                }

                let done = slots.get(id).is_some_and(|slot| slot.computed);
                if done || !in_progress.insert(id) {
                    continue;
                }

                stack.push((id, true));
                for succ in task.successors() {
                    if !slots.get(succ).is_some_and(|slot| slot.computed) {
                        stack.push((succ.as_str(), false));
                    }
                }
            }
        }

        Self { slots }
    }

    /// Weight of a task, if it was computed.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.slots
            .get(id)
            .filter(|slot| slot.computed)
            .map(|slot| slot.weight)
    }

    /// Iterates `(task_id, weight)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.computed)
            .map(|(id, slot)| (id.as_str(), slot.weight))
    }

    /// Number of computed weights.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.computed).count()
    }

    /// Whether no weight was computed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
