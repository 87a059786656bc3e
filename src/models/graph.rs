//! Precedence graph of line tasks.
//!
//! Tasks are keyed by ID in sorted order, so every traversal over the graph
//! is deterministic. Edges run predecessor → successor. Successor sets are
//! derived data: they are rebuilt from scratch over all tasks after every
//! insertion (O(n + e)), which is cheap for the tens to low hundreds of
//! tasks a single line carries. Use [`TaskGraph::extend_tasks`] to load a
//! whole line with a single rebuild.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (Depth-first search)

use serde::Serialize;
use std::collections::{btree_set, BTreeMap, HashSet};

use super::task::{Task, TaskSpec};
use crate::validation::{ReferenceError, ValidationError, ValidationErrorKind, ValidationResult};

/// Tasks and their precedence relationships.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskGraph {
    tasks: BTreeMap<String, Task>,
}

impl TaskGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task and rebuilds all successor sets.
    ///
    /// Predecessors that do not exist yet are accepted here and reported by
    /// [`validate`](Self::validate).
    ///
    /// # Errors
    /// All field problems of the task, or a duplicate ID.
    pub fn add_task(
        &mut self,
        id: &str,
        description: &str,
        duration: f64,
        predecessors: &[&str],
    ) -> ValidationResult {
        let spec = TaskSpec::new(id, description, duration)
            .with_predecessors(predecessors.iter().copied());
        self.add(spec)
    }

    /// Adds a task from a spec and rebuilds all successor sets.
    pub fn add(&mut self, spec: TaskSpec) -> ValidationResult {
        self.extend_tasks([spec])
    }

    /// Adds several tasks, rebuilding successor sets once at the end.
    ///
    /// All-or-nothing: if any spec is invalid (including IDs repeated within
    /// the batch) the graph is left unchanged and every problem is returned.
    pub fn extend_tasks<I>(&mut self, specs: I) -> ValidationResult
    where
        I: IntoIterator<Item = TaskSpec>,
    {
        let mut errors = Vec::new();
        let mut staged: Vec<Task> = Vec::new();
        let mut staged_ids = HashSet::new();

        for spec in specs {
            match spec.into_task() {
                Ok(task) => {
                    let id = task.id().to_string();
                    if self.tasks.contains_key(&id) || !staged_ids.insert(id) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DuplicateId,
                            format!("Duplicate task ID: {}", task.id()),
                        ));
                    } else {
                        staged.push(task);
                    }
                }
                Err(mut task_errors) => errors.append(&mut task_errors),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for task in staged {
            self.tasks.insert(task.id().to_string(), task);
        }
        self.rebuild_successors();
        Ok(())
    }

    /// Recomputes every successor set from the predecessor lists.
    ///
    /// Also invalidates all cached positional weights.
    fn rebuild_successors(&mut self) {
        let edges: Vec<(String, String)> = self
            .tasks
            .values()
            .flat_map(|task| {
                task.predecessors()
                    .iter()
                    .map(move |pred| (pred.clone(), task.id().to_string()))
            })
            .collect();

        for task in self.tasks.values_mut() {
            task.successors_mut().clear();
            task.set_positional_weight(None);
        }

        for (pred, succ) in edges {
            if let Some(task) = self.tasks.get_mut(&pred) {
                task.successors_mut().insert(succ);
            }
        }
    }

    /// Returns every predecessor reference that does not resolve.
    ///
    /// Ordered by task ID, then by missing ID.
    pub fn validate(&self) -> Vec<ReferenceError> {
        let tasks = &self.tasks;
        tasks
            .values()
            .flat_map(move |task| {
                task.predecessors()
                    .iter()
                    .filter(move |pred| !tasks.contains_key(pred.as_str()))
                    .map(move |pred| ReferenceError::new(task.id(), pred.clone()))
            })
            .collect()
    }

    /// Whether the precedence graph contains a cycle.
    pub fn detect_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Finds a precedence cycle, if any.
    ///
    /// # Algorithm
    /// Iterative depth-first search over the successor adjacency with a
    /// `visited` set and an `on_stack` set. Reaching a node that is still on
    /// the stack is a back edge. An explicit stack replaces recursion, so
    /// depth is bounded by heap memory rather than the thread stack.
    ///
    /// # Returns
    /// The task IDs along the cycle with the first ID repeated at the end,
    /// e.g. `["A", "B", "C", "A"]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut on_stack: HashSet<&str> = HashSet::new();

        for (root, root_task) in &self.tasks {
            if !visited.insert(root.as_str()) {
                continue;
            }
            on_stack.insert(root.as_str());
            let mut stack: Vec<(&str, btree_set::Iter<'_, String>)> =
                vec![(root.as_str(), root_task.successors().iter())];

            loop {
                let next = match stack.last_mut() {
                    Some((_, successors)) => successors.next(),
                    None => break,
                };

                match next {
                    Some(next) => {
                        let next = next.as_str();
                        if on_stack.contains(next) {
                            let start = stack
                                .iter()
                                .position(|(node, _)| *node == next)
                                .unwrap_or(0);
                            let mut path: Vec<String> = stack[start..]
                                .iter()
                                .map(|(node, _)| node.to_string())
                                .collect();
                            path.push(next.to_string());
                            return Some(path);
                        }
                        if visited.insert(next) {
                            if let Some(task) = self.tasks.get(next) {
                                on_stack.insert(next);
                                stack.push((next, task.successors().iter()));
                            }
                        }
                    }
                    None => {
                        if let Some((node, _)) = stack.pop() {
                            on_stack.remove(node);
                        }
                    }
                }
            }
        }

        None
    }

    /// Looks up a task.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Whether a task with this ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    /// Iterates tasks in ID order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Iterates task IDs in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of all task durations.
    pub fn total_duration(&self) -> f64 {
        self.tasks.values().map(Task::duration).sum()
    }

    /// Tasks with no predecessors, in ID order.
    pub fn roots(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(|t| !t.has_predecessors())
    }

    pub(crate) fn clear_weights(&mut self) {
        for task in self.tasks.values_mut() {
            task.set_positional_weight(None);
        }
    }

    pub(crate) fn set_weight(&mut self, id: &str, weight: f64) {
        if let Some(task) = self.tasks.get_mut(id) {
            task.set_positional_weight(Some(weight));
        }
    }
}
