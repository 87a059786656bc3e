//! Task (work element) model.
//!
//! A task is an indivisible unit of assembly work with a fixed duration
//! and a set of tasks that must be performed before it.
//!
//! # Reference
//! Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 2

use serde::Serialize;
use std::collections::BTreeSet;

use crate::validation::{normalize_text, validate_task_fields, ValidationError};

/// Input record for a task, before it enters a [`TaskGraph`].
///
/// [`TaskGraph`]: super::TaskGraph
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Time required to perform the task (any consistent unit, e.g. minutes).
    pub duration: f64,
    /// IDs of tasks that must be performed before this one.
    pub predecessors: Vec<String>,
}

impl TaskSpec {
    /// Creates a task spec with no predecessors.
    pub fn new(id: impl Into<String>, description: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            duration,
            predecessors: Vec::new(),
        }
    }

    /// Adds a predecessor.
    pub fn with_predecessor(mut self, id: impl Into<String>) -> Self {
        self.predecessors.push(id.into());
        self
    }

    /// Adds several predecessors.
    pub fn with_predecessors<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Normalizes whitespace and checks every field.
    ///
    /// Returns the task on success, or all field errors.
    pub(crate) fn into_task(self) -> Result<Task, Vec<ValidationError>> {
        let id = self.id.trim().to_string();
        let description = normalize_text(&self.description);
        let predecessors: Vec<String> = self
            .predecessors
            .iter()
            .map(|p| p.trim().to_string())
            .collect();

        let errors = validate_task_fields(&id, &description, self.duration, &predecessors);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Task {
            id,
            description,
            duration: self.duration,
            predecessors: predecessors.into_iter().collect(),
            successors: BTreeSet::new(),
            positional_weight: None,
        })
    }
}

/// A task owned by a [`TaskGraph`].
///
/// Successors and the positional weight are derived data maintained by the
/// graph; they are not part of the task's input.
///
/// [`TaskGraph`]: super::TaskGraph
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: String,
    description: String,
    duration: f64,
    predecessors: BTreeSet<String>,
    successors: BTreeSet<String>,
    positional_weight: Option<f64>,
}

impl Task {
    /// Unique task identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Task duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Direct predecessors (sorted).
    pub fn predecessors(&self) -> &BTreeSet<String> {
        &self.predecessors
    }

    /// Direct successors (sorted). Rebuilt by the graph on every change.
    pub fn successors(&self) -> &BTreeSet<String> {
        &self.successors
    }

    /// Number of direct predecessors.
    pub fn predecessor_count(&self) -> usize {
        self.predecessors.len()
    }

    /// Whether the task must wait for at least one other task.
    pub fn has_predecessors(&self) -> bool {
        !self.predecessors.is_empty()
    }

    /// Positional weight from the last computation, if still valid.
    ///
    /// `None` after any change to the graph.
    pub fn positional_weight(&self) -> Option<f64> {
        self.positional_weight
    }

    pub(crate) fn successors_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.successors
    }

    pub(crate) fn set_positional_weight(&mut self, weight: Option<f64>) {
        self.positional_weight = weight;
    }
}
