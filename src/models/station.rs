//! Workstation model.
//!
//! A station receives tasks in assignment order until its accumulated
//! duration reaches the line's cycle time.

use serde::Serialize;
use std::fmt;

/// A workstation produced by one balancing run.
///
/// Stations are created fresh for every run and never carried over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    index: usize,
    task_ids: Vec<String>,
    total_time: f64,
    capacity: f64,
}

impl Station {
    /// Creates an empty station with the given 1-based index and capacity.
    pub(crate) fn new(index: usize, capacity: f64) -> Self {
        Self {
            index,
            task_ids: Vec::new(),
            total_time: 0.0,
            capacity,
        }
    }

    /// 1-based station number, in creation order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Assigned task IDs in assignment order.
    pub fn task_ids(&self) -> &[String] {
        &self.task_ids
    }

    /// Sum of assigned task durations.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Time budget of the station (the line's cycle time).
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Number of assigned tasks.
    pub fn task_count(&self) -> usize {
        self.task_ids.len()
    }

    /// Whether the task is assigned here.
    pub fn contains(&self, task_id: &str) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }

    /// Time still available before the capacity is reached.
    pub fn remaining_time(&self) -> f64 {
        self.capacity - self.total_time
    }

    /// Used time as a percentage of capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.total_time / self.capacity * 100.0
    }

    /// Unused time, never negative.
    pub fn idle_time(&self) -> f64 {
        (self.capacity - self.total_time).max(0.0)
    }

    /// Whether a task of `duration` fits in the remaining time.
    pub fn fits(&self, duration: f64, tolerance: f64) -> bool {
        self.remaining_time() + tolerance >= duration
    }

    pub(crate) fn push(&mut self, task_id: impl Into<String>, duration: f64) {
        self.task_ids.push(task_id.into());
        self.total_time += duration;
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Station {}: [{}] ({:.1})",
            self.index,
            self.task_ids.join(", "),
            self.total_time
        )
    }
}
