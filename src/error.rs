//! Crate-wide error type.
//!
//! Field and reference problems are collected and reported as a batch;
//! cycles and stalled assignments fail fast.

use thiserror::Error;

use crate::validation::{ReferenceError, ValidationError};

/// Errors produced while building or balancing a production line.
#[derive(Error, Debug)]
pub enum BalanceError {
    /// One or more task fields are malformed (or the line has no tasks).
    #[error("invalid task data: {}", validation_summary(.0))]
    Validation(Vec<ValidationError>),

    /// Predecessor ids that do not resolve to an existing task.
    #[error("unresolved precedence references: {}", reference_summary(.0))]
    References(Vec<ReferenceError>),

    /// The precedence graph is not acyclic.
    #[error("precedence cycle detected: {}", .path.join(" -> "))]
    Cycle {
        /// Task ids along the cycle; the first id is repeated at the end.
        path: Vec<String>,
    },

    /// Non-positive demand or available time, or an unusable config value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A full assignment pass placed nothing.
    #[error(
        "could not assign tasks [{}]{}",
        .stuck.join(", "),
        oversized_suffix(.oversized)
    )]
    Infeasible {
        /// Tasks still unassigned when the pass stalled, in rank order.
        stuck: Vec<String>,
        /// Stuck tasks whose duration alone exceeds the cycle time.
        oversized: Vec<String>,
    },

    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, BalanceError>;

fn validation_summary(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn reference_summary(errors: &[ReferenceError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn oversized_suffix(oversized: &[String]) -> String {
    if oversized.is_empty() {
        "; check precedences and cycle time".to_string()
    } else {
        format!(
            "; duration exceeds cycle time for [{}]",
            oversized.join(", ")
        )
    }
}
