//! Line balancing domain models.
//!
//! Provides the data types for a single-model assembly line: the tasks and
//! their precedence graph, the line's demand and time budget, and the
//! stations produced by a balancing run.
//!
//! # Domain Mappings
//!
//! | u-linebalance | Assembly | Fabrication | Packaging |
//! |---------------|----------|-------------|-----------|
//! | Task | Work element | Operation | Packing step |
//! | Station | Workstation | Cell | Pack station |
//! | Cycle time | Takt time | Cell pace | Line pace |

mod graph;
mod parameters;
mod station;
mod task;

pub use graph::TaskGraph;
pub use parameters::LineParameters;
pub use station::Station;
pub use task::{Task, TaskSpec};
