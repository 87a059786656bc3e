//! Ranked Positional Weight (RPW) line balancing.
//!
//! Provides the three stages of an RPW run over an acyclic [`TaskGraph`]:
//!
//! 1. [`PositionalWeights`]: each task's duration plus the weights of its
//!    successors.
//! 2. [`rank_tasks`]: deterministic rank order by weight.
//! 3. [`StationAssigner`]: greedy first-fit packing of ranked tasks into
//!    stations of capacity equal to the cycle time.
//!
//! RPW is a heuristic. It is not guaranteed to reach the theoretical
//! minimum station count, but is fast and deterministic.
//!
//! # References
//!
//! - Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//!   Positional Weight Technique"
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 4
//!
//! [`TaskGraph`]: crate::models::TaskGraph

mod assigner;
mod ranking;
mod weights;

pub use assigner::{StationAssigner, StationOrder, MAX_CAPACITY_TOLERANCE};
pub use ranking::{compare_rank, rank_tasks, RankedTask};
pub use weights::PositionalWeights;
