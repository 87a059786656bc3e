#![allow(dead_code)]

use std::sync::Once;

use rand::rngs::SmallRng;
use rand::Rng;
use tracing_subscriber::{fmt, EnvFilter};
use u_linebalance::{ProductionLine, TaskSpec};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs are captured per test and only shown for failures.
/// Enable levels with e.g. `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// The five-task reference line: A2, B1, C3[A], D2[B], E1[C, D].
pub fn sample_specs() -> Vec<TaskSpec> {
    vec![
        TaskSpec::new("A", "Mount frame", 2.0),
        TaskSpec::new("B", "Prepare wiring", 1.0),
        TaskSpec::new("C", "Fit motor", 3.0).with_predecessor("A"),
        TaskSpec::new("D", "Route cables", 2.0).with_predecessor("B"),
        TaskSpec::new("E", "Final test", 1.0).with_predecessors(["C", "D"]),
    ]
}

/// Sample line with demand 10 and available time 60 (cycle time 6).
pub fn sample_line() -> ProductionLine {
    let mut line = ProductionLine::new(10, 60.0).unwrap();
    line.extend_tasks(sample_specs()).unwrap();
    line
}

pub fn task_name(i: usize) -> String {
    format!("T{i}")
}

/// Builds a DAG where task `i` may only depend on tasks `0..i`.
///
/// `raw_deps[i]` holds arbitrary indices, reduced modulo `i`.
pub fn dag_specs(durations: &[f64], raw_deps: &[Vec<usize>]) -> Vec<TaskSpec> {
    durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| {
            let mut deps: Vec<usize> = if i == 0 {
                Vec::new()
            } else {
                raw_deps
                    .get(i)
                    .map(|d| d.iter().map(|x| x % i).collect())
                    .unwrap_or_default()
            };
            deps.sort_unstable();
            deps.dedup();
            TaskSpec::new(task_name(i), format!("step {i}"), duration)
                .with_predecessors(deps.into_iter().map(task_name))
        })
        .collect()
}

/// Random DAG with `n` tasks and durations that are multiples of 0.5.
pub fn random_dag(rng: &mut SmallRng, n: usize) -> Vec<TaskSpec> {
    let durations: Vec<f64> = (0..n)
        .map(|_| f64::from(rng.random_range(1..=12u32)) * 0.5)
        .collect();
    let raw_deps: Vec<Vec<usize>> = (0..n)
        .map(|_| {
            let count = rng.random_range(0..=3usize);
            (0..count).map(|_| rng.random_range(0..n.max(1))).collect()
        })
        .collect();
    dag_specs(&durations, &raw_deps)
}
