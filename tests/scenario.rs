//! End-to-end balancing of the reference line.

mod common;

use common::{init_tracing, sample_line};
use u_linebalance::balancing::StationOrder;
use u_linebalance::{BalanceConfig, BalanceError, ProductionLine, TaskSpec};

#[test]
fn test_reference_line_stations() {
    init_tracing();
    let mut line = sample_line();
    let result = line.balance(10, 60.0).unwrap();

    assert!((line.cycle_time() - 6.0).abs() < 1e-10);
    assert_eq!(line.min_stations(), 2);

    let s1 = &result.stations[0];
    let s2 = &result.stations[1];
    assert_eq!(s1.task_ids(), ["A", "B", "C"]);
    assert_eq!(s2.task_ids(), ["D", "E"]);
    assert!((s1.total_time() - 6.0).abs() < 1e-10);
    assert!((s2.total_time() - 3.0).abs() < 1e-10);
    assert!((s1.utilization() - 100.0).abs() < 1e-10);
    assert!((s2.utilization() - 50.0).abs() < 1e-10);
    assert!((s2.idle_time() - 3.0).abs() < 1e-10);

    assert_eq!(s1.to_string(), "Station 1: [A, B, C] (6.0)");
    assert_eq!(s2.to_string(), "Station 2: [D, E] (3.0)");
}

#[test]
fn test_reference_line_metrics() {
    init_tracing();
    let mut line = sample_line();
    let m = line.balance(10, 60.0).unwrap().metrics;

    assert_eq!(m.station_count, 2);
    assert!(m.is_optimal_count());
    assert!((m.efficiency.line_efficiency - 75.0).abs() < 1e-10);
    assert!((m.efficiency.smoothness_index - 2.1213).abs() < 1e-4);
    assert!((m.efficiency.avg_utilization - 75.0).abs() < 1e-10);
    assert!((m.efficiency.total_idle_time - 3.0).abs() < 1e-10);
    assert!((m.production.theoretical_throughput - 1.0 / 6.0).abs() < 1e-10);
    assert!((m.production.real_throughput - 1.0 / 6.0).abs() < 1e-10);
    assert!((m.production.daily_capacity - 10.0).abs() < 1e-10);
    assert!((m.production.max_daily_capacity - 10.0).abs() < 1e-10);

    assert!(!m.quality.perfect_balance);
    assert_eq!(m.quality.bottleneck_count, 1);
    assert!(m.stations[0].is_bottleneck);
    assert_eq!(m.quality.recommendations.len(), 3);
}

#[test]
fn test_rank_order_and_roots() {
    let mut line = sample_line();
    line.balance(10, 60.0).unwrap();

    let order: Vec<&str> = line.ranked_tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C", "D", "E"]);

    let roots: Vec<&str> = line
        .tasks_without_predecessors()
        .into_iter()
        .map(|t| t.id())
        .collect();
    assert_eq!(roots, vec!["A", "B"]);
}

#[test]
fn test_three_cycle_rejected_before_assignment() {
    init_tracing();
    let mut line = ProductionLine::new(10, 60.0).unwrap();
    line.extend_tasks([
        TaskSpec::new("A", "a", 1.0).with_predecessor("C"),
        TaskSpec::new("B", "b", 1.0).with_predecessor("A"),
        TaskSpec::new("C", "c", 1.0).with_predecessor("B"),
    ])
    .unwrap();

    assert!(line.validate().is_empty());
    assert!(line.detect_cycle());
    match line.balance(10, 60.0).unwrap_err() {
        BalanceError::Cycle { path } => assert_eq!(path, vec!["A", "B", "C", "A"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(line.stations().is_empty());
    assert!(line.metrics().is_none());
}

#[test]
fn test_cycle_after_success_keeps_stations() {
    let mut line = sample_line();
    let first = line.balance(10, 60.0).unwrap();

    line.extend_tasks([
        TaskSpec::new("X", "x", 1.0).with_predecessor("Y"),
        TaskSpec::new("Y", "y", 1.0).with_predecessor("X"),
    ])
    .unwrap();

    assert!(matches!(
        line.balance(10, 60.0),
        Err(BalanceError::Cycle { .. })
    ));
    assert_eq!(line.stations(), first.stations.as_slice());
}

#[test]
fn test_oversized_task_never_overloads_a_station() {
    let mut line = sample_line();
    line.add_task("F", "Cure paint", 7.0, &["E"]).unwrap();

    match line.balance(10, 60.0).unwrap_err() {
        BalanceError::Infeasible { stuck, oversized } => {
            assert_eq!(stuck, vec!["F"]);
            assert_eq!(oversized, vec!["F"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(line.stations().is_empty());
}

#[test]
fn test_config_from_toml() {
    let config = BalanceConfig::from_toml_str(
        r#"
        station_order = "permissive"

        [recommendations]
        rules = []
        satisfied_message = "Balance OK"
        "#,
    )
    .unwrap();
    assert_eq!(config.station_order, StationOrder::Permissive);

    let mut line = sample_line().with_config(config).unwrap();
    let result = line.balance(10, 60.0).unwrap();
    assert_eq!(result.stations.len(), 2);
    assert_eq!(result.metrics.quality.recommendations, vec!["Balance OK"]);
}

#[test]
fn test_result_serializes() {
    let mut line = sample_line();
    let result = line.balance(10, 60.0).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["stations"][0]["index"], 1);
    assert_eq!(json["stations"][1]["task_ids"][1], "E");
    assert_eq!(json["metrics"]["station_count"], 2);
    assert_eq!(json["metrics"]["efficiency"]["line_efficiency"], 75.0);
    assert!(json["metrics"]["quality"]["recommendations"].is_array());

    let graph = serde_json::to_value(line.graph()).unwrap();
    assert_eq!(graph["tasks"]["A"]["positional_weight"], 6.0);
}
