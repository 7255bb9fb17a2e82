//! Testes de integração para o cálculo de scores e o otimizador.

use metalca::optimizer::ScoreOptimizer;
use metalca::scoring::{circular_bonus, ScoreCalculator, StageAnalyzer};
use metalca::types::config::CacheConfig;
use metalca::types::requests::{OverallData, ProjectSubmission, Stage};
use metalca::types::responses::Priority;

fn example_stages() -> Vec<Stage> {
    vec![
        Stage::new("Mining", 25.0, 2.5, 8.0),
        Stage::new("Smelting", 35.0, 4.2, 1.5),
    ]
}

fn example_overall() -> OverallData {
    OverallData::new(25.0, 10.0, 65.0)
}

#[test]
fn test_example_project() {
    let result = ScoreCalculator::calculate(&example_stages(), &example_overall());

    assert!((result.totals.energy - 60.0).abs() < 1e-9);
    assert!((result.totals.water - 6.7).abs() < 1e-9);
    assert!((result.totals.waste - 9.5).abs() < 1e-9);
    assert_eq!(result.sustainability_score, 72);
    assert_eq!(result.linear_score, 66);
    assert_eq!(result.circular_score, 87);
}

#[test]
fn test_scores_always_in_range() {
    let magnitudes = [0.0, 0.5, 10.0, 75.0, 300.0, 1e9];
    let percentages = [-50.0, 0.0, 12.5, 50.0, 100.0, 250.0];

    for &energy in &magnitudes {
        for &pct in &percentages {
            let stages = vec![Stage::new("S", energy, energy / 2.0, energy / 3.0).with_co2(energy)];
            let overall = OverallData::new(pct, 100.0 - pct, pct / 2.0);

            let result = ScoreCalculator::calculate(&stages, &overall);
            assert!(result.sustainability_score <= 100);
            assert!(result.circular_score <= 100);
            assert!(result.linear_score <= 100);
        }
    }
}

#[test]
fn test_circular_never_below_sustainability_for_nonnegative_mix() {
    for reuse in [0.0, 5.0, 33.0, 100.0] {
        for recycle in [0.0, 7.0, 45.0, 100.0] {
            let overall = OverallData::new(recycle, reuse, 0.0);
            let result = ScoreCalculator::calculate(&example_stages(), &overall);

            assert!(result.circular_score >= result.sustainability_score);
            assert!(circular_bonus(reuse, recycle) >= 0.0);
        }
    }
}

#[test]
fn test_reported_gains_differ_from_applied_bonus() {
    let result = ScoreCalculator::calculate(&example_stages(), &example_overall());
    let gains = result.optimization_gains;

    let reported = gains.recycling_impact + gains.reuse_impact;
    let applied = circular_bonus(10.0, 25.0);
    assert!((applied - 14.0875).abs() < 1e-9);
    assert!((reported - 9.5).abs() < 1e-9);
}

#[test]
fn test_stage_priorities_follow_efficiency() {
    let stages = vec![
        Stage::new("Clean", 0.0, 0.0, 0.0).with_efficiency(100.0),
        Stage::new("Heavy", 60.0, 0.0, 0.0).with_transport(2000.0),
    ];

    let analyses = StageAnalyzer::analyze_all(&stages);

    // 40 + 30 + 20
    assert_eq!(analyses[0].efficiency, 90.0);
    assert_eq!(analyses[0].optimization_potential.priority, Priority::Low);
    // Só a base: 75·0.4
    assert_eq!(analyses[1].efficiency, 30.0);
    assert_eq!(analyses[1].optimization_potential.priority, Priority::High);
}

#[test]
fn test_optimizer_matches_calculator() {
    let optimizer = ScoreOptimizer::new(&CacheConfig::default());

    for _ in 0..3 {
        let cached = optimizer.calculate_scores(&example_stages(), &example_overall());
        let direct = ScoreCalculator::calculate(&example_stages(), &example_overall());
        assert_eq!(cached, direct);
    }

    let stats = optimizer.cache_stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_analysis_record() {
    let optimizer = ScoreOptimizer::new(&CacheConfig::default());
    let submission =
        ProjectSubmission::new(example_stages(), example_overall()).with_name("Foundry A");

    let first = optimizer.analyze_project(&submission);
    let second = optimizer.analyze_project(&submission);

    assert_ne!(first.id, second.id);
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.stages, second.stages);

    let value = serde_json::to_value(&first).unwrap();
    assert!(value["createdAt"].is_string());
    assert_eq!(value["stages"][0]["improvements"]["strategies"][0], "efficiency");
}
