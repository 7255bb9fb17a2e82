//! Eficiência e potencial de melhoria por estágio.

use serde::{Deserialize, Serialize};

use crate::types::requests::Stage;
use crate::types::responses::{
    ImprovementEstimate, OptimizationPotential, Priority, StageAnalysis,
};

/// Eficiência base quando o estágio não informa uma.
pub const DEFAULT_BASE_EFFICIENCY: f64 = 75.0;

/// Teto de eficiência alcançável.
pub const EFFICIENCY_CEILING: f64 = 95.0;

/// Abaixo disso a prioridade é alta.
pub const HIGH_PRIORITY_BELOW: f64 = 60.0;

/// Abaixo disso a prioridade é média.
pub const MEDIUM_PRIORITY_BELOW: f64 = 80.0;

/// Piso da estimativa de redução de CO₂ (%).
pub const CO2_SAVING_FLOOR: f64 = 15.0;

/// Pontos percentuais de CO₂ por unidade de fração de energia reduzida.
pub const CO2_SAVING_PER_ENERGY_FRACTION: f64 = 60.0;

/// Métrica de recurso afetada por uma estratégia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Energy,
    Water,
    Waste,
}

/// Estratégia de melhoria.
///
/// Estratégias são alternativas: por métrica vale a maior redução entre
/// as aplicáveis, não a soma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Efficiency,
    Recycling,
    Transport,
    Process,
}

impl Strategy {
    /// Todas as estratégias, em ordem de avaliação.
    pub const ALL: [Strategy; 4] = [
        Strategy::Efficiency,
        Strategy::Recycling,
        Strategy::Transport,
        Strategy::Process,
    ];

    /// Nome da estratégia.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Efficiency => "efficiency",
            Strategy::Recycling => "recycling",
            Strategy::Transport => "transport",
            Strategy::Process => "process",
        }
    }

    /// Fração de redução fixa.
    pub fn reduction(&self) -> f64 {
        match self {
            Strategy::Efficiency => 0.15,
            Strategy::Recycling => 0.25,
            Strategy::Transport => 0.10,
            Strategy::Process => 0.20,
        }
    }

    /// Métricas que a estratégia reduz.
    pub fn affects(&self) -> &'static [Metric] {
        match self {
            Strategy::Efficiency => &[Metric::Energy, Metric::Water],
            Strategy::Recycling => &[Metric::Waste],
            Strategy::Transport => &[Metric::Energy],
            Strategy::Process => &[Metric::Energy, Metric::Water, Metric::Waste],
        }
    }

    /// Se a estratégia ainda tem margem no estágio.
    pub fn applies_to(&self, stage: &Stage, efficiency: f64) -> bool {
        match self {
            Strategy::Efficiency => efficiency < EFFICIENCY_CEILING,
            Strategy::Recycling => stage.recycling_percentage < 100.0,
            Strategy::Transport => stage.transport_distance > 0.0,
            Strategy::Process => stage.energy_usage > 0.0,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Analisador de estágios.
pub struct StageAnalyzer;

impl StageAnalyzer {
    /// Eficiência do estágio (limitada a 100).
    pub fn efficiency(stage: &Stage) -> f64 {
        let base = stage.efficiency.unwrap_or(DEFAULT_BASE_EFFICIENCY);
        let energy_factor = (100.0 - stage.energy_usage * 2.0).max(0.0);
        let transport_factor = (100.0 - stage.transport_distance / 10.0).max(0.0);
        let recycling_bonus = stage.recycling_percentage * 0.5;

        (base * 0.4 + energy_factor * 0.3 + transport_factor * 0.2 + recycling_bonus * 0.1)
            .min(100.0)
    }

    /// Potencial de otimização a partir da eficiência.
    pub fn optimization_potential(efficiency: f64) -> OptimizationPotential {
        let priority = if efficiency < HIGH_PRIORITY_BELOW {
            Priority::High
        } else if efficiency < MEDIUM_PRIORITY_BELOW {
            Priority::Medium
        } else {
            Priority::Low
        };

        OptimizationPotential {
            current: efficiency.round() as i32,
            potential: EFFICIENCY_CEILING as i32,
            improvement: (EFFICIENCY_CEILING - efficiency).round() as i32,
            priority,
        }
    }

    /// Estimativa de melhorias: melhor estratégia por métrica.
    pub fn improvements(stage: &Stage, efficiency: f64) -> ImprovementEstimate {
        let applicable: Vec<Strategy> = Strategy::ALL
            .into_iter()
            .filter(|s| s.applies_to(stage, efficiency))
            .collect();

        let best = |metric: Metric| -> f64 {
            applicable
                .iter()
                .filter(|s| s.affects().contains(&metric))
                .map(Strategy::reduction)
                .fold(0.0, f64::max)
        };

        let energy = best(Metric::Energy);
        let water = best(Metric::Water);
        let waste = best(Metric::Waste);

        // Mudança de comportamento: a versão anterior sorteava um valor em
        // [15, 30); aqui a estimativa é derivada da redução de energia
        // (15 + fração·60, no máximo 27) para ser reproduzível.
        let co2 = CO2_SAVING_FLOOR + energy * CO2_SAVING_PER_ENERGY_FRACTION;

        ImprovementEstimate {
            energy_saving: round2(energy * 100.0),
            water_saving: round2(water * 100.0),
            waste_saving: round2(waste * 100.0),
            co2_saving: round2(co2),
            energy_saved: round2(stage.energy_usage * energy),
            water_saved: round2(stage.water_usage * water),
            waste_saved: round2(stage.waste_generated * waste),
            strategies: applicable.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    /// Análise completa de um estágio.
    pub fn analyze(stage: &Stage) -> StageAnalysis {
        let efficiency = Self::efficiency(stage);

        StageAnalysis {
            name: stage.name.clone(),
            efficiency: round2(efficiency),
            optimization_potential: Self::optimization_potential(efficiency),
            improvements: Self::improvements(stage, efficiency),
        }
    }

    /// Analisa todos os estágios, preservando a ordem.
    pub fn analyze_all(stages: &[Stage]) -> Vec<StageAnalysis> {
        stages.iter().map(Self::analyze).collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_default_base() {
        // 75·0.4 + (100 − 20)·0.3 + (100 − 10)·0.2 + 25·0.1
        let stage = Stage::new("Mining", 10.0, 0.0, 0.0)
            .with_transport(100.0)
            .with_recycling(50.0);

        let eff = StageAnalyzer::efficiency(&stage);
        assert!((eff - 74.5).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_uses_supplied_base() {
        let stage = Stage::new("Refining", 0.0, 0.0, 0.0).with_efficiency(100.0);
        // 40 + 30 + 20 + 0
        assert!((StageAnalyzer::efficiency(&stage) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_capped_at_100() {
        let stage = Stage::new("Ideal", 0.0, 0.0, 0.0)
            .with_efficiency(200.0)
            .with_recycling(100.0);
        assert_eq!(StageAnalyzer::efficiency(&stage), 100.0);
    }

    #[test]
    fn test_factors_floor_at_zero() {
        let stage = Stage::new("Heavy", 500.0, 0.0, 0.0).with_transport(5000.0);
        // Só a base contribui
        assert!((StageAnalyzer::efficiency(&stage) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_priorities() {
        assert_eq!(StageAnalyzer::optimization_potential(59.9).priority, Priority::High);
        assert_eq!(StageAnalyzer::optimization_potential(60.0).priority, Priority::Medium);
        assert_eq!(StageAnalyzer::optimization_potential(79.9).priority, Priority::Medium);
        assert_eq!(StageAnalyzer::optimization_potential(80.0).priority, Priority::Low);
    }

    #[test]
    fn test_optimization_potential_values() {
        let potential = StageAnalyzer::optimization_potential(74.5);
        assert_eq!(potential.current, 75);
        assert_eq!(potential.potential, 95);
        assert_eq!(potential.improvement, 21);
    }

    #[test]
    fn test_improvements_take_maximum_not_sum() {
        let stage = Stage::new("Smelting", 30.0, 10.0, 20.0)
            .with_transport(200.0)
            .with_recycling(40.0);
        let eff = StageAnalyzer::efficiency(&stage);
        let estimate = StageAnalyzer::improvements(&stage, eff);

        assert_eq!(estimate.strategies.len(), 4);
        assert_eq!(estimate.energy_saving, 20.0);
        assert_eq!(estimate.water_saving, 20.0);
        assert_eq!(estimate.waste_saving, 25.0);
        assert_eq!(estimate.energy_saved, 6.0);
        assert_eq!(estimate.water_saved, 2.0);
        assert_eq!(estimate.waste_saved, 5.0);
    }

    #[test]
    fn test_improvements_without_process_lever() {
        let stage = Stage::new("Transport", 0.0, 3.0, 0.0)
            .with_transport(800.0)
            .with_recycling(100.0);
        let eff = StageAnalyzer::efficiency(&stage);
        let estimate = StageAnalyzer::improvements(&stage, eff);

        assert!(!estimate.strategies.contains(&"process".to_string()));
        assert!(!estimate.strategies.contains(&"recycling".to_string()));
        assert_eq!(estimate.energy_saving, 15.0);
        assert_eq!(estimate.water_saving, 15.0);
        assert_eq!(estimate.waste_saving, 0.0);
    }

    #[test]
    fn test_co2_saving_is_deterministic_and_in_range() {
        let stage = Stage::new("Smelting", 30.0, 10.0, 20.0);
        let eff = StageAnalyzer::efficiency(&stage);

        let a = StageAnalyzer::improvements(&stage, eff);
        let b = StageAnalyzer::improvements(&stage, eff);

        assert_eq!(a.co2_saving, b.co2_saving);
        assert!(a.co2_saving >= 15.0 && a.co2_saving < 30.0);
        assert_eq!(a.co2_saving, 27.0);
    }

    #[test]
    fn test_analyze_all_preserves_order() {
        let stages = vec![
            Stage::new("Mining", 25.0, 2.5, 8.0),
            Stage::new("Smelting", 35.0, 4.2, 1.5),
        ];
        let analyses = StageAnalyzer::analyze_all(&stages);

        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].name, "Mining");
        assert_eq!(analyses[1].name, "Smelting");
    }
}
