//! Calculador dos scores de sustentabilidade, circular e linear.

use crate::types::requests::{OverallData, Stage};
use crate::types::responses::{OptimizationGains, ResourceTotals, ScoreResult};

use super::circular::circular_bonus;

/// Peso da energia total.
pub const ENERGY_WEIGHT: f64 = 0.4;

/// Peso da água total.
pub const WATER_WEIGHT: f64 = 0.25;

/// Peso dos resíduos totais.
pub const WASTE_WEIGHT: f64 = 0.2;

/// Peso do CO₂ total.
pub const CO2_WEIGHT: f64 = 0.15;

/// Penalidade por ponto percentual de aterro.
pub const LANDFILL_PENALTY: f64 = 0.1;

/// Fator informativo de impacto da reciclagem.
pub const RECYCLING_IMPACT_FACTOR: f64 = 0.3;

/// Fator informativo de impacto do reuso.
pub const REUSE_IMPACT_FACTOR: f64 = 0.2;

/// Calculador de scores.
///
/// Não falha para nenhuma entrada: os scores são sempre limitados a 0-100.
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Calcula os três scores, os totais e os ganhos informativos.
    pub fn calculate(stages: &[Stage], overall: &OverallData) -> ScoreResult {
        let totals = Self::totals(stages);

        let sustainability = Self::sustainability(&totals);
        let circular = Self::circular(
            sustainability,
            overall.reuse_percentage,
            overall.recycle_percentage,
        );
        let linear = Self::linear(sustainability, overall.landfill_percentage);

        let sustainability_score = round_score(sustainability);
        let circular_score = round_score(circular);
        let linear_score = round_score(linear);

        ScoreResult {
            sustainability_score,
            circular_score,
            linear_score,
            totals,
            optimization_gains: OptimizationGains {
                circular_gain: i32::from(circular_score) - i32::from(sustainability_score),
                recycling_impact: overall.recycle_percentage * RECYCLING_IMPACT_FACTOR,
                reuse_impact: overall.reuse_percentage * REUSE_IMPACT_FACTOR,
            },
        }
    }

    /// Soma energia, água, resíduos e CO₂ de todos os estágios.
    pub fn totals(stages: &[Stage]) -> ResourceTotals {
        stages
            .iter()
            .fold(ResourceTotals::default(), |acc, stage| ResourceTotals {
                energy: acc.energy + stage.energy_usage,
                water: acc.water + stage.water_usage,
                waste: acc.waste + stage.waste_generated,
                co2: acc.co2 + stage.co2_emissions,
            })
    }

    /// Score de sustentabilidade bruto (0-100, sem arredondar).
    pub fn sustainability(totals: &ResourceTotals) -> f64 {
        let impact = totals.energy * ENERGY_WEIGHT
            + totals.water * WATER_WEIGHT
            + totals.waste * WASTE_WEIGHT
            + totals.co2 * CO2_WEIGHT;

        clamp_score(100.0 - impact)
    }

    /// Score circular bruto: sustentabilidade + bônus da tabela circular.
    pub fn circular(sustainability: f64, reuse: f64, recycle: f64) -> f64 {
        clamp_score(sustainability + circular_bonus(reuse, recycle))
    }

    /// Score linear bruto: sustentabilidade − penalidade de aterro.
    pub fn linear(sustainability: f64, landfill: f64) -> f64 {
        clamp_score(sustainability - landfill * LANDFILL_PENALTY)
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn round_score(value: f64) -> u8 {
    // clamp_score garante 0..=100
    clamp_score(value).round() as u8
}
