//! Simulação de cenários "e se" sobre um projeto.

use serde::{Deserialize, Serialize};

use crate::optimizer::ScoreOptimizer;
use crate::types::lenient;
use crate::types::requests::{OverallData, ProductionRoute, ProjectSubmission, Stage};
use crate::types::responses::{ResourceTotals, ScoreResult};

/// Ajustes de um cenário.
///
/// Reduções são percentuais (0-100) aplicadas a todos os estágios; os
/// percentuais de fim de vida e a rota, quando informados, substituem os
/// valores do projeto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAdjustments {
    /// Redução de energia (%).
    #[serde(default, deserialize_with = "lenient::number")]
    pub energy_reduction: f64,

    /// Redução de água (%).
    #[serde(default, deserialize_with = "lenient::number")]
    pub water_reduction: f64,

    /// Redução de resíduos (%).
    #[serde(default, deserialize_with = "lenient::number")]
    pub waste_reduction: f64,

    /// Redução de CO₂ (%).
    #[serde(default, deserialize_with = "lenient::number")]
    pub co2_reduction: f64,

    /// Novo percentual de reciclagem.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub recycle_percentage: Option<f64>,

    /// Novo percentual de reuso.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub reuse_percentage: Option<f64>,

    /// Novo percentual de aterro.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub landfill_percentage: Option<f64>,

    /// Nova rota de produção.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_route: Option<ProductionRoute>,
}

impl ScenarioAdjustments {
    /// Aplica as reduções a cada estágio.
    pub fn apply_to_stages(&self, stages: &[Stage]) -> Vec<Stage> {
        let energy = remaining_fraction(self.energy_reduction);
        let water = remaining_fraction(self.water_reduction);
        let waste = remaining_fraction(self.waste_reduction);
        let co2 = remaining_fraction(self.co2_reduction);

        stages
            .iter()
            .map(|stage| Stage {
                energy_usage: stage.energy_usage * energy,
                water_usage: stage.water_usage * water,
                waste_generated: stage.waste_generated * waste,
                co2_emissions: stage.co2_emissions * co2,
                ..stage.clone()
            })
            .collect()
    }

    /// Aplica as substituições aos dados agregados.
    pub fn apply_to_overall(&self, overall: &OverallData) -> OverallData {
        OverallData {
            recycle_percentage: self.recycle_percentage.unwrap_or(overall.recycle_percentage),
            reuse_percentage: self.reuse_percentage.unwrap_or(overall.reuse_percentage),
            landfill_percentage: self
                .landfill_percentage
                .unwrap_or(overall.landfill_percentage),
            production_route: self.production_route.or(overall.production_route),
            ..overall.clone()
        }
    }
}

/// Fração que sobra após uma redução percentual limitada a 0-100.
fn remaining_fraction(reduction: f64) -> f64 {
    let reduction = if reduction.is_nan() {
        0.0
    } else {
        reduction.clamp(0.0, 100.0)
    };
    1.0 - reduction / 100.0
}

/// Submissão de cenário: projeto + ajustes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    /// Nome do projeto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Estágios do projeto.
    #[serde(default, alias = "processStages")]
    pub stages: Vec<Stage>,

    /// Dados agregados.
    #[serde(default)]
    pub overall_data: OverallData,

    /// Ajustes do cenário.
    #[serde(default)]
    pub adjustments: ScenarioAdjustments,
}

impl ScenarioRequest {
    /// Cria uma submissão de cenário a partir de um projeto.
    pub fn new(submission: ProjectSubmission, adjustments: ScenarioAdjustments) -> Self {
        Self {
            project_name: submission.project_name,
            stages: submission.stages,
            overall_data: submission.overall_data,
            adjustments,
        }
    }
}

/// Diferenças cenário − base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDeltas {
    /// Variação do score de sustentabilidade.
    pub sustainability: i32,

    /// Variação do score circular.
    pub circular: i32,

    /// Variação do score linear.
    pub linear: i32,

    /// Variação dos totais de recursos.
    pub totals: ResourceTotals,
}

impl ScoreDeltas {
    fn between(baseline: &ScoreResult, scenario: &ScoreResult) -> Self {
        let diff = |a: u8, b: u8| i32::from(b) - i32::from(a);

        Self {
            sustainability: diff(baseline.sustainability_score, scenario.sustainability_score),
            circular: diff(baseline.circular_score, scenario.circular_score),
            linear: diff(baseline.linear_score, scenario.linear_score),
            totals: ResourceTotals {
                energy: scenario.totals.energy - baseline.totals.energy,
                water: scenario.totals.water - baseline.totals.water,
                waste: scenario.totals.waste - baseline.totals.waste,
                co2: scenario.totals.co2 - baseline.totals.co2,
            },
        }
    }
}

/// Resultado da simulação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    /// Scores do projeto como submetido.
    pub baseline: ScoreResult,

    /// Scores com os ajustes aplicados.
    pub scenario: ScoreResult,

    /// Diferenças.
    pub deltas: ScoreDeltas,
}

/// Simulador de cenários.
pub struct ScenarioSimulator;

impl ScenarioSimulator {
    /// Calcula base e cenário pelo otimizador (ambos entram no cache).
    pub fn simulate(
        optimizer: &ScoreOptimizer,
        stages: &[Stage],
        overall: &OverallData,
        adjustments: &ScenarioAdjustments,
    ) -> ScenarioOutcome {
        let baseline = optimizer.calculate_scores(stages, overall);

        let adjusted_stages = adjustments.apply_to_stages(stages);
        let adjusted_overall = adjustments.apply_to_overall(overall);
        let scenario = optimizer.calculate_scores(&adjusted_stages, &adjusted_overall);

        let deltas = ScoreDeltas::between(&baseline, &scenario);

        tracing::debug!(
            sustainability = deltas.sustainability,
            circular = deltas.circular,
            linear = deltas.linear,
            "Scenario simulated"
        );

        ScenarioOutcome {
            baseline,
            scenario,
            deltas,
        }
    }

    /// Simula a partir de uma submissão de cenário.
    pub fn simulate_request(optimizer: &ScoreOptimizer, request: &ScenarioRequest) -> ScenarioOutcome {
        Self::simulate(
            optimizer,
            &request.stages,
            &request.overall_data,
            &request.adjustments,
        )
    }
}
