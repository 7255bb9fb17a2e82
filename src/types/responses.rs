//! Tipos de resposta do metalca.

use serde::{Deserialize, Serialize};

use crate::prediction::Prediction;

/// Totais de recursos somados sobre todos os estágios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    /// Energia total (GJ).
    pub energy: f64,

    /// Água total (m³).
    pub water: f64,

    /// Resíduos totais (kg).
    pub waste: f64,

    /// CO₂ total (kg).
    pub co2: f64,
}

/// Ganhos informativos de otimização.
///
/// `recycling_impact` e `reuse_impact` NÃO derivam do bônus circular
/// usado no score; são reportados como estão.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationGains {
    /// Score circular menos score de sustentabilidade.
    pub circular_gain: i32,

    /// Percentual de reciclagem × 0.3.
    pub recycling_impact: f64,

    /// Percentual de reuso × 0.2.
    pub reuse_impact: f64,
}

/// Resultado do cálculo de scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Score de sustentabilidade (0-100).
    pub sustainability_score: u8,

    /// Score de economia circular (0-100).
    pub circular_score: u8,

    /// Score de economia linear (0-100).
    pub linear_score: u8,

    /// Totais de recursos.
    pub totals: ResourceTotals,

    /// Ganhos de otimização.
    pub optimization_gains: OptimizationGains,
}

/// Prioridade de otimização de um estágio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Potencial de otimização de um estágio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPotential {
    /// Eficiência atual arredondada.
    pub current: i32,

    /// Teto de eficiência (fixo em 95).
    pub potential: i32,

    /// Diferença arredondada até o teto.
    pub improvement: i32,

    /// Prioridade.
    pub priority: Priority,
}

/// Estimativa de melhorias de um estágio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementEstimate {
    /// Redução de energia (%).
    pub energy_saving: f64,

    /// Redução de água (%).
    pub water_saving: f64,

    /// Redução de resíduos (%).
    pub waste_saving: f64,

    /// Redução de CO₂ (%).
    pub co2_saving: f64,

    /// Energia economizada (GJ).
    pub energy_saved: f64,

    /// Água economizada (m³).
    pub water_saved: f64,

    /// Resíduos evitados (kg).
    pub waste_saved: f64,

    /// Estratégias aplicáveis ao estágio.
    pub strategies: Vec<String>,
}

/// Análise completa de um estágio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAnalysis {
    /// Nome do estágio.
    pub name: String,

    /// Eficiência calculada (0-100).
    pub efficiency: f64,

    /// Potencial de otimização.
    pub optimization_potential: OptimizationPotential,

    /// Melhorias estimadas.
    pub improvements: ImprovementEstimate,
}

/// Registro de análise de um projeto: scores + estágios + predição.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    /// ID único da análise.
    pub id: String,

    /// Nome do projeto.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Scores calculados.
    pub scores: ScoreResult,

    /// Análise por estágio.
    pub stages: Vec<StageAnalysis>,

    /// Predição do modelo, quando disponível.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,

    /// Momento da análise.
    pub created_at: chrono::DateTime<chrono::Utc>,
}
