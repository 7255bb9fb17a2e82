//! Trait base e tipos dos preditores de score.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreCalculator;
use crate::types::lenient;
use crate::types::requests::{OverallData, Stage};
use crate::{MetalcaError, MetalcaResult};

/// Metais aceitos pelo preditor.
pub const VALID_METALS: [&str; 4] = ["Aluminum", "Copper", "Steel", "Titanium"];

/// Energia total máxima aceita (GJ).
pub const MAX_TOTAL_ENERGY: f64 = 100.0;

/// Trait para preditores de score.
///
/// Cada preditor recebe os atributos agregados de um projeto e devolve
/// scores previstos com confiança e estimativas de melhoria.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Retorna o nome do preditor.
    fn name(&self) -> &str;

    /// Executa a predição.
    async fn predict(&self, input: &PredictionInput) -> MetalcaResult<Prediction>;
}

/// Entrada de predição.
///
/// Usa snake_case no JSON, o formato que o script de modelo espera;
/// os nomes camelCase também são aceitos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Tipo de metal.
    #[serde(default, alias = "metalType", skip_serializing_if = "Option::is_none")]
    pub metal_type: Option<String>,

    /// Rota de produção (Primary, Secondary).
    #[serde(default, alias = "productionRoute", skip_serializing_if = "Option::is_none")]
    pub production_route: Option<String>,

    /// Região.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Energia total (GJ).
    #[serde(default, alias = "totalEnergy", deserialize_with = "lenient::number")]
    pub total_energy: f64,

    /// Água total (m³).
    #[serde(default, alias = "totalWater", deserialize_with = "lenient::number")]
    pub total_water: f64,

    /// Taxa de reciclagem (%).
    #[serde(default, alias = "recyclingRate", deserialize_with = "lenient::number")]
    pub recycling_rate: f64,

    /// Eficiência do processo (%).
    #[serde(
        default,
        alias = "processEfficiency",
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub process_efficiency: Option<f64>,

    /// Distância de transporte (km).
    #[serde(
        default,
        alias = "transportDistance",
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub transport_distance: Option<f64>,
}

impl PredictionInput {
    /// Monta a entrada a partir de uma submissão de projeto.
    pub fn from_project(stages: &[Stage], overall: &OverallData) -> Self {
        let totals = ScoreCalculator::totals(stages);

        let process_efficiency = if stages.is_empty() {
            None
        } else {
            let sum: f64 = stages.iter().map(Stage::reported_efficiency).sum();
            Some(sum / stages.len() as f64)
        };

        let transport_distance = if stages.is_empty() {
            None
        } else {
            Some(stages.iter().map(|s| s.transport_distance).sum())
        };

        Self {
            metal_type: overall.metal_type.clone(),
            production_route: overall.production_route.map(|r| r.to_string()),
            region: overall.region.clone(),
            total_energy: totals.energy,
            total_water: totals.water,
            recycling_rate: overall.recycle_percentage,
            process_efficiency,
            transport_distance,
        }
    }

    /// Valida campos obrigatórios e faixas.
    pub fn validate(&self) -> MetalcaResult<()> {
        let missing: Vec<&str> = [
            ("metal_type", self.metal_type.is_none()),
            ("production_route", self.production_route.is_none()),
            ("region", self.region.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(MetalcaError::invalid_input(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let metal = self.metal_type.as_deref().unwrap_or_default();
        if !VALID_METALS.contains(&metal) {
            return Err(MetalcaError::invalid_input(format!(
                "Invalid metal_type. Must be one of: {}",
                VALID_METALS.join(", ")
            )));
        }

        if !(0.0..=MAX_TOTAL_ENERGY).contains(&self.total_energy) {
            return Err(MetalcaError::invalid_input(
                "total_energy must be between 0 and 100 GJ",
            ));
        }

        if !(0.0..=100.0).contains(&self.recycling_rate) {
            return Err(MetalcaError::invalid_input(
                "recycling_rate must be between 0 and 100%",
            ));
        }

        Ok(())
    }
}

/// Melhorias estimadas pelo preditor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictedImprovements {
    /// Ganho por eficiência energética.
    #[serde(default)]
    pub energy_efficiency: f64,

    /// Ganho por reciclagem.
    #[serde(default)]
    pub recycling_impact: f64,

    /// Ganho por otimização de transporte.
    #[serde(default)]
    pub transport_optimization: f64,
}

impl PredictedImprovements {
    /// Soma dos ganhos.
    pub fn total(&self) -> f64 {
        self.energy_efficiency + self.recycling_impact + self.transport_optimization
    }
}

/// Scores previstos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictedScores {
    /// Score de sustentabilidade.
    pub sustainability_score: f64,

    /// Score circular.
    pub circular_score: f64,

    /// Score linear.
    pub linear_score: f64,

    /// Confiança (0-1), quando há benchmark para o metal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Melhorias estimadas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<PredictedImprovements>,

    /// Score potencial após melhorias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_score: Option<f64>,
}

/// Metadados do modelo que gerou a predição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Versão do modelo.
    #[serde(default)]
    pub version: String,

    /// Quando o modelo foi treinado.
    #[serde(default)]
    pub trained_at: String,

    /// Momento da predição.
    #[serde(default)]
    pub prediction_time: String,

    /// Confiança reportada.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// Confiança reportada quando não há benchmark.
pub fn default_confidence() -> f64 {
    0.8
}

/// Resultado de uma predição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Scores previstos.
    pub predictions: PredictedScores,

    /// Metadados do modelo.
    pub model_info: ModelInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::requests::ProductionRoute;

    fn valid_input() -> PredictionInput {
        PredictionInput {
            metal_type: Some("Aluminum".to_string()),
            production_route: Some("Primary".to_string()),
            region: Some("Europe".to_string()),
            total_energy: 40.0,
            total_water: 10.0,
            recycling_rate: 30.0,
            process_efficiency: None,
            transport_distance: None,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let input = PredictionInput {
            region: None,
            production_route: None,
            ..valid_input()
        };

        let err = input.validate().unwrap_err().to_string();
        assert!(err.contains("production_route"));
        assert!(err.contains("region"));
    }

    #[test]
    fn test_invalid_metal() {
        let input = PredictionInput {
            metal_type: Some("Gold".to_string()),
            ..valid_input()
        };
        assert!(matches!(input.validate(), Err(MetalcaError::InvalidInput(_))));
    }

    #[test]
    fn test_out_of_range_values() {
        let energy = PredictionInput {
            total_energy: 150.0,
            ..valid_input()
        };
        assert!(energy.validate().is_err());

        let recycling = PredictionInput {
            recycling_rate: -1.0,
            ..valid_input()
        };
        assert!(recycling.validate().is_err());
    }

    #[test]
    fn test_from_project() {
        let stages = vec![
            Stage::new("Mining", 20.0, 3.0, 1.0)
                .with_transport(100.0)
                .with_efficiency(70.0),
            Stage::new("Smelting", 10.0, 1.0, 1.0).with_transport(50.0),
        ];
        let overall = OverallData::new(35.0, 10.0, 55.0)
            .with_metal_type("Copper")
            .with_route(ProductionRoute::Secondary)
            .with_region("Asia");

        let input = PredictionInput::from_project(&stages, &overall);

        assert_eq!(input.metal_type.as_deref(), Some("Copper"));
        assert_eq!(input.production_route.as_deref(), Some("Secondary"));
        assert_eq!(input.total_energy, 30.0);
        assert_eq!(input.total_water, 4.0);
        assert_eq!(input.recycling_rate, 35.0);
        // (70 + 85) / 2
        assert_eq!(input.process_efficiency, Some(77.5));
        assert_eq!(input.transport_distance, Some(150.0));
    }

    #[test]
    fn test_accepts_camel_case_aliases() {
        let input: PredictionInput = serde_json::from_value(serde_json::json!({
            "metalType": "Steel",
            "productionRoute": "Primary",
            "region": "India",
            "totalEnergy": "22.5",
            "recyclingRate": 10
        }))
        .unwrap();

        assert_eq!(input.metal_type.as_deref(), Some("Steel"));
        assert_eq!(input.total_energy, 22.5);
        assert!(input.validate().is_ok());
    }
}
