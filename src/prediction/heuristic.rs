//! Preditor heurístico por metal.
//!
//! Parte de scores-base por metal e ajusta por rota, reciclagem e
//! eficiência. Não depende de nenhum modelo treinado.

use async_trait::async_trait;

use super::base::{
    default_confidence, ModelInfo, PredictedImprovements, PredictedScores, Prediction,
    PredictionInput, Predictor,
};
use crate::MetalcaResult;

/// Versão reportada pelo preditor heurístico.
pub const HEURISTIC_VERSION: &str = "1.0-fallback";

/// Eficiência assumida no ajuste de scores quando ausente.
const SCORING_EFFICIENCY: f64 = 75.0;

/// Eficiência assumida na estimativa de melhorias quando ausente.
const IMPROVEMENT_EFFICIENCY: f64 = 80.0;

/// Distância de transporte assumida quando ausente (km).
const DEFAULT_TRANSPORT_DISTANCE: f64 = 500.0;

/// Scores-base de um metal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BaseScores {
    sustainability: f64,
    circular: f64,
    linear: f64,
}

impl BaseScores {
    const fn new(sustainability: f64, circular: f64, linear: f64) -> Self {
        Self {
            sustainability,
            circular,
            linear,
        }
    }

    /// Metais desconhecidos usam os valores do alumínio.
    fn for_metal(metal: &str) -> Self {
        match metal.to_lowercase().as_str() {
            "copper" => Self::new(65.0, 75.0, 50.0),
            "steel" => Self::new(60.0, 70.0, 45.0),
            "titanium" => Self::new(75.0, 85.0, 60.0),
            _ => Self::new(70.0, 80.0, 55.0),
        }
    }
}

/// Metais com benchmark de indústria (recebem confiança).
fn has_benchmark(metal: &str) -> bool {
    matches!(metal.to_lowercase().as_str(), "aluminum" | "copper" | "steel")
}

/// Preditor heurístico.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPredictor;

impl HeuristicPredictor {
    /// Cria o preditor.
    pub fn new() -> Self {
        Self
    }

    /// Scores ajustados, limitados a 0-100 e com uma casa decimal.
    pub fn scores(input: &PredictionInput) -> PredictedScores {
        let metal = input.metal_type.as_deref().unwrap_or_default();
        let base = BaseScores::for_metal(metal);

        let mut sustainability = base.sustainability;
        let mut circular = base.circular;
        let mut linear = base.linear;

        if input
            .production_route
            .as_deref()
            .is_some_and(|route| route.eq_ignore_ascii_case("secondary"))
        {
            sustainability += 10.0;
            circular += 15.0;
            linear += 5.0;
        }

        let recycling_bonus = input.recycling_rate * 0.3;
        sustainability += recycling_bonus;
        circular += recycling_bonus * 1.2;

        let efficiency_factor =
            (input.process_efficiency.unwrap_or(SCORING_EFFICIENCY) - 50.0) * 0.2;
        sustainability += efficiency_factor;
        circular += efficiency_factor;
        linear += efficiency_factor * 0.5;

        let sustainability_score = round1(sustainability.clamp(0.0, 100.0));
        let circular_score = round1(circular.clamp(0.0, 100.0));
        let linear_score = round1(linear.clamp(0.0, 100.0));

        let confidence = has_benchmark(metal).then(|| {
            let mut confidence: f64 = 0.8;
            if (30.0..=95.0).contains(&sustainability_score) {
                confidence += 0.1;
            }
            if circular_score > linear_score {
                confidence += 0.1;
            }
            confidence.min(1.0)
        });

        PredictedScores {
            sustainability_score,
            circular_score,
            linear_score,
            confidence,
            improvements: None,
            potential_score: None,
        }
    }

    /// Melhorias estimadas a partir dos atributos de entrada.
    pub fn improvements(input: &PredictionInput) -> PredictedImprovements {
        let efficiency = input.process_efficiency.unwrap_or(IMPROVEMENT_EFFICIENCY);
        let distance = input
            .transport_distance
            .unwrap_or(DEFAULT_TRANSPORT_DISTANCE);

        PredictedImprovements {
            energy_efficiency: ((efficiency - 60.0).max(0.0) * 0.5).min(25.0),
            recycling_impact: (input.recycling_rate * 0.4).min(30.0),
            transport_optimization: ((1000.0 - distance).max(0.0) / 100.0).min(15.0),
        }
    }

    /// Predição completa, sem passar pelo runtime assíncrono.
    pub fn predict_now(&self, input: &PredictionInput) -> MetalcaResult<Prediction> {
        input.validate()?;

        let mut predictions = Self::scores(input);
        let improvements = Self::improvements(input);
        predictions.potential_score =
            Some((predictions.sustainability_score + improvements.total() * 0.5).min(100.0));
        predictions.improvements = Some(improvements);

        let confidence = predictions.confidence.unwrap_or_else(default_confidence);

        Ok(Prediction {
            predictions,
            model_info: ModelInfo {
                version: HEURISTIC_VERSION.to_string(),
                trained_at: "Fallback mode".to_string(),
                prediction_time: chrono::Utc::now().to_rfc3339(),
                confidence,
            },
        })
    }
}

#[async_trait]
impl Predictor for HeuristicPredictor {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn predict(&self, input: &PredictionInput) -> MetalcaResult<Prediction> {
        self.predict_now(input)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
