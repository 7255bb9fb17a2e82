//! Preditores de score.
//!
//! - [`HeuristicPredictor`] - scores-base por metal ajustados por rota,
//!   reciclagem e eficiência
//! - [`ScriptPredictor`] - delega a um script de modelo externo, com
//!   timeout e fallback para a heurística

mod base;
mod heuristic;
mod script;

pub use base::{
    default_confidence, ModelInfo, PredictedImprovements, PredictedScores, Prediction,
    PredictionInput, Predictor, MAX_TOTAL_ENERGY, VALID_METALS,
};
pub use heuristic::{HeuristicPredictor, HEURISTIC_VERSION};
pub use script::ScriptPredictor;

use crate::types::config::PredictorConfig;

/// Cria o preditor indicado pela configuração.
pub fn predictor_from_config(config: &PredictorConfig) -> Box<dyn Predictor> {
    if config.use_script {
        Box::new(ScriptPredictor::from_config(config))
    } else {
        Box::new(HeuristicPredictor::new())
    }
}
