//! Preditor que delega a um script de modelo externo.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use super::base::{Prediction, PredictionInput, Predictor};
use super::heuristic::HeuristicPredictor;
use crate::types::config::PredictorConfig;
use crate::{MetalcaError, MetalcaResult};

/// Preditor via script (ex.: `python3 ml_models/predict.py '<json>'`).
///
/// O script recebe a entrada como JSON no primeiro argumento e escreve a
/// predição como JSON no stdout. Se o script falhar, estourar o timeout ou
/// não estiver instalado, a predição cai no [`HeuristicPredictor`].
pub struct ScriptPredictor {
    command: String,
    script_path: PathBuf,
    timeout: Duration,
    fallback: HeuristicPredictor,
}

impl ScriptPredictor {
    /// Cria um novo preditor via script.
    pub fn new(command: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            script_path: script_path.into(),
            timeout: Duration::from_secs(30),
            fallback: HeuristicPredictor::new(),
        }
    }

    /// Cria a partir da configuração.
    pub fn from_config(config: &PredictorConfig) -> Self {
        Self::new(config.command.clone(), config.script_path.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Define o timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Verifica se o interpretador está disponível no sistema.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Extrai a predição do stdout do script.
    ///
    /// Aceita texto ao redor do JSON. Um objeto com a chave `error` vira
    /// erro do preditor.
    pub fn parse_output(output: &str, name: &str) -> MetalcaResult<Prediction> {
        let json_start = output.find('{');
        let json_end = output.rfind('}');

        let json_str = match (json_start, json_end) {
            (Some(start), Some(end)) if start < end => &output[start..=end],
            _ => {
                return Err(MetalcaError::PredictorFailed(
                    name.to_string(),
                    "Resposta não contém JSON válido".to_string(),
                ))
            }
        };

        let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
            MetalcaError::PredictorFailed(name.to_string(), format!("Falha ao parsear JSON: {}", e))
        })?;

        if let Some(error) = value.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(MetalcaError::PredictorFailed(name.to_string(), message));
        }

        serde_json::from_value(value).map_err(|e| {
            MetalcaError::PredictorFailed(name.to_string(), format!("Predição inválida: {}", e))
        })
    }

    async fn run_script(&self, input: &PredictionInput) -> MetalcaResult<Prediction> {
        let payload = serde_json::to_string(input)?;

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command)
                .arg(&self.script_path)
                .arg(&payload)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    Self::parse_output(&stdout, self.name())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(MetalcaError::PredictorFailed(
                        self.name().to_string(),
                        stderr.trim().to_string(),
                    ))
                }
            }
            Ok(Err(e)) => Err(MetalcaError::PredictorFailed(
                self.name().to_string(),
                e.to_string(),
            )),
            Err(_) => Err(MetalcaError::PredictorTimeout(self.name().to_string())),
        }
    }
}

#[async_trait]
impl Predictor for ScriptPredictor {
    fn name(&self) -> &str {
        "script"
    }

    async fn predict(&self, input: &PredictionInput) -> MetalcaResult<Prediction> {
        // Entrada inválida não é problema do script
        input.validate()?;

        match self.run_script(input).await {
            Ok(prediction) => Ok(prediction),
            Err(e) => {
                tracing::warn!(
                    command = %self.command,
                    script = %self.script_path.display(),
                    error = %e,
                    "Model script unavailable, using heuristic predictor"
                );
                self.fallback.predict_now(input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::heuristic::HEURISTIC_VERSION;

    fn valid_input() -> PredictionInput {
        PredictionInput {
            metal_type: Some("Copper".to_string()),
            production_route: Some("Primary".to_string()),
            region: Some("Chile".to_string()),
            total_energy: 30.0,
            total_water: 5.0,
            recycling_rate: 40.0,
            process_efficiency: None,
            transport_distance: None,
        }
    }

    #[test]
    fn test_parse_output_with_surrounding_text() {
        let output = r#"
            loading model...
            {"predictions": {"sustainability_score": 71.2, "circular_score": 80.0, "linear_score": 52.5},
             "model_info": {"version": "1.0", "trained_at": "2024-01-01", "prediction_time": "now", "confidence": 0.9}}
        "#;

        let prediction = ScriptPredictor::parse_output(output, "script").unwrap();
        assert_eq!(prediction.predictions.sustainability_score, 71.2);
        assert_eq!(prediction.model_info.version, "1.0");
        assert!(prediction.predictions.improvements.is_none());
    }

    #[test]
    fn test_parse_output_error_object() {
        let result = ScriptPredictor::parse_output(r#"{"error": "Model not trained"}"#, "script");

        match result {
            Err(MetalcaError::PredictorFailed(name, message)) => {
                assert_eq!(name, "script");
                assert_eq!(message, "Model not trained");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_output_without_json() {
        assert!(ScriptPredictor::parse_output("No JSON here", "script").is_err());
    }

    #[test]
    fn test_from_config() {
        let config = PredictorConfig {
            timeout_secs: 5,
            ..PredictorConfig::default()
        };
        let predictor = ScriptPredictor::from_config(&config);

        assert_eq!(predictor.timeout, Duration::from_secs(5));
        assert_eq!(predictor.command, "python3");
    }

    #[tokio::test]
    async fn test_missing_command_falls_back_to_heuristic() {
        let predictor = ScriptPredictor::new("metalca-nonexistent-interpreter", "predict.py");

        assert!(!predictor.is_available().await);

        let prediction = predictor.predict(&valid_input()).await.unwrap();
        assert_eq!(prediction.model_info.version, HEURISTIC_VERSION);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_masked_by_fallback() {
        let predictor = ScriptPredictor::new("metalca-nonexistent-interpreter", "predict.py");
        let input = PredictionInput {
            region: None,
            ..valid_input()
        };

        assert!(matches!(
            predictor.predict(&input).await,
            Err(MetalcaError::InvalidInput(_))
        ));
    }
}
