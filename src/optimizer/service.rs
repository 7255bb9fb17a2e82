//! Serviço de otimização: calculador + cache + análise de estágios.

use crate::cache::{cache_key, fingerprint, lock_cache, shared, CacheStats, ScoreCache, SharedCache};
use crate::prediction::{PredictionInput, Predictor};
use crate::scoring::{ScoreCalculator, StageAnalyzer};
use crate::types::config::CacheConfig;
use crate::types::requests::{OverallData, ProjectSubmission, Stage};
use crate::types::responses::{ProjectAnalysis, ScoreResult, StageAnalysis};

/// Otimizador de scores LCA.
///
/// Consulta o cache antes de calcular e guarda o resultado depois. O lock
/// do cache não é mantido durante o cálculo.
pub struct ScoreOptimizer {
    cache: SharedCache,
    caching_enabled: bool,
}

impl ScoreOptimizer {
    /// Cria um otimizador com um cache novo, conforme a configuração.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: shared(ScoreCache::from_config(config)),
            caching_enabled: config.enabled,
        }
    }

    /// Cria um otimizador sobre um cache já existente.
    pub fn with_cache(cache: SharedCache) -> Self {
        Self {
            cache,
            caching_enabled: true,
        }
    }

    /// Calcula os scores de um projeto, usando o cache quando possível.
    pub fn calculate_scores(&self, stages: &[Stage], overall: &OverallData) -> ScoreResult {
        if !self.caching_enabled {
            return ScoreCalculator::calculate(stages, overall);
        }

        let key = cache_key(stages, overall);

        let cached = lock_cache(&self.cache).get(&key).cloned();
        if let Some(result) = cached {
            tracing::debug!(fingerprint = %fingerprint(&key), "Score cache hit");
            return result;
        }

        tracing::debug!(
            fingerprint = %fingerprint(&key),
            stages = stages.len(),
            metal = overall.metal_type_or_unknown(),
            "Score cache miss"
        );

        let result = ScoreCalculator::calculate(stages, overall);
        lock_cache(&self.cache).put(key, result.clone());
        result
    }

    /// Analisa cada estágio. Não passa pelo cache.
    pub fn process_stages(&self, stages: &[Stage]) -> Vec<StageAnalysis> {
        StageAnalyzer::analyze_all(stages)
    }

    /// Monta o registro de análise de um projeto, sem predição.
    pub fn analyze_project(&self, submission: &ProjectSubmission) -> ProjectAnalysis {
        let scores = self.calculate_scores(&submission.stages, &submission.overall_data);
        let stages = self.process_stages(&submission.stages);

        let analysis = ProjectAnalysis {
            id: uuid::Uuid::new_v4().to_string(),
            project_name: submission.project_name.clone(),
            scores,
            stages,
            prediction: None,
            created_at: chrono::Utc::now(),
        };

        tracing::info!(
            id = %analysis.id,
            sustainability = analysis.scores.sustainability_score,
            circular = analysis.scores.circular_score,
            linear = analysis.scores.linear_score,
            "Project analyzed"
        );

        analysis
    }

    /// Monta o registro de análise e anexa a predição.
    ///
    /// Uma predição que falha (entrada incompleta, por exemplo) não
    /// invalida a análise: o campo fica vazio.
    pub async fn analyze_project_with(
        &self,
        submission: &ProjectSubmission,
        predictor: &dyn Predictor,
    ) -> ProjectAnalysis {
        let mut analysis = self.analyze_project(submission);
        let input = PredictionInput::from_project(&submission.stages, &submission.overall_data);

        match predictor.predict(&input).await {
            Ok(prediction) => analysis.prediction = Some(prediction),
            Err(e) => {
                tracing::warn!(
                    id = %analysis.id,
                    predictor = predictor.name(),
                    error = %e,
                    "Prediction skipped"
                );
            }
        }

        analysis
    }

    /// Estatísticas do cache.
    pub fn cache_stats(&self) -> CacheStats {
        lock_cache(&self.cache).stats()
    }

    /// Esvazia o cache e zera os contadores.
    pub fn clear_cache(&self) {
        lock_cache(&self.cache).clear();
        tracing::info!("Score cache cleared");
    }

    /// Remove entradas expiradas. Retorna quantas foram removidas.
    pub fn sweep_cache(&self) -> usize {
        lock_cache(&self.cache).sweep()
    }

    /// Cache compartilhado (para o sweeper).
    pub fn shared_cache(&self) -> SharedCache {
        SharedCache::clone(&self.cache)
    }

    /// Se o cache está habilitado.
    pub fn caching_enabled(&self) -> bool {
        self.caching_enabled
    }
}
