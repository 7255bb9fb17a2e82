//! Implementação dos comandos CLI do metalca.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::optimizer::ScoreOptimizer;
use crate::prediction::{predictor_from_config, PredictionInput};
use crate::scenario::{ScenarioRequest, ScenarioSimulator};
use crate::types::config::{Config, CONFIG_FILE_NAME};
use crate::types::requests::ProjectSubmission;
use crate::MetalcaResult;

/// Creates a default configuration file in the target directory.
pub fn init(path: Option<PathBuf>) -> MetalcaResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("metalca initialized successfully!");
    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Score a project: metalca score --input project.json");
    println!("  2. Start the tool server: metalca serve");

    Ok(())
}

/// Inicia o servidor de ferramentas via stdio.
pub async fn serve(config: &Config) -> MetalcaResult<()> {
    use crate::mcp::McpServer;

    tracing::debug!(
        cache_enabled = config.cache.enabled,
        max_size = config.cache.max_size,
        eviction = ?config.cache.eviction,
        predictor_script = config.predictor.use_script,
        "Configuração carregada"
    );

    let mut server = McpServer::new(config.clone());
    server.run().await
}

/// Calcula e imprime os scores.
pub fn score(input: &Path, config: &Config) -> MetalcaResult<()> {
    let submission: ProjectSubmission = read_input(input)?;
    let optimizer = ScoreOptimizer::new(&config.cache);

    print_json(&optimizer.calculate_scores(&submission.stages, &submission.overall_data))
}

/// Imprime a análise por estágio.
pub fn stages(input: &Path, config: &Config) -> MetalcaResult<()> {
    let submission: ProjectSubmission = read_input(input)?;
    let optimizer = ScoreOptimizer::new(&config.cache);

    print_json(&optimizer.process_stages(&submission.stages))
}

/// Imprime o registro completo de análise, com predição.
pub async fn analyze(input: &Path, config: &Config) -> MetalcaResult<()> {
    let submission: ProjectSubmission = read_input(input)?;
    let optimizer = ScoreOptimizer::new(&config.cache);
    let predictor = predictor_from_config(&config.predictor);

    let analysis = optimizer
        .analyze_project_with(&submission, predictor.as_ref())
        .await;
    print_json(&analysis)
}

/// Imprime uma predição.
pub async fn predict(input: &Path, config: &Config) -> MetalcaResult<()> {
    let prediction_input: PredictionInput = read_input(input)?;
    let predictor = predictor_from_config(&config.predictor);

    let prediction = predictor.predict(&prediction_input).await?;
    print_json(&prediction)
}

/// Imprime a comparação base × cenário.
pub fn simulate(input: &Path, config: &Config) -> MetalcaResult<()> {
    let request: ScenarioRequest = read_input(input)?;
    let optimizer = ScoreOptimizer::new(&config.cache);

    print_json(&ScenarioSimulator::simulate_request(&optimizer, &request))
}

/// Mostra versão.
pub fn version() {
    println!("metalca {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Avaliação de ciclo de vida para produção de metais");
}

/// Lê JSON de um arquivo, ou de stdin quando o caminho é `-`.
fn read_input<T: DeserializeOwned>(path: &Path) -> MetalcaResult<T> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    tracing::debug!(input = %path.display(), bytes = content.len(), "Input loaded");
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> MetalcaResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
