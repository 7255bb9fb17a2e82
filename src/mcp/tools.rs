//! Handlers das ferramentas LCA.
//!
//! 1. `lca_calculate_scores` - scores de sustentabilidade, circular e linear
//! 2. `lca_process_stages` - análise por estágio
//! 3. `lca_analyze_project` - registro completo de análise
//! 4. `lca_predict` - predição de scores
//! 5. `lca_simulate_scenario` - comparação base × cenário
//! 6. `lca_cache_stats` - estatísticas do cache (admin)
//! 7. `lca_cache_clear` - esvazia o cache (admin)
//! 8. `lca_cache_sweep` - remove entradas expiradas (admin)

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::optimizer::ScoreOptimizer;
use crate::prediction::{predictor_from_config, PredictionInput, Predictor};
use crate::scenario::{ScenarioRequest, ScenarioSimulator};
use crate::types::config::{AdminConfig, Config};
use crate::types::requests::{OverallData, ProjectSubmission, Stage};

use super::protocol::{ToolDescription, ToolResult};

// ═══════════════════════════════════════════════════════════════════════════
// Parâmetros das ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Parâmetros de lca_calculate_scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreParams {
    /// Estágios.
    #[serde(default, alias = "processStages")]
    pub stages: Vec<Stage>,

    /// Dados agregados.
    #[serde(default)]
    pub overall_data: OverallData,
}

/// Parâmetros de lca_process_stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagesParams {
    /// Estágios.
    #[serde(default, alias = "processStages")]
    pub stages: Vec<Stage>,
}

/// Parâmetros das ferramentas administrativas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminParams {
    /// Token de administração.
    #[serde(default)]
    pub token: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Handler de ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Handler das ferramentas LCA.
pub struct ToolHandler {
    optimizer: ScoreOptimizer,
    predictor: Box<dyn Predictor>,
    admin: AdminConfig,
}

impl ToolHandler {
    /// Cria o handler a partir da configuração.
    pub fn new(config: &Config) -> Self {
        Self {
            optimizer: ScoreOptimizer::new(&config.cache),
            predictor: predictor_from_config(&config.predictor),
            admin: config.admin.clone(),
        }
    }

    /// Otimizador usado pelas ferramentas.
    pub fn optimizer(&self) -> &ScoreOptimizer {
        &self.optimizer
    }

    /// Lista as ferramentas disponíveis.
    pub fn list_tools() -> Vec<ToolDescription> {
        let stage_schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "energyUsage": {"type": "number", "description": "Energia (GJ)"},
                "waterUsage": {"type": "number", "description": "Água (m³)"},
                "wasteGenerated": {"type": "number", "description": "Resíduos (kg)"},
                "co2Emissions": {"type": "number", "description": "CO₂ (kg)"},
                "recyclingPercentage": {"type": "number"},
                "transportDistance": {"type": "number", "description": "Distância (km)"},
                "efficiency": {"type": "number"}
            }
        });

        let overall_schema = json!({
            "type": "object",
            "properties": {
                "metalType": {"type": "string", "enum": ["Aluminum", "Copper", "Steel", "Titanium"]},
                "productionRoute": {"type": "string", "enum": ["Primary", "Secondary"]},
                "region": {"type": "string"},
                "recyclePercentage": {"type": "number"},
                "reusePercentage": {"type": "number"},
                "landfillPercentage": {"type": "number"},
                "productLifetime": {"type": "number"}
            }
        });

        let stages_schema = json!({"type": "array", "items": stage_schema});

        let admin_schema = json!({
            "type": "object",
            "properties": {
                "token": {"type": "string", "description": "Token de administração, se configurado"}
            }
        });

        vec![
            ToolDescription::new(
                "lca_calculate_scores",
                "Calcula os scores de sustentabilidade, circular e linear (0-100) de um projeto metalúrgico.",
                json!({
                    "type": "object",
                    "properties": {
                        "stages": stages_schema.clone(),
                        "overallData": overall_schema.clone()
                    },
                    "required": ["stages", "overallData"]
                }),
            ),
            ToolDescription::new(
                "lca_process_stages",
                "Calcula eficiência, prioridade e melhorias estimadas de cada estágio.",
                json!({
                    "type": "object",
                    "properties": {"stages": stages_schema.clone()},
                    "required": ["stages"]
                }),
            ),
            ToolDescription::new(
                "lca_analyze_project",
                "Gera o registro completo de análise: scores, estágios e predição.",
                json!({
                    "type": "object",
                    "properties": {
                        "projectName": {"type": "string"},
                        "stages": stages_schema.clone(),
                        "overallData": overall_schema.clone()
                    },
                    "required": ["stages", "overallData"]
                }),
            ),
            ToolDescription::new(
                "lca_predict",
                "Prevê scores, confiança e potencial de melhoria a partir de atributos agregados.",
                json!({
                    "type": "object",
                    "properties": {
                        "metal_type": {"type": "string", "enum": ["Aluminum", "Copper", "Steel", "Titanium"]},
                        "production_route": {"type": "string"},
                        "region": {"type": "string"},
                        "total_energy": {"type": "number", "description": "0-100 GJ"},
                        "total_water": {"type": "number"},
                        "recycling_rate": {"type": "number", "description": "0-100 %"},
                        "process_efficiency": {"type": "number"},
                        "transport_distance": {"type": "number"}
                    },
                    "required": ["metal_type", "production_route", "region"]
                }),
            ),
            ToolDescription::new(
                "lca_simulate_scenario",
                "Compara os scores do projeto com um cenário de reduções e novos percentuais de fim de vida.",
                json!({
                    "type": "object",
                    "properties": {
                        "stages": stages_schema.clone(),
                        "overallData": overall_schema.clone(),
                        "adjustments": {
                            "type": "object",
                            "properties": {
                                "energyReduction": {"type": "number"},
                                "waterReduction": {"type": "number"},
                                "wasteReduction": {"type": "number"},
                                "co2Reduction": {"type": "number"},
                                "recyclePercentage": {"type": "number"},
                                "reusePercentage": {"type": "number"},
                                "landfillPercentage": {"type": "number"},
                                "productionRoute": {"type": "string", "enum": ["Primary", "Secondary"]}
                            }
                        }
                    },
                    "required": ["stages", "overallData", "adjustments"]
                }),
            ),
            ToolDescription::new(
                "lca_cache_stats",
                "Estatísticas do cache de scores (tamanho, acertos, erros, taxa de acerto).",
                admin_schema.clone(),
            ),
            ToolDescription::new(
                "lca_cache_clear",
                "Esvazia o cache de scores e zera os contadores.",
                admin_schema.clone(),
            ),
            ToolDescription::new(
                "lca_cache_sweep",
                "Remove do cache as entradas mais antigas que a idade máxima.",
                admin_schema,
            ),
        ]
    }

    /// Executa uma ferramenta.
    pub async fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        match name {
            "lca_calculate_scores" => self.handle_calculate_scores(arguments),
            "lca_process_stages" => self.handle_process_stages(arguments),
            "lca_analyze_project" => self.handle_analyze_project(arguments).await,
            "lca_predict" => self.handle_predict(arguments).await,
            "lca_simulate_scenario" => self.handle_simulate_scenario(arguments),
            "lca_cache_stats" => self.handle_cache_stats(arguments),
            "lca_cache_clear" => self.handle_cache_clear(arguments),
            "lca_cache_sweep" => self.handle_cache_sweep(arguments),
            _ => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers individuais
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_calculate_scores(&self, arguments: Value) -> ToolResult {
        let params: ScoreParams = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(result) => return result,
        };

        let result = self
            .optimizer
            .calculate_scores(&params.stages, &params.overall_data);
        ToolResult::success_json(&result)
    }

    fn handle_process_stages(&self, arguments: Value) -> ToolResult {
        let params: StagesParams = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(result) => return result,
        };

        ToolResult::success_json(&self.optimizer.process_stages(&params.stages))
    }

    async fn handle_analyze_project(&self, arguments: Value) -> ToolResult {
        let submission: ProjectSubmission = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(result) => return result,
        };

        let analysis = self
            .optimizer
            .analyze_project_with(&submission, self.predictor.as_ref())
            .await;
        ToolResult::success_json(&analysis)
    }

    async fn handle_predict(&self, arguments: Value) -> ToolResult {
        let input: PredictionInput = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(result) => return result,
        };

        match self.predictor.predict(&input).await {
            Ok(prediction) => ToolResult::success_json(&prediction),
            Err(e) => ToolResult::error(format!("Prediction failed: {}", e)),
        }
    }

    fn handle_simulate_scenario(&self, arguments: Value) -> ToolResult {
        let request: ScenarioRequest = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(result) => return result,
        };

        ToolResult::success_json(&ScenarioSimulator::simulate_request(&self.optimizer, &request))
    }

    fn handle_cache_stats(&self, arguments: Value) -> ToolResult {
        if let Err(result) = self.authorize("lca_cache_stats", arguments) {
            return result;
        }

        ToolResult::success_json(&self.optimizer.cache_stats())
    }

    fn handle_cache_clear(&self, arguments: Value) -> ToolResult {
        if let Err(result) = self.authorize("lca_cache_clear", arguments) {
            return result;
        }

        self.optimizer.clear_cache();
        ToolResult::success_json(&json!({"cleared": true}))
    }

    fn handle_cache_sweep(&self, arguments: Value) -> ToolResult {
        if let Err(result) = self.authorize("lca_cache_sweep", arguments) {
            return result;
        }

        let removed = self.optimizer.sweep_cache();
        ToolResult::success_json(&json!({
            "removed": removed,
            "size": self.optimizer.cache_stats().size
        }))
    }

    fn authorize(&self, tool: &str, arguments: Value) -> Result<(), ToolResult> {
        let params: AdminParams = parse_arguments(arguments)?;

        if self.admin.authorize(params.token.as_deref()) {
            Ok(())
        } else {
            tracing::warn!(tool, "Rejected administrative call");
            Err(ToolResult::error("Unauthorized: invalid or missing admin token"))
        }
    }
}

/// Argumentos ausentes (`null`) valem como objeto vazio.
fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolResult> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };

    serde_json::from_value(arguments)
        .map_err(|e| ToolResult::error(format!("Invalid parameters: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_arguments() -> Value {
        json!({
            "stages": [
                {"name": "Mining", "energyUsage": 25, "waterUsage": 2.5, "wasteGenerated": 8.0},
                {"name": "Smelting", "energyUsage": 35, "waterUsage": 4.2, "wasteGenerated": 1.5}
            ],
            "overallData": {"recyclePercentage": 25, "reusePercentage": 10, "landfillPercentage": 65}
        })
    }

    fn parse(result: &ToolResult) -> Value {
        serde_json::from_str(result.text()).unwrap()
    }

    fn handler_with_token(token: &str) -> ToolHandler {
        let mut config = Config::default();
        config.admin.token = Some(token.to_string());
        ToolHandler::new(&config)
    }

    #[test]
    fn test_list_tools() {
        let tools = ToolHandler::list_tools();
        assert_eq!(tools.len(), 8);

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"lca_calculate_scores"));
        assert!(names.contains(&"lca_cache_sweep"));
        assert!(tools.iter().all(|t| t.input_schema["type"] == "object"));
    }

    #[tokio::test]
    async fn test_calculate_scores() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler
            .handle_tool_call("lca_calculate_scores", example_arguments())
            .await;

        assert!(!result.is_error);
        let value = parse(&result);
        assert_eq!(value["sustainabilityScore"], 72);
        assert_eq!(value["circularScore"], 87);
        assert_eq!(value["linearScore"], 66);
    }

    #[tokio::test]
    async fn test_process_stages_alias() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler
            .handle_tool_call(
                "lca_process_stages",
                json!({"processStages": [{"stageName": "Mining", "energyUsage": "10"}]}),
            )
            .await;

        let value = parse(&result);
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["name"], "Mining");
    }

    #[tokio::test]
    async fn test_analyze_project_without_prediction_fields() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler
            .handle_tool_call("lca_analyze_project", example_arguments())
            .await;

        assert!(!result.is_error);
        let value = parse(&result);
        assert!(value["id"].is_string());
        assert_eq!(value["stages"].as_array().unwrap().len(), 2);
        assert!(value.get("prediction").is_none());
    }

    #[tokio::test]
    async fn test_predict_validation_error() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler
            .handle_tool_call("lca_predict", json!({"metal_type": "Gold"}))
            .await;

        assert!(result.is_error);
        assert!(result.text().contains("Prediction failed"));
    }

    #[tokio::test]
    async fn test_simulate_scenario() {
        let handler = ToolHandler::new(&Config::default());
        let mut arguments = example_arguments();
        arguments["adjustments"] = json!({"energyReduction": 50});

        let result = handler
            .handle_tool_call("lca_simulate_scenario", arguments)
            .await;

        let value = parse(&result);
        assert_eq!(value["baseline"]["sustainabilityScore"], 72);
        assert_eq!(value["scenario"]["sustainabilityScore"], 84);
        assert_eq!(value["deltas"]["sustainability"], 12);
    }

    #[tokio::test]
    async fn test_cache_stats_open_without_token() {
        let handler = ToolHandler::new(&Config::default());
        handler
            .handle_tool_call("lca_calculate_scores", example_arguments())
            .await;

        let result = handler.handle_tool_call("lca_cache_stats", Value::Null).await;
        assert!(!result.is_error);
        assert_eq!(parse(&result)["misses"], 1);
    }

    #[tokio::test]
    async fn test_admin_tools_require_token() {
        let handler = handler_with_token("s3cret");

        for tool in ["lca_cache_stats", "lca_cache_clear", "lca_cache_sweep"] {
            let denied = handler.handle_tool_call(tool, json!({})).await;
            assert!(denied.is_error, "{} should be denied", tool);

            let wrong = handler.handle_tool_call(tool, json!({"token": "nope"})).await;
            assert!(wrong.is_error);

            let allowed = handler.handle_tool_call(tool, json!({"token": "s3cret"})).await;
            assert!(!allowed.is_error, "{} should be allowed", tool);
        }
    }

    #[tokio::test]
    async fn test_cache_clear_resets() {
        let handler = ToolHandler::new(&Config::default());
        handler
            .handle_tool_call("lca_calculate_scores", example_arguments())
            .await;

        let cleared = handler.handle_tool_call("lca_cache_clear", json!({})).await;
        assert_eq!(parse(&cleared)["cleared"], true);
        assert_eq!(handler.optimizer().cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_invalid_parameters() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler
            .handle_tool_call("lca_calculate_scores", json!({"stages": "not a list"}))
            .await;

        assert!(result.is_error);
        assert!(result.text().contains("Invalid parameters"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handler = ToolHandler::new(&Config::default());
        let result = handler.handle_tool_call("lca_unknown", json!({})).await;
        assert!(result.is_error);
    }
}
