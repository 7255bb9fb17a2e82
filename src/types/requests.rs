//! Tipos de entrada do metalca.
//!
//! Todos usam nomes camelCase no JSON, o mesmo formato do payload de
//! submissão de projetos.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Eficiência reportada quando o estágio não informa uma.
pub const DEFAULT_STAGE_EFFICIENCY: f64 = 85.0;

/// Um estágio da cadeia de produção.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Nome do estágio (mineração, fundição, ...).
    #[serde(default, alias = "stageName")]
    pub name: String,

    /// Energia consumida (GJ).
    #[serde(default, deserialize_with = "lenient::number")]
    pub energy_usage: f64,

    /// Água consumida (m³).
    #[serde(default, deserialize_with = "lenient::number")]
    pub water_usage: f64,

    /// Resíduos gerados (kg).
    #[serde(default, deserialize_with = "lenient::number")]
    pub waste_generated: f64,

    /// Emissões de CO₂ (kg).
    #[serde(default, deserialize_with = "lenient::number")]
    pub co2_emissions: f64,

    /// Percentual reciclado no estágio (0-100).
    #[serde(default, deserialize_with = "lenient::number")]
    pub recycling_percentage: f64,

    /// Distância de transporte (km).
    #[serde(default, deserialize_with = "lenient::number")]
    pub transport_distance: f64,

    /// Eficiência do processo (0-100), se informada.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub efficiency: Option<f64>,
}

impl Stage {
    /// Cria um estágio com os três campos que entram na chave de cache.
    pub fn new(name: impl Into<String>, energy: f64, water: f64, waste: f64) -> Self {
        Self {
            name: name.into(),
            energy_usage: energy,
            water_usage: water,
            waste_generated: waste,
            ..Self::default()
        }
    }

    /// Define as emissões de CO₂.
    #[must_use]
    pub fn with_co2(mut self, co2: f64) -> Self {
        self.co2_emissions = co2;
        self
    }

    /// Define o percentual de reciclagem.
    #[must_use]
    pub fn with_recycling(mut self, percentage: f64) -> Self {
        self.recycling_percentage = percentage;
        self
    }

    /// Define a distância de transporte.
    #[must_use]
    pub fn with_transport(mut self, km: f64) -> Self {
        self.transport_distance = km;
        self
    }

    /// Define a eficiência.
    #[must_use]
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    /// Eficiência informada, ou o padrão de 85%.
    pub fn reported_efficiency(&self) -> f64 {
        self.efficiency.unwrap_or(DEFAULT_STAGE_EFFICIENCY)
    }
}

/// Rota de produção do metal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProductionRoute {
    /// Produção a partir de minério.
    #[default]
    Primary,
    /// Produção a partir de sucata.
    Secondary,
}

impl std::fmt::Display for ProductionRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductionRoute::Primary => write!(f, "Primary"),
            ProductionRoute::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Dados agregados do projeto.
///
/// Os percentuais de reciclagem, reuso e aterro não precisam somar 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallData {
    /// Tipo de metal (Aluminum, Copper, Steel, Titanium).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metal_type: Option<String>,

    /// Rota de produção.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_route: Option<ProductionRoute>,

    /// Região de produção.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Percentual reciclado no fim de vida.
    #[serde(default, deserialize_with = "lenient::number")]
    pub recycle_percentage: f64,

    /// Percentual reutilizado no fim de vida.
    #[serde(default, deserialize_with = "lenient::number")]
    pub reuse_percentage: f64,

    /// Percentual destinado a aterro.
    #[serde(default, deserialize_with = "lenient::number")]
    pub landfill_percentage: f64,

    /// Vida útil do produto (anos).
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_lifetime: Option<f64>,
}

impl OverallData {
    /// Cria dados agregados a partir dos três percentuais de fim de vida.
    pub fn new(recycle: f64, reuse: f64, landfill: f64) -> Self {
        Self {
            recycle_percentage: recycle,
            reuse_percentage: reuse,
            landfill_percentage: landfill,
            ..Self::default()
        }
    }

    /// Define o tipo de metal.
    #[must_use]
    pub fn with_metal_type(mut self, metal: impl Into<String>) -> Self {
        self.metal_type = Some(metal.into());
        self
    }

    /// Define a rota de produção.
    #[must_use]
    pub fn with_route(mut self, route: ProductionRoute) -> Self {
        self.production_route = Some(route);
        self
    }

    /// Define a região.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Tipo de metal, ou `"unknown"` se ausente ou vazio.
    pub fn metal_type_or_unknown(&self) -> &str {
        match self.metal_type.as_deref() {
            Some(metal) if !metal.is_empty() => metal,
            _ => "unknown",
        }
    }
}

/// Submissão de um projeto: estágios + dados agregados.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmission {
    /// Nome do projeto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Estágios em ordem de processamento.
    #[serde(default, alias = "processStages")]
    pub stages: Vec<Stage>,

    /// Dados agregados.
    #[serde(default)]
    pub overall_data: OverallData,
}

impl ProjectSubmission {
    /// Cria uma submissão.
    pub fn new(stages: Vec<Stage>, overall_data: OverallData) -> Self {
        Self {
            project_name: None,
            stages,
            overall_data,
        }
    }

    /// Define o nome do projeto.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}
