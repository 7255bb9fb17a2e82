//! Cálculo de scores LCA.
//!
//! - [`ScoreCalculator`] - scores de sustentabilidade, circular e linear
//! - [`CircularBonusTable`] - tabela do bônus de economia circular
//! - [`StageAnalyzer`] - eficiência e melhorias por estágio

mod calculator;
mod circular;
mod stage;

pub use calculator::{
    ScoreCalculator, CO2_WEIGHT, ENERGY_WEIGHT, LANDFILL_PENALTY, RECYCLING_IMPACT_FACTOR,
    REUSE_IMPACT_FACTOR, WASTE_WEIGHT, WATER_WEIGHT,
};
pub use circular::{cell_value, circular_bonus, CircularBonusTable, GRID_STEP, SYNERGY_MULTIPLIER};
pub use stage::{
    Metric, StageAnalyzer, Strategy, DEFAULT_BASE_EFFICIENCY, EFFICIENCY_CEILING,
};
