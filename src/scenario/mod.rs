//! Simulação de cenários de melhoria.

mod simulator;

pub use simulator::{
    ScenarioAdjustments, ScenarioOutcome, ScenarioRequest, ScenarioSimulator, ScoreDeltas,
};
