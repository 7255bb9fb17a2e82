//! Serviço de otimização com cache.

mod service;

pub use service::ScoreOptimizer;
