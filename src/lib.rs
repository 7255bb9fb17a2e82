//! # metalca
//!
//! Avaliação de ciclo de vida (LCA) para produção de metais.
//!
//! A partir dos estágios de produção (mineração, fundição, refino, ...) e
//! dos percentuais de fim de vida, calcula scores de sustentabilidade,
//! circular e linear (0-100), estima melhorias por estágio, simula
//! cenários e prevê scores por metal. Os scores ficam em um cache em
//! memória com capacidade limitada e varredura periódica por idade.
//!
//! ## Módulos
//!
//! - [`scoring`] - Calculador de scores, bônus circular e análise de estágios
//! - [`cache`] - Cache de resultados com remoção FIFO/LRU e sweeper
//! - [`optimizer`] - Serviço que une calculador e cache
//! - [`prediction`] - Preditores heurístico e via script
//! - [`scenario`] - Simulação de cenários "e se"
//! - [`mcp`] - Servidor de ferramentas JSON-RPC sobre stdio
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Tipos compartilhados, configuração e erros

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod mcp;
pub mod optimizer;
pub mod prediction;
pub mod scenario;
pub mod scoring;
pub mod types;

pub use types::config::Config;
pub use types::errors::{MetalcaError, MetalcaResult};
