//! Cache de resultados de score.
//!
//! Este módulo implementa o cache que evita recalcular scores para
//! entradas idênticas: derivação da chave, o armazenamento limitado por
//! capacidade e idade, e a varredura periódica em background.

mod key;
mod store;
mod sweeper;

pub use key::{cache_key, fingerprint, FIELD_SEPARATOR, SECTION_DELIMITER, STAGE_SEPARATOR};
pub use store::{CacheEntry, CacheStats, ScoreCache};
pub use sweeper::{lock_cache, shared, CacheSweeper, SharedCache};
