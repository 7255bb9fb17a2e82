//! Cache de scores com capacidade e idade máximas.

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::types::config::{CacheConfig, EvictionPolicy};
use crate::types::responses::ScoreResult;

/// Capacidade usada quando a configurada é zero.
const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// Entrada do cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Valor armazenado.
    pub value: V,

    /// Momento da inserção.
    pub inserted_at: DateTime<Utc>,

    /// Número de leituras com acerto.
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    /// Cria uma nova entrada com o horário atual.
    pub fn new(value: V) -> Self {
        Self::with_timestamp(value, Utc::now())
    }

    /// Cria uma entrada com horário de inserção explícito.
    pub fn with_timestamp(value: V, inserted_at: DateTime<Utc>) -> Self {
        Self {
            value,
            inserted_at,
            access_count: 0,
        }
    }

    /// Verifica se a entrada passou da idade máxima em `now`.
    pub fn is_expired_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let elapsed = now
            .signed_duration_since(self.inserted_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        elapsed > max_age
    }
}

/// Estatísticas do cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Capacidade máxima.
    pub max_size: usize,

    /// Número de acertos.
    pub hits: u64,

    /// Número de erros.
    pub misses: u64,

    /// Taxa de acerto em percentual (0 sem requisições).
    pub hit_rate: f64,
}

impl CacheStats {
    fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            let rate = hits as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        }
    }
}

/// Cache de resultados de score.
///
/// Em [`EvictionPolicy::Fifo`] leituras não reordenam as entradas, então a
/// entrada removida quando o cache enche é sempre a inserida há mais tempo.
/// Reinserir uma chave existente substitui o valor e conta como nova
/// inserção. Entradas antigas só saem via [`ScoreCache::sweep`].
pub struct ScoreCache<V = ScoreResult> {
    entries: LruCache<String, CacheEntry<V>>,
    max_age: Duration,
    policy: EvictionPolicy,
    hits: u64,
    misses: u64,
}

impl<V> ScoreCache<V> {
    /// Cria um cache FIFO.
    ///
    /// # Argumentos
    /// - `max_size`: Número máximo de entradas
    /// - `max_age`: Idade a partir da qual `sweep` remove a entrada
    pub fn new(max_size: usize, max_age: Duration) -> Self {
        Self::with_policy(max_size, max_age, EvictionPolicy::Fifo)
    }

    /// Cria um cache com a política de remoção informada.
    pub fn with_policy(max_size: usize, max_age: Duration, policy: EvictionPolicy) -> Self {
        let cap = NonZeroUsize::new(max_size).unwrap_or(FALLBACK_CAPACITY);
        Self {
            entries: LruCache::new(cap),
            max_age,
            policy,
            hits: 0,
            misses: 0,
        }
    }

    /// Cria um cache a partir da configuração.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_policy(config.max_size, config.max_age(), config.eviction)
    }

    /// Busca no cache, contando acerto ou erro.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let entry = match self.policy {
            EvictionPolicy::Fifo => self.entries.peek_mut(key),
            EvictionPolicy::Lru => self.entries.get_mut(key),
        };

        match entry {
            Some(entry) => {
                self.hits += 1;
                entry.access_count += 1;
                Some(&entry.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insere no cache, removendo a entrada mais antiga se estiver cheio.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        self.insert_entry(key.into(), CacheEntry::new(value));
    }

    /// Insere com horário de inserção explícito.
    pub fn put_with_timestamp(
        &mut self,
        key: impl Into<String>,
        value: V,
        inserted_at: DateTime<Utc>,
    ) {
        self.insert_entry(key.into(), CacheEntry::with_timestamp(value, inserted_at));
    }

    fn insert_entry(&mut self, key: String, entry: CacheEntry<V>) {
        if !self.entries.contains(&key) && self.entries.len() >= self.entries.cap().get() {
            if let Some((evicted, _)) = self.entries.pop_lru() {
                tracing::debug!(key = %super::fingerprint(&evicted), "Evicted oldest cache entry");
            }
        }
        self.entries.put(key, entry);
    }

    /// Consulta uma entrada sem afetar contadores nem ordem.
    pub fn peek_entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.peek(key)
    }

    /// Verifica se a chave está presente sem afetar contadores.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Remove entradas mais velhas que a idade máxima.
    ///
    /// Retorna quantas foram removidas.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Remove entradas expiradas tomando `now` como horário atual.
    pub fn sweep_at(&mut self, now: DateTime<Utc>) -> usize {
        // Coleta chaves expiradas
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(self.max_age, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.pop(key);
        }

        if !expired_keys.is_empty() {
            tracing::debug!(removed = expired_keys.len(), "Removed expired cache entries");
        }

        expired_keys.len()
    }

    /// Esvazia o cache e zera os contadores.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.entries.cap().get(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: CacheStats::compute_hit_rate(self.hits, self.misses),
        }
    }

    /// Número de entradas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Se o cache está vazio.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Idade máxima configurada.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Política de remoção.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}
