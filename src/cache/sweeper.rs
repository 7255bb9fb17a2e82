//! Varredura periódica do cache em background.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::store::ScoreCache;
use crate::types::responses::ScoreResult;
use crate::{MetalcaError, MetalcaResult};

/// Cache compartilhado entre o servidor e o sweeper.
pub type SharedCache<V = ScoreResult> = Arc<Mutex<ScoreCache<V>>>;

/// Cria um cache compartilhado.
pub fn shared<V>(cache: ScoreCache<V>) -> SharedCache<V> {
    Arc::new(Mutex::new(cache))
}

/// Trava o cache. Um lock envenenado ainda guarda um mapa consistente,
/// já que nenhuma operação do cache entra em pânico no meio de uma escrita.
pub fn lock_cache<V>(cache: &Mutex<ScoreCache<V>>) -> MutexGuard<'_, ScoreCache<V>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tarefa que chama `sweep()` no cache a cada intervalo.
///
/// Precisa de `start()` explícito dentro de um runtime tokio; `stop()`
/// (ou drop) encerra a tarefa.
pub struct CacheSweeper<V = ScoreResult> {
    cache: SharedCache<V>,
    interval: Duration,
    shutdown: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl<V: Send + 'static> CacheSweeper<V> {
    /// Cria um sweeper parado.
    pub fn new(cache: SharedCache<V>, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            shutdown: None,
            handle: None,
        }
    }

    /// Inicia a varredura periódica. Chamar de novo com a tarefa ativa não faz nada.
    pub fn start(&mut self) -> MetalcaResult<()> {
        if self.is_running() {
            tracing::debug!("Cache sweeper already running");
            return Ok(());
        }

        if self.interval.is_zero() {
            return Err(MetalcaError::config("sweep interval must be greater than zero"));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MetalcaError::Runtime(e.to_string()))?;

        let (tx, mut rx) = watch::channel(false);
        let cache = Arc::clone(&self.cache);
        let period = self.interval;

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // O primeiro tick é imediato
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = lock_cache(&cache).sweep();
                        if removed > 0 {
                            tracing::info!(removed, "Swept expired cache entries");
                        }
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Cache sweeper stopped");
        });

        tracing::info!(interval_secs = period.as_secs(), "Cache sweeper started");

        self.shutdown = Some(tx);
        self.handle = Some(handle);
        Ok(())
    }

    /// Para a varredura.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Se a tarefa de varredura está ativa.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Intervalo entre varreduras.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl<V> Drop for CacheSweeper<V> {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn aged_cache() -> SharedCache<i32> {
        let mut cache = ScoreCache::new(10, Duration::from_secs(30 * 60));
        cache.put_with_timestamp("old", 1, Utc::now() - chrono::Duration::hours(1));
        cache.put("fresh", 2);
        shared(cache)
    }

    #[tokio::test]
    async fn test_sweeper_purges_expired_entries() {
        let cache = aged_cache();
        let mut sweeper = CacheSweeper::new(Arc::clone(&cache), Duration::from_millis(10));

        sweeper.start().unwrap();
        assert!(sweeper.is_running());

        tokio::time::sleep(Duration::from_millis(100)).await;

        {
            let guard = lock_cache(&cache);
            assert!(!guard.contains("old"));
            assert!(guard.contains("fresh"));
        }

        sweeper.stop();
        assert!(!sweeper.is_running());
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mut sweeper = CacheSweeper::new(aged_cache(), Duration::from_secs(60));

        sweeper.start().unwrap();
        sweeper.start().unwrap();
        assert!(sweeper.is_running());

        sweeper.stop();
        sweeper.stop();
        assert!(!sweeper.is_running());
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let mut sweeper = CacheSweeper::new(aged_cache(), Duration::ZERO);
        assert!(matches!(sweeper.start(), Err(MetalcaError::Config(_))));
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let mut sweeper = CacheSweeper::new(aged_cache(), Duration::from_secs(60));
        assert!(matches!(sweeper.start(), Err(MetalcaError::Runtime(_))));
    }
}
