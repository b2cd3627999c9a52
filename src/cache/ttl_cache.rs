//! Cache en memoria con TTL
//!
//! Memoización de resultados de proveedores con expiración perezosa: una
//! entrada vencida se elimina en la lectura que la descubre. No hay tarea de
//! limpieza en segundo plano ni límite de tamaño.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::debug;

/// Fuente de tiempo inyectable
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj manual para tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Valor en cache con su instante de inserción
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

/// Estadísticas del cache
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_created: u64,
    pub entries_expired: u64,
    pub size: usize,
}

pub struct TtlCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    stats: RwLock<CacheStats>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            ttl,
            clock,
        }
    }

    /// Obtener un valor vigente; una entrada vencida se elimina aquí mismo
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().await;
        let mut stats = self.stats.write().await;

        let Some(entry) = entries.get(key) else {
            stats.misses += 1;
            debug!("[{}] cache miss: {}", self.name, key);
            return None;
        };

        if self.clock.now() - entry.stored_at > self.ttl {
            entries.remove(key);
            stats.entries_expired += 1;
            stats.misses += 1;
            debug!("[{}] cache miss (expired): {}", self.name, key);
            return None;
        }

        stats.hits += 1;
        debug!("[{}] cache hit: {}", self.name, key);
        Some(entry.value.clone())
    }

    /// Guardar un valor y devolverlo; el último escritor gana
    pub async fn put(&self, key: &str, value: V) -> V {
        let entry = CacheEntry {
            value: value.clone(),
            stored_at: self.clock.now(),
        };

        self.entries.write().await.insert(key.to_string(), entry);
        self.stats.write().await.entries_created += 1;
        debug!("[{}] cache store: {}", self.name, key);
        value
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        let mut stats = *self.stats.read().await;
        stats.size = self.len().await;
        stats
    }
}
