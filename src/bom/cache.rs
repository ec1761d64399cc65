//! Caller-owned cache of resolved BOMs
//!
//! A BOM checkout is ephemeral, so entries only live as long as the cache
//! object; call [`BomCache::clear`] when the run ends.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::bom::set::ResolvedVersionSet;

type Slot = Arc<OnceCell<Arc<ResolvedVersionSet>>>;

/// Resolved version sets keyed by train branch.
///
/// The first caller for a key resolves it while concurrent callers wait;
/// afterwards the set is shared read-only.
#[derive(Default)]
pub struct BomCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl BomCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &str) -> Slot {
        self.lock_slots()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Cached set for the key, if already resolved
    pub fn get(&self, key: &str) -> Option<Arc<ResolvedVersionSet>> {
        self.lock_slots()
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    /// Return the cached set or resolve it exactly once.
    ///
    /// A failed resolution leaves the key empty so a later call can retry.
    pub async fn get_or_try_resolve<F, Fut, E>(
        &self,
        key: &str,
        resolve: F,
    ) -> Result<Arc<ResolvedVersionSet>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResolvedVersionSet, E>>,
    {
        let slot = self.slot(key);
        if let Some(set) = slot.get() {
            debug!("BOM cache hit for {}", key);
            return Ok(set.clone());
        }

        let set = slot
            .get_or_try_init(|| async {
                info!("Resolving BOM for {}", key);
                resolve().await.map(Arc::new)
            })
            .await?;
        Ok(set.clone())
    }

    /// Drop the entry for a key
    pub fn invalidate(&self, key: &str) {
        if self.lock_slots().remove(key).is_some() {
            debug!("Invalidated BOM cache entry {}", key);
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut slots = self.lock_slots();
        debug!("Clearing {} BOM cache entries", slots.len());
        slots.clear();
    }

    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
