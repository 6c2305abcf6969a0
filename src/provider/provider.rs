use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::TokenizeError;
use crate::tokenizer::TokenizerHandle;
use super::fetcher::TokenizerFetcher;

type Slot = Arc<OnceCell<TokenizerHandle>>;

/// Process-wide tokenizer cache.
///
/// Built once at startup and shared by every request. Loaded entries are
/// never evicted; the cache lives exactly as long as the process. Names whose
/// load failed or was abandoned leave nothing behind.
pub struct TokenizerProvider {
    fetcher: Arc<dyn TokenizerFetcher>,
    slots: RwLock<HashMap<String, Slot>>,
}

impl TokenizerProvider {
    pub fn new(fetcher: Arc<dyn TokenizerFetcher>) -> Self {
        Self {
            fetcher,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the tokenizer for `name`, fetching it on first use.
    ///
    /// Concurrent callers for the same unseen name share a single fetch. A
    /// failed fetch is not remembered, so the next call retries it.
    pub async fn resolve(&self, name: &str, credential: &str) -> Result<TokenizerHandle, TokenizeError> {
        let slot = self.slot(name);

        if let Some(handle) = slot.get() {
            debug!(tokenizer = name, "Tokenizer cache hit");
            return Ok(Arc::clone(handle));
        }

        // Drops the slot again if this load fails or is abandoned
        let pending = PendingSlot { provider: self, name, slot };

        let handle = pending
            .slot
            .get_or_try_init(|| async {
                info!(tokenizer = name, "Loading tokenizer");
                let started = Instant::now();
                match self.fetcher.fetch(name, credential).await {
                    Ok(handle) => {
                        info!(
                            tokenizer = name,
                            vocab_size = handle.vocab_size(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Tokenizer loaded"
                        );
                        Ok(handle)
                    }
                    Err(e) => {
                        warn!(tokenizer = name, error = %e, "Tokenizer load failed");
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Names of every tokenizer currently loaded, sorted
    pub fn cached_names(&self) -> Vec<String> {
        let slots = self.read_slots();
        let mut names: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Number of tokenizers currently loaded
    pub fn cached_count(&self) -> usize {
        self.cached_names().len()
    }

    fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self.read_slots().get(name) {
            return Arc::clone(slot);
        }

        let mut slots = self.write_slots();
        Arc::clone(slots.entry(name.to_string()).or_default())
    }

    /// Removes `name` from the map if `slot` is still its entry, is still
    /// empty, and nobody but the map and the caller holds it.
    fn forget_if_empty(&self, name: &str, slot: &Slot) {
        let mut slots = self.write_slots();
        let unused = slots
            .get(name)
            .map(|stored| Arc::ptr_eq(stored, slot) && !stored.initialized() && Arc::strong_count(stored) == 2)
            .unwrap_or(false);
        if unused {
            slots.remove(name);
            debug!(tokenizer = name, "Dropped empty tokenizer slot");
        }
    }

    // The map only holds `Arc`s, so a panic while it was locked cannot leave
    // it half-updated
    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<String, Slot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<String, Slot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot some caller is loading into, cleaned up on drop if still empty
struct PendingSlot<'a> {
    provider: &'a TokenizerProvider,
    name: &'a str,
    slot: Slot,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        if !self.slot.initialized() {
            self.provider.forget_if_empty(self.name, &self.slot);
        }
    }
}
