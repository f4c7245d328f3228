use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::codec::{decode, encode, try_decode};
use super::{ProgressMap, StorageBackend};

/// Key every book's progress is stored under.
pub const STORAGE_KEY: &str = "readtrack-reading-progress";

pub struct ProgressStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> ProgressStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the stored map. Missing, unreadable or corrupt storage yields an
    /// empty map.
    pub fn load(&self) -> ProgressMap {
        match self.backend.read(&self.key) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => ProgressMap::new(),
            Err(err) => {
                warn!(key = %self.key, "reading progress unavailable, starting empty: {err:#}");
                ProgressMap::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<ProgressMap> {
        let raw = self
            .backend
            .read(&self.key)
            .with_context(|| format!("failed to read reading progress under {}", self.key))?;
        match raw {
            Some(raw) => try_decode(&raw),
            None => Ok(ProgressMap::new()),
        }
    }

    /// Overwrites the stored blob with `map`. Failures are logged, not returned.
    pub fn save(&self, map: &ProgressMap) {
        if let Err(err) = self.try_save(map) {
            warn!(key = %self.key, "reading progress not saved: {err:#}");
        }
    }

    pub fn try_save(&self, map: &ProgressMap) -> Result<()> {
        let raw = encode(map)?;
        self.backend
            .write(&self.key, &raw)
            .with_context(|| format!("failed to write reading progress under {}", self.key))?;
        debug!(key = %self.key, books = map.len(), "saved reading progress");
        Ok(())
    }
}
