//! Content-addressed texture cache
//!
//! Memoizes synthesized textures by [`TextureKey`]. Hits return the same
//! `Arc` handed out on the original miss, so callers can rely on reference
//! identity to skip redundant material rebinds. Entries are never evicted
//! mid-session: the parameter space is quantized, so the entry count stays
//! bounded in practice. Sessions that upload many unique external images are
//! the exception and would need an eviction budget; none is implemented.

use std::collections::HashMap;
use std::sync::Arc;

use crate::device::DeviceTextureId;
use crate::synthesis::key::TextureKey;
use crate::synthesis::{SynthesisError, SynthesizedTexture};

/// Session-scoped memo of synthesized textures
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<TextureKey, Arc<SynthesizedTexture>>,
    hits: u64,
    misses: u64,
}

impl TextureCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached texture for `key`, synthesizing it on first request
    ///
    /// The returned `Arc` is identity-stable: every hit for the same key
    /// yields the same allocation as the original miss. The factory runs
    /// only on a miss; a factory error caches nothing.
    pub fn get_or_create<F>(
        &mut self,
        key: &TextureKey,
        factory: F,
    ) -> Result<Arc<SynthesizedTexture>, SynthesisError>
    where
        F: FnOnce() -> Result<SynthesizedTexture, SynthesisError>,
    {
        if let Some(texture) = self.entries.get(key) {
            self.hits += 1;
            return Ok(Arc::clone(texture));
        }

        self.misses += 1;
        let texture = Arc::new(factory()?);
        log::debug!(
            "synthesized {} texture ({} entries cached)",
            key.mode_name(),
            self.entries.len() + 1
        );
        self.entries.insert(key.clone(), Arc::clone(&texture));
        Ok(texture)
    }

    /// Look up an entry without synthesizing
    pub fn get(&self, key: &TextureKey) -> Option<Arc<SynthesizedTexture>> {
        self.entries.get(key).map(Arc::clone)
    }

    /// Whether a key is already cached
    pub fn contains(&self, key: &TextureKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether any cached texture owns the given device texture
    ///
    /// Used by the deferred-disposal pass: a displaced texture that is still
    /// cache-owned must not be freed mid-session.
    pub fn owns_device_texture(&self, id: DeviceTextureId) -> bool {
        self.entries.values().any(|t| t.device_texture() == id)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Remove and return every entry, for disposal at teardown
    pub fn drain(&mut self) -> Vec<Arc<SynthesizedTexture>> {
        self.entries.drain().map(|(_, texture)| texture).collect()
    }
}
