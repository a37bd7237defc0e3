//! Deferred disposal of displaced resources
//!
//! A texture displaced from a material may still be referenced by the
//! frame in flight, so it is never freed immediately: entries sit in this
//! queue for a short delay and the binder re-checks liveness (cache
//! ownership, remaining material references) before actually freeing
//! anything. Entries are keyed through a generational slotmap, so a stale
//! handle can never reach a live entry.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::scene::material::TextureAttachment;

new_key_type! {
    /// Generational key for a pending disposal entry
    pub struct DisposalKey;
}

/// A displaced attachment waiting out its disposal delay
#[derive(Debug)]
struct PendingFree {
    attachment: TextureAttachment,
    due_at: f64,
}

/// Queue of displaced attachments awaiting disposal
#[derive(Debug)]
pub struct DisposalQueue {
    pending: SlotMap<DisposalKey, PendingFree>,
    delay: f64,
}

impl Default for DisposalQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl DisposalQueue {
    /// Delay between displacement and the disposal attempt
    ///
    /// Long enough for the renderer to complete at least one frame on the
    /// replacement material before a possibly-shared texture is freed.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    /// Create a queue with the given disposal delay
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: SlotMap::with_key(),
            delay: delay.as_secs_f64(),
        }
    }

    /// Schedule a displaced attachment for a disposal attempt
    pub fn schedule(&mut self, attachment: TextureAttachment, now: f64) -> DisposalKey {
        let due_at = now + self.delay;
        log::trace!("scheduled disposal of displaced attachment at t={due_at:.3}");
        self.pending.insert(PendingFree { attachment, due_at })
    }

    /// Remove and return every entry whose delay has elapsed
    pub fn drain_due(&mut self, now: f64) -> Vec<TextureAttachment> {
        let due: Vec<DisposalKey> = self
            .pending
            .iter()
            .filter(|(_, entry)| entry.due_at <= now)
            .map(|(key, _)| key)
            .collect();
        due.into_iter()
            .filter_map(|key| self.pending.remove(key))
            .map(|entry| entry.attachment)
            .collect()
    }

    /// Number of entries still waiting
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop all pending entries without freeing anything
    ///
    /// Used at teardown, where the cache and canvas owners dispose their
    /// resources directly.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
