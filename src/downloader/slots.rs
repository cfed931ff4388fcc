//! Per-slot download supersession.
//!
//! A UI tile shows at most one download at a time. Claiming a slot cancels
//! whatever download currently owns it, so a new request for the same tile
//! supersedes the old one.
//!
//! ```rust
//! use streamdl::downloader::DownloadSlots;
//!
//! let slots = DownloadSlots::new();
//! let first = slots.claim("art-42");
//! let second = slots.claim("art-42");
//! assert!(first.token().is_cancelled());
//! assert!(!second.token().is_cancelled());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
struct SlotEntry {
    generation: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct Registry {
    next_generation: u64,
    entries: HashMap<String, SlotEntry>,
}

/// Registry of in-flight downloads keyed by UI slot.
#[derive(Debug, Clone, Default)]
pub struct DownloadSlots {
    inner: Arc<Mutex<Registry>>,
}

impl DownloadSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take ownership of `slot`, cancelling its previous owner.
    pub fn claim(&self, slot: &str) -> SlotGuard {
        let token = CancellationToken::new();
        let mut registry = self.registry();
        registry.next_generation += 1;
        let generation = registry.next_generation;

        let previous = registry.entries.insert(
            slot.to_string(),
            SlotEntry {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            debug!("Slot {} superseded, cancelling previous download", slot);
            previous.token.cancel();
        }

        SlotGuard {
            slots: self.clone(),
            slot: slot.to_string(),
            generation,
            token,
        }
    }

    /// Cancel the download owning `slot`, if any.
    pub fn cancel(&self, slot: &str) -> bool {
        match self.registry().entries.remove(slot) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every in-flight download.
    pub fn cancel_all(&self) {
        for (_, entry) in self.registry().entries.drain() {
            entry.token.cancel();
        }
    }

    /// Number of slots with a download in flight.
    pub fn active(&self) -> usize {
        self.registry().entries.len()
    }

    fn release(&self, slot: &str, generation: u64) {
        let mut registry = self.registry();
        if registry
            .entries
            .get(slot)
            .is_some_and(|entry| entry.generation == generation)
        {
            registry.entries.remove(slot);
        }
    }
}

/// Ownership of a slot for the duration of one download.
///
/// Dropping the guard frees the slot unless a newer download claimed it.
#[derive(Debug)]
pub struct SlotGuard {
    slots: DownloadSlots,
    slot: String,
    generation: u64,
    token: CancellationToken,
}

impl SlotGuard {
    /// Token cancelled when the slot is superseded or cancelled.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The slot this guard owns.
    pub fn slot(&self) -> &str {
        &self.slot
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.slots.release(&self.slot, self.generation);
    }
}
