//! Fixed pool of exclusive resource slots.
use std::time::Instant;

use sweep_model::{Slot, SlotIndex};
use tracing::{trace, warn};

/// Acquire/release record kept by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    Acquired { slot: SlotIndex, at: Instant },
    Released { slot: SlotIndex, at: Instant },
}

impl SlotEvent {
    pub fn slot(&self) -> SlotIndex {
        match self {
            SlotEvent::Acquired { slot, .. } | SlotEvent::Released { slot, .. } => *slot,
        }
    }
}

/// Ordered slots with an in-use flag each.
///
/// An empty slot list behaves as one implicit, unlabelled slot: capacity 1, no flags injected.
#[derive(Debug, Clone)]
pub struct SlotPool {
    slots: Vec<Slot>,
    in_use: Vec<bool>,
    history: Vec<SlotEvent>,
}

impl SlotPool {
    pub fn new(slots: Vec<Slot>) -> Self {
        let capacity = slots.len().max(1);
        Self {
            slots,
            in_use: vec![false; capacity],
            history: Vec::new(),
        }
    }

    /// Number of jobs that may run at once: `max(1, slots)`.
    pub fn capacity(&self) -> usize {
        self.in_use.len()
    }

    pub fn in_use(&self) -> usize {
        self.in_use.iter().filter(|u| **u).count()
    }

    pub fn is_full(&self) -> bool {
        self.in_use.iter().all(|u| *u)
    }

    /// Take the lowest-index free slot.
    pub fn acquire(&mut self) -> Option<SlotIndex> {
        let index = self.in_use.iter().position(|u| !*u)?;
        self.in_use[index] = true;
        self.history.push(SlotEvent::Acquired {
            slot: index,
            at: Instant::now(),
        });
        trace!(target: "sweep.core.pool", slot = index, "slot acquired");
        Some(index)
    }

    /// Mark `index` free again; returns `false` if it was not held.
    pub fn release(&mut self, index: SlotIndex) -> bool {
        match self.in_use.get_mut(index) {
            Some(used) if *used => {
                *used = false;
                self.history.push(SlotEvent::Released {
                    slot: index,
                    at: Instant::now(),
                });
                trace!(target: "sweep.core.pool", slot = index, "slot released");
                true
            }
            _ => {
                warn!(target: "sweep.core.pool", slot = index, "release of a slot that is not held");
                false
            }
        }
    }

    /// Configured slot behind `index`; `None` for the implicit slot.
    pub fn slot(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Flag tokens of `index` for reports, `None` for the implicit slot.
    pub fn label(&self, index: SlotIndex) -> Option<String> {
        self.slot(index).map(Slot::label)
    }

    /// Every acquire and release in the order they happened.
    pub fn history(&self) -> &[SlotEvent] {
        &self.history
    }
}
