// eviction.rs - Which source slot a new drop overwrites
//
// The source pool never rejects an injection; it picks a victim instead.

use serde::{Deserialize, Serialize};

use super::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Cycle through the slots regardless of what they hold.
    RoundRobin,
    /// Overwrite the slot with the lowest current amplitude (first one on ties).
    WeakestFirst,
}

/// Eviction policy plus the cursor the round-robin strategy carries.
#[derive(Debug, Clone)]
pub struct SourceEviction {
    policy: EvictionPolicy,
    cursor: usize,
}

impl SourceEviction {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self { policy, cursor: 0 }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Slot the next round-robin injection lands on.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Choose the slot to overwrite. `sources` is never empty.
    pub fn select(&mut self, sources: &[Source]) -> usize {
        match self.policy {
            EvictionPolicy::RoundRobin => {
                let slot = self.cursor % sources.len();
                self.cursor = (slot + 1) % sources.len();
                slot
            }
            EvictionPolicy::WeakestFirst => weakest(sources),
        }
    }
}

fn weakest(sources: &[Source]) -> usize {
    let mut best = 0;
    let mut best_amp = f32::INFINITY;
    for (i, s) in sources.iter().enumerate() {
        if s.amplitude() < best_amp {
            best = i;
            best_amp = s.amplitude();
        }
    }
    best
}
