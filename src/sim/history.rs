//! Per-session roll history
//!
//! Kept in memory only; records every resolved outcome.

use serde::{Deserialize, Serialize};

/// Maximum number of recent outcomes to keep
pub const MAX_RECENT: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollHistory {
    /// Count of each face, index 0 is face 1
    counts: [u32; 6],
    total: u32,
    /// Most recent outcomes (newest first)
    recent: Vec<u8>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved outcome; values outside 1..=6 are ignored
    pub fn record(&mut self, value: u8) {
        if !(1..=6).contains(&value) {
            log::warn!("ignoring out-of-range outcome {value}");
            return;
        }
        self.counts[usize::from(value - 1)] += 1;
        self.total += 1;
        self.recent.insert(0, value);
        self.recent.truncate(MAX_RECENT);
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn count(&self, value: u8) -> u32 {
        match value {
            1..=6 => self.counts[usize::from(value - 1)],
            _ => 0,
        }
    }

    /// Observed share of rolls showing `value`
    pub fn frequency(&self, value: u8) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.count(value) as f32 / self.total as f32
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.recent.first().copied()
    }

    pub fn recent(&self) -> &[u8] {
        &self.recent
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
