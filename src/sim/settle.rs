//! Settle detection
//!
//! A die counts as settled once its combined linear and angular speed has
//! stayed below a threshold for a run of consecutive frames. This is
//! independent of the physics world's sleep flag.

use serde::{Deserialize, Serialize};

use crate::tuning::SettleParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleDetector {
    threshold: f32,
    required_frames: u32,
    stable_frames: u32,
}

impl SettleDetector {
    pub fn new(params: &SettleParams) -> Self {
        Self {
            threshold: params.motion_threshold,
            required_frames: params.frames,
            stable_frames: 0,
        }
    }

    /// Record one frame's motion; returns true once the still run is long enough
    pub fn observe(&mut self, motion: f32) -> bool {
        if motion < self.threshold {
            self.stable_frames += 1;
        } else {
            if self.stable_frames > 0 {
                log::debug!("settle run broken after {} frames (motion {motion:.3})", self.stable_frames);
            }
            self.stable_frames = 0;
        }
        self.stable_frames >= self.required_frames
    }

    pub fn reset(&mut self) {
        self.stable_frames = 0;
    }

    /// Current run of consecutive still frames
    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }
}

impl Default for SettleDetector {
    fn default() -> Self {
        Self::new(&SettleParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_on_eighteenth_still_frame() {
        let mut settle = SettleDetector::default();
        for _ in 0..17 {
            assert!(!settle.observe(0.05));
        }
        assert!(settle.observe(0.05));
    }

    #[test]
    fn test_single_dip_does_not_settle() {
        let mut settle = SettleDetector::default();
        for _ in 0..17 {
            assert!(!settle.observe(1.0));
        }
        assert!(!settle.observe(0.1));
        assert_eq!(settle.stable_frames(), 1);
        assert!(!settle.observe(0.5));
        assert_eq!(settle.stable_frames(), 0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut settle = SettleDetector::default();
        settle.observe(0.13);
        assert_eq!(settle.stable_frames(), 0);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut settle = SettleDetector::default();
        for _ in 0..10 {
            settle.observe(0.0);
        }
        settle.reset();
        assert_eq!(settle.stable_frames(), 0);
    }
}
