//! Camera follow
//!
//! A virtual camera that chases the die's horizontal position with a damped
//! vertical bias. Updated once per rendered frame, never read by physics.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the per-frame blend toward the desired camera state is computed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraSmoothing {
    /// Fixed blend per frame; the smoothing rate follows the frame rate
    PerFrame { blend: f32 },
    /// Blend of `1 - exp(-rate * dt)`, independent of frame rate
    TimeCompensated { rate: f32 },
}

impl Default for CameraSmoothing {
    fn default() -> Self {
        CameraSmoothing::PerFrame {
            blend: CAMERA_BLEND,
        }
    }
}

impl CameraSmoothing {
    /// Interpolation factor for a frame lasting `wall_dt` seconds
    pub fn factor(&self, wall_dt: f32) -> f32 {
        match *self {
            CameraSmoothing::PerFrame { blend } => blend,
            CameraSmoothing::TimeCompensated { rate } => 1.0 - (-rate * wall_dt.max(0.0)).exp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFollow {
    /// Smoothed look-at point
    pub target: Vec3,
    /// Smoothed eye position
    pub position: Vec3,
    pub offset: Vec3,
    pub smoothing: CameraSmoothing,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new(CameraSmoothing::default())
    }
}

impl CameraFollow {
    pub fn new(smoothing: CameraSmoothing) -> Self {
        Self {
            target: Vec3::ZERO,
            position: CAMERA_OFFSET,
            offset: CAMERA_OFFSET,
            smoothing,
        }
    }

    /// Look-at point the camera is chasing for a die at `die_position`
    pub fn desired_target(die_position: Vec3) -> Vec3 {
        Vec3::new(
            die_position.x,
            (die_position.y * CAMERA_LOOK_Y_SCALE).max(CAMERA_MIN_LOOK_Y),
            die_position.z,
        )
    }

    /// Chase the die using the unscaled wall-clock frame delta
    pub fn update(&mut self, die_position: Vec3, wall_dt: f32) {
        let t = self.smoothing.factor(wall_dt);
        self.target = self.target.lerp(Self::desired_target(die_position), t);
        let desired_position = self.target + self.offset;
        self.position = self.position.lerp(desired_position, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_target_biases_height() {
        let t = CameraFollow::desired_target(Vec3::new(1.0, 2.0, -3.0));
        assert!((t - Vec3::new(1.0, 0.4, -3.0)).length() < 1e-6);
        let low = CameraFollow::desired_target(Vec3::new(0.0, -1.0, 0.0));
        assert!((low.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_per_frame_blend_moves_ten_percent() {
        let mut cam = CameraFollow::default();
        cam.update(Vec3::new(10.0, 0.0, 0.0), 1.0 / 60.0);
        assert!((cam.target.x - 1.0).abs() < 1e-5);
        // Ignores frame duration entirely
        let mut slow = CameraFollow::default();
        slow.update(Vec3::new(10.0, 0.0, 0.0), 0.5);
        assert_eq!(slow.target, cam.target);
    }

    #[test]
    fn test_converges_to_offset_above_die() {
        let mut cam = CameraFollow::default();
        let die = Vec3::new(2.0, -1.0, 1.0);
        for _ in 0..500 {
            cam.update(die, 1.0 / 60.0);
        }
        let target = CameraFollow::desired_target(die);
        assert!((cam.target - target).length() < 1e-3);
        assert!((cam.position - (target + CAMERA_OFFSET)).length() < 1e-3);
    }

    #[test]
    fn test_time_compensated_is_frame_rate_independent() {
        let smoothing = CameraSmoothing::TimeCompensated { rate: 6.0 };
        let die = Vec3::new(5.0, 0.0, 0.0);

        let mut fast = CameraFollow::new(smoothing);
        for _ in 0..120 {
            fast.update(die, 1.0 / 120.0);
        }
        let mut slow = CameraFollow::new(smoothing);
        for _ in 0..30 {
            slow.update(die, 1.0 / 30.0);
        }
        assert!((fast.target.x - slow.target.x).abs() < 1e-3);
    }
}
