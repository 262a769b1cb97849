//! Roll state machine
//!
//! `Idle` → (`trigger`) → `Rolling` → (settled) → `Idle`. The controller
//! launches the die with a randomized impulse and publishes the outcome
//! exactly once per roll, after the die has stayed still long enough.

use glam::{Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::body::{DieBody, RigidPose};
use super::faces::FaceTable;
use super::settle::SettleDetector;
use crate::quat_from_euler_xyz;
use crate::tuning::{LaunchParams, SettleParams};

/// Horizontal launch vectors shorter than this (squared) fall back to +X
const MIN_LATERAL_SQ: f32 = 0.001;

/// Whether a roll is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RollState {
    #[default]
    Idle,
    Rolling,
}

/// Randomized initial conditions for one roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub pose: RigidPose,
    pub impulse: Vec3,
    pub angular_velocity: Vec3,
}

impl Launch {
    /// Draw a launch from `rng`
    pub fn sample(rng: &mut impl Rng, params: &LaunchParams) -> Self {
        let x = (rng.random::<f32>() - 0.5) * params.spawn_spread;
        let z = (rng.random::<f32>() - 0.5) * params.spawn_spread;
        let y = params.spawn_height + rng.random::<f32>() * params.spawn_height_jitter;
        let orientation = quat_from_euler_xyz(
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
            rng.random::<f32>() * PI,
        );

        let mut lateral = Vec3::new(rng.random::<f32>() - 0.5, 0.0, rng.random::<f32>() - 0.5);
        if lateral.length_squared() < MIN_LATERAL_SQ {
            lateral = Vec3::X;
        }
        let lateral = lateral.normalize();

        let impulse = Vec3::new(
            lateral.x * (params.lateral_min + rng.random::<f32>() * params.lateral_range),
            params.lift_min + rng.random::<f32>() * params.lift_range,
            lateral.z * (params.lateral_min + rng.random::<f32>() * params.lateral_range),
        );

        let spin = params.spin;
        let angular_velocity = Vec3::new(
            (rng.random::<f32>() - 0.5) * 2.0 * spin,
            (rng.random::<f32>() - 0.5) * 2.0 * spin,
            (rng.random::<f32>() - 0.5) * 2.0 * spin,
        );

        Self {
            pose: RigidPose::new(Vec3::new(x, y, z), orientation.normalize()),
            impulse,
            angular_velocity,
        }
    }

    /// Reset the die into this launch
    pub fn apply(&self, die: &mut DieBody) {
        die.teleport(self.pose);
        die.wake_up();
        die.apply_impulse(self.impulse, Vec3::ZERO);
        die.angular_velocity = self.angular_velocity;
    }
}

/// Owns the roll state, the settle counter and the launch RNG
#[derive(Debug, Clone)]
pub struct RollController {
    state: RollState,
    settle: SettleDetector,
    faces: FaceTable,
    launch: LaunchParams,
    rng: Pcg32,
    rolls: u64,
}

impl RollController {
    pub fn new(launch: LaunchParams, settle: &SettleParams, faces: FaceTable, seed: u64) -> Self {
        Self {
            state: RollState::Idle,
            settle: SettleDetector::new(settle),
            faces,
            launch,
            rng: Pcg32::seed_from_u64(seed),
            rolls: 0,
        }
    }

    pub fn state(&self) -> RollState {
        self.state
    }

    pub fn is_rolling(&self) -> bool {
        self.state == RollState::Rolling
    }

    /// Consecutive still frames in the current roll
    pub fn stable_frames(&self) -> u32 {
        self.settle.stable_frames()
    }

    pub fn faces(&self) -> &FaceTable {
        &self.faces
    }

    /// Number of rolls started so far
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    /// Start a roll. Returns false (and touches nothing) while already rolling.
    pub fn trigger(&mut self, die: &mut DieBody) -> bool {
        if self.state == RollState::Rolling {
            return false;
        }

        let launch = Launch::sample(&mut self.rng, &self.launch);
        self.settle.reset();
        self.state = RollState::Rolling;
        launch.apply(die);
        self.rolls += 1;

        log::info!(
            "roll #{} launched from ({:.2}, {:.2}, {:.2}) impulse ({:.2}, {:.2}, {:.2})",
            self.rolls,
            launch.pose.position.x,
            launch.pose.position.y,
            launch.pose.position.z,
            launch.impulse.x,
            launch.impulse.y,
            launch.impulse.z,
        );
        true
    }

    /// Place the die at a random spawn pose without launching a roll
    pub fn drop_die(&mut self, die: &mut DieBody) {
        let launch = Launch::sample(&mut self.rng, &self.launch);
        die.teleport(launch.pose);
        die.wake_up();
    }

    /// Per-frame update after the physics step. Returns the outcome on the
    /// frame the die settles, `None` otherwise.
    pub fn update(&mut self, die: &DieBody) -> Option<u8> {
        self.observe(die.motion(), die.pose.orientation)
    }

    /// Feed one frame's motion and orientation through settle detection
    pub fn observe(&mut self, motion: f32, orientation: Quat) -> Option<u8> {
        if self.state != RollState::Rolling {
            return None;
        }
        if !self.settle.observe(motion) {
            return None;
        }

        let value = self.faces.resolve(orientation);
        self.state = RollState::Idle;
        log::info!(
            "roll #{} settled after {} still frames: {value}",
            self.rolls,
            self.settle.stable_frames()
        );
        Some(value)
    }
}
