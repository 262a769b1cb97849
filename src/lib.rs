//! Dice Roller - a physically simulated six-sided die
//!
//! Core modules:
//! - `sim`: Roll resolution core (physics world, die body, roll state machine,
//!   settle detection, outcome resolution, camera follow, timing)
//! - `tuning`: Data-driven physical and roll constants
//! - `settings`: User preferences (speed, camera smoothing, seed)
//! - `platform`: Browser bindings for a JavaScript host

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::Settings;
pub use sim::{DiceSim, RigidPose, RollState, TickInput, TickReport};
pub use tuning::Tuning;

use glam::{EulerRot, Quat};

/// Engine configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed physics timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum internal steps per world step call
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Contact solver iterations per internal step
    pub const SOLVER_ITERATIONS: u32 = 12;
    /// Downward gravitational acceleration (units/s²)
    pub const GRAVITY: f32 = 9.82;

    /// Fallback contact material
    pub const DEFAULT_FRICTION: f32 = 0.38;
    pub const DEFAULT_RESTITUTION: f32 = 0.34;
    /// Die against floor and walls
    pub const ARENA_FRICTION: f32 = 0.42;
    pub const ARENA_RESTITUTION: f32 = 0.33;

    /// Arena geometry
    pub const FLOOR_Y: f32 = -1.5;
    pub const ARENA_HALF_SIZE: f32 = 6.2;
    pub const WALL_THICKNESS: f32 = 0.3;
    pub const WALL_HEIGHT: f32 = 3.5;

    /// Die body
    pub const DIE_MASS: f32 = 1.0;
    pub const DIE_HALF_EXTENT: f32 = 0.5;
    pub const DIE_LINEAR_DAMPING: f32 = 0.23;
    pub const DIE_ANGULAR_DAMPING: f32 = 0.22;
    pub const DIE_SLEEP_TIME_LIMIT: f32 = 0.35;
    pub const DIE_SLEEP_SPEED_LIMIT: f32 = 0.12;
    /// Resting spawn height before the first roll
    pub const DIE_REST_HEIGHT: f32 = 2.2;

    /// Launch randomization
    pub const SPAWN_SPREAD: f32 = 1.2;
    pub const SPAWN_HEIGHT_JITTER: f32 = 0.8;
    pub const LATERAL_IMPULSE_MIN: f32 = 3.8;
    pub const LATERAL_IMPULSE_RANGE: f32 = 1.6;
    pub const LIFT_IMPULSE_MIN: f32 = 6.2;
    pub const LIFT_IMPULSE_RANGE: f32 = 1.2;
    /// Angular velocity per axis is drawn from [-SPIN, SPIN)
    pub const SPIN: f32 = 10.0;

    /// Combined |v| + |ω| below which a frame counts as still
    pub const SETTLE_MOTION_THRESHOLD: f32 = 0.13;
    /// Consecutive still frames before a roll resolves
    pub const SETTLE_FRAMES: u32 = 18;

    /// User speed multiplier bounds
    pub const SPEED_MIN: f32 = 0.25;
    pub const SPEED_MAX: f32 = 2.5;
    pub const SPEED_DEFAULT: f32 = 1.0;
    /// Wall-clock delta cap applied before speed scaling
    pub const WALL_DELTA_CAP: f32 = 0.05;
    /// Physics delta cap applied after speed scaling (tunneling guard)
    pub const PHYSICS_DELTA_CAP: f32 = 0.12;

    /// Camera follow
    pub const CAMERA_BLEND: f32 = 0.1;
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(4.7, 4.5, 5.4);
    pub const CAMERA_MIN_LOOK_Y: f32 = -0.2;
    pub const CAMERA_LOOK_Y_SCALE: f32 = 0.2;
}

/// Compose three angles as intrinsic X, then Y, then Z rotations
#[inline]
pub fn quat_from_euler_xyz(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, x, y, z)
}
