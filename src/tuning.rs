//! Data-driven physical and roll constants
//!
//! Every number the core depends on lives here so a host can load a tweaked
//! set from JSON. Defaults reproduce `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Physics world parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub gravity: f32,
    pub fixed_dt: f32,
    pub max_substeps: u32,
    pub solver_iterations: u32,
    pub allow_sleep: bool,
    pub default_friction: f32,
    pub default_restitution: f32,
    pub arena_friction: f32,
    pub arena_restitution: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            fixed_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            solver_iterations: SOLVER_ITERATIONS,
            allow_sleep: true,
            default_friction: DEFAULT_FRICTION,
            default_restitution: DEFAULT_RESTITUTION,
            arena_friction: ARENA_FRICTION,
            arena_restitution: ARENA_RESTITUTION,
        }
    }
}

/// Enclosing floor and walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaParams {
    pub floor_y: f32,
    /// Distance from the arena center to the inner face of each wall
    pub half_size: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self {
            floor_y: FLOOR_Y,
            half_size: ARENA_HALF_SIZE,
            wall_thickness: WALL_THICKNESS,
            wall_height: WALL_HEIGHT,
        }
    }
}

/// Die rigid body parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DieParams {
    pub mass: f32,
    pub half_extent: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_time_limit: f32,
    pub sleep_speed_limit: f32,
    /// Height of the die before the first roll
    pub rest_height: f32,
}

impl Default for DieParams {
    fn default() -> Self {
        Self {
            mass: DIE_MASS,
            half_extent: DIE_HALF_EXTENT,
            linear_damping: DIE_LINEAR_DAMPING,
            angular_damping: DIE_ANGULAR_DAMPING,
            sleep_time_limit: DIE_SLEEP_TIME_LIMIT,
            sleep_speed_limit: DIE_SLEEP_SPEED_LIMIT,
            rest_height: DIE_REST_HEIGHT,
        }
    }
}

/// Randomized launch ranges. Each range is `min + u * range` with `u` in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchParams {
    /// Full width of the horizontal spawn square around the arena center
    pub spawn_spread: f32,
    pub spawn_height: f32,
    pub spawn_height_jitter: f32,
    pub lateral_min: f32,
    pub lateral_range: f32,
    pub lift_min: f32,
    pub lift_range: f32,
    pub spin: f32,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            spawn_spread: SPAWN_SPREAD,
            spawn_height: DIE_REST_HEIGHT,
            spawn_height_jitter: SPAWN_HEIGHT_JITTER,
            lateral_min: LATERAL_IMPULSE_MIN,
            lateral_range: LATERAL_IMPULSE_RANGE,
            lift_min: LIFT_IMPULSE_MIN,
            lift_range: LIFT_IMPULSE_RANGE,
            spin: SPIN,
        }
    }
}

/// Settle detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleParams {
    pub motion_threshold: f32,
    pub frames: u32,
}

impl Default for SettleParams {
    fn default() -> Self {
        Self {
            motion_threshold: SETTLE_MOTION_THRESHOLD,
            frames: SETTLE_FRAMES,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldParams,
    pub arena: ArenaParams,
    pub die: DieParams,
    pub launch: LaunchParams,
    pub settle: SettleParams,
}

impl Tuning {
    /// Parse and validate a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
            }
        }
        fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be in [0, 1], got {value}")))
            }
        }
        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be non-negative, got {value}")))
            }
        }

        positive("world.gravity", self.world.gravity)?;
        positive("world.fixed_dt", self.world.fixed_dt)?;
        if self.world.max_substeps == 0 {
            return Err(ConfigError::invalid("world.max_substeps", "must be at least 1"));
        }
        if self.world.solver_iterations == 0 {
            return Err(ConfigError::invalid("world.solver_iterations", "must be at least 1"));
        }
        non_negative("world.default_friction", self.world.default_friction)?;
        unit("world.default_restitution", self.world.default_restitution)?;
        non_negative("world.arena_friction", self.world.arena_friction)?;
        unit("world.arena_restitution", self.world.arena_restitution)?;

        positive("arena.half_size", self.arena.half_size)?;
        positive("arena.wall_thickness", self.arena.wall_thickness)?;
        positive("arena.wall_height", self.arena.wall_height)?;

        positive("die.mass", self.die.mass)?;
        positive("die.half_extent", self.die.half_extent)?;
        if self.die.half_extent * 2.0 >= self.arena.half_size {
            return Err(ConfigError::invalid("die.half_extent", "die does not fit in the arena"));
        }
        unit("die.linear_damping", self.die.linear_damping)?;
        unit("die.angular_damping", self.die.angular_damping)?;
        non_negative("die.sleep_time_limit", self.die.sleep_time_limit)?;
        non_negative("die.sleep_speed_limit", self.die.sleep_speed_limit)?;

        non_negative("launch.spawn_spread", self.launch.spawn_spread)?;
        non_negative("launch.spawn_height_jitter", self.launch.spawn_height_jitter)?;
        non_negative("launch.lateral_range", self.launch.lateral_range)?;
        non_negative("launch.lift_range", self.launch.lift_range)?;
        non_negative("launch.spin", self.launch.spin)?;

        positive("settle.motion_threshold", self.settle.motion_threshold)?;
        if self.settle.frames == 0 {
            return Err(ConfigError::invalid("settle.frames", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.world.solver_iterations, 12);
        assert_eq!(t.world.max_substeps, 5);
        assert_eq!(t.settle.frames, 18);
        assert!((t.settle.motion_threshold - 0.13).abs() < 1e-6);
        assert!((t.die.linear_damping - 0.23).abs() < 1e-6);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let t = Tuning::from_json(r#"{ "settle": { "frames": 30 } }"#).unwrap();
        assert_eq!(t.settle.frames, 30);
        assert!((t.settle.motion_threshold - SETTLE_MOTION_THRESHOLD).abs() < 1e-6);
        assert_eq!(t.die, DieParams::default());
    }

    #[test]
    fn test_rejects_zero_mass() {
        let err = Tuning::from_json(r#"{ "die": { "mass": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "die.mass", .. }));
    }

    #[test]
    fn test_rejects_bad_restitution() {
        let err = Tuning::from_json(r#"{ "world": { "arena_restitution": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "world.arena_restitution",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_json_survives_reload() {
        let mut t = Tuning::default();
        t.launch.spin = 4.0;
        let json = t.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), t);
    }
}
