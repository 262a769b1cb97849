//! Per-frame simulation tick
//!
//! One call per rendered frame, always in the same order:
//! speed update → physics step → roll-state update → camera update.

use super::state::DiceSim;

/// Resting overlap with a wall beyond this is reported as a collision fault
const WALL_OVERLAP_TOLERANCE: f32 = 0.02;

/// Host input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a roll (ignored while rolling)
    pub roll: bool,
    /// Raw speed multiplier text from the UI
    pub speed: Option<String>,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Simulated seconds handed to the physics world
    pub physics_dt: f32,
    /// A roll started this frame
    pub roll_started: bool,
    /// Outcome of a roll that settled this frame
    pub resolved: Option<u8>,
}

/// Advance the simulation by one rendered frame of `wall_dt` seconds
pub fn tick(sim: &mut DiceSim, input: &TickInput, wall_dt: f32) -> TickReport {
    if let Some(raw) = &input.speed {
        let speed = sim.speed.set_speed(raw);
        log::debug!("speed set to {speed:.2}x from {raw:?}");
    }
    let roll_started = input.roll && sim.trigger();

    let physics_dt = sim.speed.derive_physics_delta(wall_dt);
    let world = &sim.tuning.world;
    sim.world.step(world.fixed_dt, physics_dt, world.max_substeps);

    let die = sim.world.body(sim.die);
    if !die.is_finite() {
        log::error!(
            "die state diverged after frame {}: pose {:?}, velocity {}, spin {}",
            sim.frames,
            die.pose,
            die.velocity,
            die.angular_velocity
        );
        panic!("physics diverged: non-finite die state");
    }

    let resolved = sim.roll.update(die);
    if let Some(value) = resolved {
        let overlap = sim.arena.wall_overlap(die);
        if overlap > WALL_OVERLAP_TOLERANCE {
            log::warn!(
                "die settled {overlap:.3} deep in a wall at {}",
                die.pose.position
            );
        }
        sim.history.record(value);
        for listener in sim.listeners.iter_mut() {
            listener(value);
        }
    }

    let die_position = sim.world.body(sim.die).pose.position;
    sim.camera.update(die_position, wall_dt);
    sim.frames += 1;

    TickReport {
        physics_dt,
        roll_started,
        resolved,
    }
}
