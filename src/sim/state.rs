//! Dice simulation state
//!
//! `DiceSim` owns every piece of the roll resolution core and exposes the
//! surface a presentation layer drives: trigger, speed, pose, roll state and
//! resolved outcomes.

use std::fmt;

use glam::Vec3;

use super::arena::Arena;
use super::body::{DieBody, RigidPose};
use super::camera::{CameraFollow, CameraSmoothing};
use super::faces::FaceTable;
use super::history::RollHistory;
use super::roll::{RollController, RollState};
use super::tick::{TickInput, tick};
use super::timing::SpeedController;
use super::world::{BodyHandle, PhysicsWorld};
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::tuning::Tuning;

type ResolvedListener = Box<dyn FnMut(u8)>;

/// The complete roll resolution core
pub struct DiceSim {
    /// Seed of the launch RNG, for replaying a session
    pub seed: u64,
    pub(super) tuning: Tuning,
    pub(super) world: PhysicsWorld,
    pub(super) die: BodyHandle,
    pub(super) arena: Arena,
    pub(super) roll: RollController,
    pub(super) speed: SpeedController,
    pub(super) camera: CameraFollow,
    pub(super) history: RollHistory,
    pub(super) frames: u64,
    pub(super) listeners: Vec<ResolvedListener>,
}

impl fmt::Debug for DiceSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceSim")
            .field("seed", &self.seed)
            .field("state", &self.roll.state())
            .field("pose", &self.current_pose())
            .field("speed", &self.speed.speed())
            .field("frames", &self.frames)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DiceSim {
    /// Build a simulation with default smoothing and speed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_faces(tuning, FaceTable::default(), CameraSmoothing::default(), seed)
    }

    pub fn with_faces(tuning: Tuning, faces: FaceTable, smoothing: CameraSmoothing, seed: u64) -> Self {
        let arena = Arena::new(tuning.arena);
        let mut world = PhysicsWorld::new(&tuning.world);
        for body in arena.bodies() {
            world.add_static(*body);
        }
        let die = world.add_body(DieBody::new(&tuning.die));
        let mut roll = RollController::new(tuning.launch, &tuning.settle, faces, seed);
        roll.drop_die(world.body_mut(die));

        log::info!("dice simulation ready (seed {seed})");

        Self {
            seed,
            tuning,
            world,
            die,
            arena,
            roll,
            speed: SpeedController::default(),
            camera: CameraFollow::new(smoothing),
            history: RollHistory::new(),
            frames: 0,
            listeners: Vec::new(),
        }
    }

    /// Build from validated user settings; unseeded settings draw a fresh seed
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let faces = settings.faces.clone().unwrap_or_default();
        let mut sim = Self::with_faces(settings.tuning, faces, settings.camera_smoothing, seed);
        sim.speed.set_speed_value(settings.speed);
        Ok(sim)
    }

    /// Start a roll; ignored while a roll is in progress
    pub fn trigger(&mut self) -> bool {
        self.roll.trigger(self.world.body_mut(self.die))
    }

    /// Advance one rendered frame
    pub fn advance(&mut self, wall_dt: f32) -> Option<u8> {
        tick(self, &TickInput::default(), wall_dt).resolved
    }

    /// Trigger a roll and tick at a fixed frame delta until it resolves
    ///
    /// Returns `None` if a roll was already running or the die has not settled
    /// within `max_frames`.
    pub fn run_roll(&mut self, frame_dt: f32, max_frames: u32) -> Option<u8> {
        if !self.trigger() {
            return None;
        }
        (0..max_frames).find_map(|_| self.advance(frame_dt))
    }

    /// Register a callback fired once per settled roll
    pub fn on_resolved(&mut self, listener: impl FnMut(u8) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn current_pose(&self) -> RigidPose {
        self.world.body(self.die).pose
    }

    /// Pose blended by the leftover fraction of a physics step
    pub fn interpolated_pose(&self) -> RigidPose {
        self.world.interpolated_pose(self.die)
    }

    pub fn roll_state(&self) -> RollState {
        self.roll.state()
    }

    pub fn is_rolling(&self) -> bool {
        self.roll.is_rolling()
    }

    /// Apply raw user input for the speed multiplier; returns the stored value
    pub fn set_speed(&mut self, raw: &str) -> f32 {
        self.speed.set_speed(raw)
    }

    pub fn set_speed_value(&mut self, value: f32) -> f32 {
        self.speed.set_speed_value(value)
    }

    pub fn speed(&self) -> f32 {
        self.speed.speed()
    }

    pub fn speed_label(&self) -> String {
        self.speed.speed_label()
    }

    /// Text for the result label
    pub fn status_text(&self) -> String {
        match (self.roll.state(), self.history.last()) {
            (RollState::Rolling, _) => "Rolling...".to_string(),
            (RollState::Idle, Some(value)) => format!("You rolled {value}"),
            (RollState::Idle, None) => String::new(),
        }
    }

    pub fn last_outcome(&self) -> Option<u8> {
        self.history.last()
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    pub fn camera(&self) -> &CameraFollow {
        &self.camera
    }

    /// Camera eye position and look-at point
    pub fn camera_view(&self) -> (Vec3, Vec3) {
        (self.camera.position, self.camera.target)
    }

    pub fn die(&self) -> &DieBody {
        self.world.body(self.die)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn faces(&self) -> &FaceTable {
        self.roll.faces()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Consecutive still frames in the current roll
    pub fn stable_frames(&self) -> u32 {
        self.roll.stable_frames()
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_starts_idle_with_empty_status() {
        let sim = DiceSim::new(Tuning::default(), 1);
        assert_eq!(sim.roll_state(), RollState::Idle);
        assert_eq!(sim.status_text(), "");
        assert_eq!(sim.speed(), 1.0);
    }

    #[test]
    fn test_initial_drop_does_not_resolve() {
        let mut sim = DiceSim::new(Tuning::default(), 2);
        let resolved: Vec<u8> = (0..600).filter_map(|_| sim.advance(SIM_DT)).collect();
        assert!(resolved.is_empty());
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_dropped_die_rests_inside_arena() {
        let mut sim = DiceSim::new(Tuning::default(), 6);
        for _ in 0..600 {
            sim.advance(SIM_DT);
        }
        let position = sim.current_pose().position;
        assert!(sim.arena().contains(position));
        assert!(position.y > crate::consts::FLOOR_Y);
        assert!(sim.die().motion() < 0.13);
    }

    #[test]
    fn test_launched_rolls_never_rest_inside_walls() {
        let mut inside = 0;
        for seed in 0..200 {
            let mut sim = DiceSim::new(Tuning::default(), seed);
            let value = sim.run_roll(SIM_DT, 3600);
            assert!(value.is_some(), "seed {seed} did not settle");

            let position = sim.current_pose().position;
            let overlap = sim.arena().wall_overlap(sim.die());
            assert!(overlap < 0.02, "seed {seed} rests {overlap} deep in a wall at {position}");
            assert!(position.y > crate::consts::FLOOR_Y, "seed {seed} below floor");

            let wall_top = crate::consts::FLOOR_Y + crate::consts::WALL_HEIGHT;
            if sim.arena().contains(position) || position.y > wall_top {
                inside += 1;
            }
        }
        // Hard launches can clear the wall tops; most rolls stay in
        assert!(inside >= 170, "only {inside} of 200 rolls stayed in the arena");
    }

    #[test]
    fn test_full_roll_resolves_once() {
        let mut sim = DiceSim::new(Tuning::default(), 42);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        sim.on_resolved(move |v| sink.borrow_mut().push(v));

        assert!(sim.trigger());
        assert_eq!(sim.status_text(), "Rolling...");
        let mut outcome = None;
        for _ in 0..3600 {
            if let Some(v) = sim.advance(SIM_DT) {
                assert!(outcome.is_none(), "resolved twice");
                outcome = Some(v);
            }
        }
        let value = outcome.expect("die never settled");
        assert!((1..=6).contains(&value));
        assert_eq!(*seen.borrow(), vec![value]);
        assert_eq!(sim.roll_state(), RollState::Idle);
        assert_eq!(sim.status_text(), format!("You rolled {value}"));
        assert_eq!(sim.faces().resolve(sim.current_pose().orientation), value);
    }

    #[test]
    fn test_trigger_while_rolling_is_ignored() {
        let mut sim = DiceSim::new(Tuning::default(), 3);
        assert!(sim.trigger());
        let pose = sim.current_pose();
        let velocity = sim.die().velocity;
        assert!(!sim.trigger());
        assert_eq!(sim.current_pose(), pose);
        assert_eq!(sim.die().velocity, velocity);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let mut a = DiceSim::new(Tuning::default(), 1234);
        let mut b = DiceSim::new(Tuning::default(), 1234);
        let first = a.run_roll(SIM_DT, 3600);
        let second = b.run_roll(SIM_DT, 3600);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(a.current_pose(), b.current_pose());
    }

    #[test]
    fn test_from_settings_applies_speed() {
        let settings = Settings {
            speed: 9.0,
            seed: Some(5),
            ..Settings::default()
        };
        let sim = DiceSim::from_settings(&settings).unwrap();
        assert_eq!(sim.speed(), 2.5);
        assert_eq!(sim.seed, 5);
    }

    #[test]
    fn test_camera_follows_die() {
        let mut sim = DiceSim::new(Tuning::default(), 8);
        sim.run_roll(SIM_DT, 3600);
        for _ in 0..300 {
            sim.advance(SIM_DT);
        }
        let die = sim.current_pose().position;
        let (_, target) = sim.camera_view();
        assert!((target.x - die.x).abs() < 0.05);
        assert!((target.z - die.z).abs() < 0.05);
    }
}
