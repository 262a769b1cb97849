//! Roll resolution core
//!
//! All logic that decides a roll lives here. It is single-threaded and frame
//! driven:
//! - Fixed physics timestep with a bounded number of substeps per frame
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod body;
pub mod camera;
pub mod collision;
pub mod faces;
pub mod history;
pub mod roll;
pub mod settle;
pub mod state;
pub mod tick;
pub mod timing;
pub mod world;

pub use arena::Arena;
pub use body::{DieBody, MaterialId, RigidPose, Shape, SleepState, StaticBody};
pub use camera::{CameraFollow, CameraSmoothing};
pub use collision::{Contact, detect_contacts};
pub use faces::{FaceEntry, FaceTable, FaceTableError, resolve};
pub use history::RollHistory;
pub use roll::{Launch, RollController, RollState};
pub use settle::SettleDetector;
pub use state::DiceSim;
pub use tick::{TickInput, TickReport, tick};
pub use timing::SpeedController;
pub use world::{BodyHandle, ContactMaterial, PhysicsWorld};
