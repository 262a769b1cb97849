//! Rigid body types
//!
//! The die is the only dynamic body; the arena is made of static colliders.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::tuning::DieParams;

/// Position and orientation of a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidPose {
    pub position: Vec3,
    /// Unit quaternion, renormalized after every integration
    pub orientation: Quat,
}

impl Default for RigidPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl RigidPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Blend toward `other` by `t` (position lerp, orientation slerp)
    pub fn interpolate(&self, other: &RigidPose, t: f32) -> RigidPose {
        RigidPose {
            position: self.position.lerp(other.position, t),
            orientation: self.orientation.slerp(other.orientation, t).normalize(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }

    /// Transform a body-space point into world space
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

/// Contact material tag carried by every body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialId {
    Default,
    Arena,
    Die,
}

/// Sleep state machine for dynamic bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SleepState {
    Awake,
    /// Below the speed limit, waiting out the time limit
    Sleepy { since: f64 },
    Sleeping,
}

/// A dynamic rigid box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DieBody {
    pub pose: RigidPose,
    /// Pose before the latest internal step (for render interpolation)
    pub previous_pose: RigidPose,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub half_extents: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_time_limit: f32,
    pub sleep_speed_limit: f32,
    pub material: MaterialId,
    sleep: SleepState,
}

impl DieBody {
    pub fn new(params: &DieParams) -> Self {
        let pose = RigidPose::new(Vec3::new(0.0, params.rest_height, 0.0), Quat::IDENTITY);
        Self {
            pose,
            previous_pose: pose,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: params.mass,
            half_extents: Vec3::splat(params.half_extent),
            linear_damping: params.linear_damping,
            angular_damping: params.angular_damping,
            sleep_time_limit: params.sleep_time_limit,
            sleep_speed_limit: params.sleep_speed_limit,
            material: MaterialId::Die,
            sleep: SleepState::Awake,
        }
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 }
    }

    /// Inverse inertia of a solid box in body space (diagonal)
    pub fn inv_inertia_body(&self) -> Vec3 {
        let e = self.half_extents * 2.0;
        let k = self.mass / 12.0;
        let inertia = Vec3::new(
            k * (e.y * e.y + e.z * e.z),
            k * (e.x * e.x + e.z * e.z),
            k * (e.x * e.x + e.y * e.y),
        );
        Vec3::new(
            if inertia.x > 0.0 { 1.0 / inertia.x } else { 0.0 },
            if inertia.y > 0.0 { 1.0 / inertia.y } else { 0.0 },
            if inertia.z > 0.0 { 1.0 / inertia.z } else { 0.0 },
        )
    }

    /// Inverse inertia tensor rotated into world space
    pub fn inv_inertia_world(&self) -> Mat3 {
        let r = Mat3::from_quat(self.pose.orientation);
        r * Mat3::from_diagonal(self.inv_inertia_body()) * r.transpose()
    }

    /// Apply an impulse at `r`, an offset from the center of mass
    pub fn apply_impulse(&mut self, impulse: Vec3, r: Vec3) {
        self.velocity += impulse * self.inv_mass();
        self.angular_velocity += self.inv_inertia_world() * r.cross(impulse);
    }

    /// Velocity of the body point at offset `r` from the center of mass
    #[inline]
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(r)
    }

    /// Combined linear and angular speed used by settle detection
    #[inline]
    pub fn motion(&self) -> f32 {
        self.velocity.length() + self.angular_velocity.length()
    }

    /// The eight box corners in world space
    pub fn corners_world(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let local = Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            );
            *corner = self.pose.to_world(local);
        }
        corners
    }

    /// Half size of the world-space bounding box at the current orientation
    pub fn world_half_extents(&self) -> Vec3 {
        let rot = Mat3::from_quat(self.pose.orientation);
        let h = self.half_extents;
        rot.x_axis.abs() * h.x + rot.y_axis.abs() * h.y + rot.z_axis.abs() * h.z
    }

    /// Place the body and clear its motion
    pub fn teleport(&mut self, pose: RigidPose) {
        self.pose = pose;
        self.previous_pose = pose;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    pub fn sleep_state(&self) -> SleepState {
        self.sleep
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep == SleepState::Sleeping
    }

    pub fn wake_up(&mut self) {
        if self.sleep != SleepState::Awake {
            log::debug!("die woke up");
        }
        self.sleep = SleepState::Awake;
    }

    /// Put the body to sleep immediately, zeroing its motion
    pub fn sleep(&mut self) {
        self.sleep = SleepState::Sleeping;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Advance the sleep state machine at simulation time `time`
    pub fn sleep_tick(&mut self, time: f64) {
        let speed_sq = self.velocity.length_squared() + self.angular_velocity.length_squared();
        let limit_sq = self.sleep_speed_limit * self.sleep_speed_limit;
        match self.sleep {
            SleepState::Awake if speed_sq < limit_sq => {
                self.sleep = SleepState::Sleepy { since: time };
            }
            SleepState::Sleepy { .. } if speed_sq > limit_sq => {
                self.wake_up();
            }
            SleepState::Sleepy { since } if time - since > f64::from(self.sleep_time_limit) => {
                log::debug!("die fell asleep at t={time:.3}");
                self.sleep();
            }
            _ => {}
        }
    }

    /// Semi-implicit integration of position and orientation
    pub fn integrate(&mut self, dt: f32) {
        self.pose.position += self.velocity * dt;
        let w = self.angular_velocity;
        let q = self.pose.orientation;
        let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q * (0.5 * dt);
        self.pose.orientation = (q + spin).normalize();
    }

    /// Exponential velocity damping, `v *= (1 - d)^dt`
    pub fn apply_damping(&mut self, dt: f32) {
        self.velocity *= (1.0 - self.linear_damping).powf(dt);
        self.angular_velocity *= (1.0 - self.angular_damping).powf(dt);
    }

    pub fn is_finite(&self) -> bool {
        self.pose.is_finite() && self.velocity.is_finite() && self.angular_velocity.is_finite()
    }
}

/// Static collider shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Infinite half-space; points with `normal · p < offset` are inside
    Plane { normal: Vec3, offset: f32 },
    /// Axis-aligned box
    Box { center: Vec3, half_extents: Vec3 },
}

/// An immovable collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBody {
    pub shape: Shape,
    pub material: MaterialId,
}
