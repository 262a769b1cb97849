//! Physics world
//!
//! Owns gravity, contact materials, the static arena colliders and the dynamic
//! die bodies. `step` advances everything by fixed-size internal steps.
//!
//! Internal step order:
//! 1. Gravity into velocity (awake bodies only)
//! 2. Contact detection against static colliders
//! 3. Sequential-impulse contact solve with accumulated clamping
//! 4. Positional correction of residual penetration
//! 5. Damping, then semi-implicit integration
//! 6. Sleep bookkeeping

use glam::Vec3;

use super::body::{DieBody, MaterialId, StaticBody};
use super::collision::{Contact, detect_contacts};
use crate::tuning::WorldParams;

/// Closing speeds below this do not bounce
const RESTITUTION_THRESHOLD: f32 = 0.5;
/// Penetration tolerated without positional correction
const PENETRATION_SLOP: f32 = 0.005;
/// Fraction of excess penetration removed per internal step
const CORRECTION_PERCENT: f32 = 0.8;

/// Friction and restitution for a pair of materials
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub a: MaterialId,
    pub b: MaterialId,
    pub friction: f32,
    pub restitution: f32,
}

impl ContactMaterial {
    fn matches(&self, a: MaterialId, b: MaterialId) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }
}

/// Handle to a dynamic body owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

/// Solver scratch data for one contact point
#[derive(Debug, Clone, Copy)]
struct SolverContact {
    contact: Contact,
    friction: f32,
    normal_mass: f32,
    tangents: [Vec3; 2],
    tangent_mass: [f32; 2],
    bounce: f32,
    normal_impulse: f32,
    tangent_impulse: [f32; 2],
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub gravity: Vec3,
    pub solver_iterations: u32,
    pub allow_sleep: bool,
    default_material: ContactMaterial,
    contact_materials: Vec<ContactMaterial>,
    statics: Vec<StaticBody>,
    bodies: Vec<DieBody>,
    accumulator: f32,
    interpolation: f32,
    time: f64,
    steps: u64,
    contacts: Vec<Contact>,
}

impl PhysicsWorld {
    pub fn new(params: &WorldParams) -> Self {
        let mut world = Self {
            gravity: Vec3::new(0.0, -params.gravity, 0.0),
            solver_iterations: params.solver_iterations,
            allow_sleep: params.allow_sleep,
            default_material: ContactMaterial {
                a: MaterialId::Default,
                b: MaterialId::Default,
                friction: params.default_friction,
                restitution: params.default_restitution,
            },
            contact_materials: Vec::new(),
            statics: Vec::new(),
            bodies: Vec::new(),
            accumulator: 0.0,
            interpolation: 0.0,
            time: 0.0,
            steps: 0,
            contacts: Vec::new(),
        };
        world.add_contact_material(ContactMaterial {
            a: MaterialId::Arena,
            b: MaterialId::Die,
            friction: params.arena_friction,
            restitution: params.arena_restitution,
        });
        world
    }

    pub fn add_contact_material(&mut self, material: ContactMaterial) {
        self.contact_materials.retain(|m| !m.matches(material.a, material.b));
        self.contact_materials.push(material);
    }

    /// Contact properties for a material pair, falling back to the default
    pub fn contact_material(&self, a: MaterialId, b: MaterialId) -> ContactMaterial {
        lookup_material(&self.contact_materials, self.default_material, a, b)
    }

    pub fn add_static(&mut self, body: StaticBody) {
        self.statics.push(body);
    }

    pub fn statics(&self) -> &[StaticBody] {
        &self.statics
    }

    pub fn add_body(&mut self, body: DieBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body(&self, handle: BodyHandle) -> &DieBody {
        &self.bodies[handle.0]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut DieBody {
        &mut self.bodies[handle.0]
    }

    /// Simulated time covered by internal steps so far
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of internal steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Fraction of a fixed step left in the accumulator after the last `step`
    pub fn interpolation(&self) -> f32 {
        self.interpolation
    }

    /// Advance by `delta` seconds using internal steps of `fixed_dt`
    ///
    /// Runs at most `max_substeps` internal steps; leftover time beyond a whole
    /// step is kept for the next call, time beyond the substep budget is dropped.
    pub fn step(&mut self, fixed_dt: f32, delta: f32, max_substeps: u32) {
        self.accumulator += delta.max(0.0);
        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < max_substeps {
            self.internal_step(fixed_dt);
            self.accumulator -= fixed_dt;
            substeps += 1;
        }
        self.accumulator %= fixed_dt;
        self.interpolation = self.accumulator / fixed_dt;
    }

    /// Pose of a body blended between its last two internal steps
    pub fn interpolated_pose(&self, handle: BodyHandle) -> super::RigidPose {
        let body = self.body(handle);
        body.previous_pose.interpolate(&body.pose, self.interpolation)
    }

    /// One fixed step of the whole world
    pub fn internal_step(&mut self, dt: f32) {
        let Self {
            gravity,
            solver_iterations,
            default_material,
            contact_materials,
            statics,
            bodies,
            contacts,
            ..
        } = self;

        for body in bodies.iter_mut() {
            if body.is_sleeping() {
                continue;
            }
            body.previous_pose = body.pose;
            body.velocity += *gravity * dt;

            detect_contacts(body, statics, contacts);
            let mut solver: Vec<SolverContact> = contacts
                .iter()
                .map(|c| {
                    let material = lookup_material(
                        contact_materials,
                        *default_material,
                        statics[c.static_index].material,
                        body.material,
                    );
                    prepare_contact(body, *c, &material)
                })
                .collect();

            for _ in 0..*solver_iterations {
                for sc in solver.iter_mut() {
                    solve_contact(body, sc);
                }
            }

            correct_penetration(body, &solver);

            body.apply_damping(dt);
            body.integrate(dt);
        }

        self.time += f64::from(dt);
        self.steps += 1;

        if self.allow_sleep {
            let time = self.time;
            for body in self.bodies.iter_mut().filter(|b| !b.is_sleeping()) {
                body.sleep_tick(time);
            }
        }
    }
}

fn lookup_material(
    materials: &[ContactMaterial],
    default: ContactMaterial,
    a: MaterialId,
    b: MaterialId,
) -> ContactMaterial {
    materials
        .iter()
        .find(|m| m.matches(a, b))
        .copied()
        .unwrap_or(default)
}

/// Effective mass along `dir` at contact offset `r`
fn effective_mass(body: &DieBody, r: Vec3, dir: Vec3) -> f32 {
    let inv_i = body.inv_inertia_world();
    let angular = (inv_i * r.cross(dir)).cross(r).dot(dir);
    let k = body.inv_mass() + angular;
    if k > f32::EPSILON { 1.0 / k } else { 0.0 }
}

fn prepare_contact(body: &DieBody, contact: Contact, material: &ContactMaterial) -> SolverContact {
    let n = contact.normal;
    let (t1, t2) = n.any_orthonormal_pair();
    let vn = body.velocity_at(contact.r).dot(n);
    let bounce = if vn < -RESTITUTION_THRESHOLD {
        -material.restitution * vn
    } else {
        0.0
    };
    SolverContact {
        contact,
        friction: material.friction,
        normal_mass: effective_mass(body, contact.r, n),
        tangents: [t1, t2],
        tangent_mass: [
            effective_mass(body, contact.r, t1),
            effective_mass(body, contact.r, t2),
        ],
        bounce,
        normal_impulse: 0.0,
        tangent_impulse: [0.0; 2],
    }
}

fn solve_contact(body: &mut DieBody, sc: &mut SolverContact) {
    let r = sc.contact.r;
    let n = sc.contact.normal;

    // Normal: drive closing speed to the bounce target, never pull
    let vn = body.velocity_at(r).dot(n);
    let lambda = (sc.bounce - vn) * sc.normal_mass;
    let accumulated = (sc.normal_impulse + lambda).max(0.0);
    let applied = accumulated - sc.normal_impulse;
    sc.normal_impulse = accumulated;
    body.apply_impulse(n * applied, r);

    // Friction: Coulomb cone around the accumulated normal impulse
    let max_friction = sc.friction * sc.normal_impulse;
    for axis in 0..2 {
        let t = sc.tangents[axis];
        let vt = body.velocity_at(r).dot(t);
        let lambda = -vt * sc.tangent_mass[axis];
        let accumulated = (sc.tangent_impulse[axis] + lambda).clamp(-max_friction, max_friction);
        let applied = accumulated - sc.tangent_impulse[axis];
        sc.tangent_impulse[axis] = accumulated;
        body.apply_impulse(t * applied, r);
    }
}

/// Push the body out along the deepest contact of each collider
fn correct_penetration(body: &mut DieBody, solver: &[SolverContact]) {
    let mut deepest: Vec<(usize, Vec3, f32)> = Vec::new();
    for sc in solver {
        let c = &sc.contact;
        match deepest.iter_mut().find(|(index, _, _)| *index == c.static_index) {
            Some(entry) if c.depth > entry.2 => *entry = (c.static_index, c.normal, c.depth),
            Some(_) => {}
            None => deepest.push((c.static_index, c.normal, c.depth)),
        }
    }
    for (_, normal, depth) in deepest {
        let excess = depth - PENETRATION_SLOP;
        if excess > 0.0 {
            body.pose.position += normal * excess * CORRECTION_PERCENT;
        }
    }
}
