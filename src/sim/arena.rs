//! Arena bodies: the floor plane and the four walls enclosing the die

use glam::Vec3;

use super::body::{DieBody, MaterialId, Shape, StaticBody};
use crate::tuning::ArenaParams;

/// Static geometry of the rolling area
#[derive(Debug, Clone)]
pub struct Arena {
    pub params: ArenaParams,
    bodies: Vec<StaticBody>,
}

impl Arena {
    pub fn new(params: ArenaParams) -> Self {
        let ArenaParams {
            floor_y,
            half_size,
            wall_thickness,
            wall_height,
        } = params;

        let mut bodies = Vec::with_capacity(5);
        bodies.push(StaticBody {
            shape: Shape::Plane {
                normal: Vec3::Y,
                offset: floor_y,
            },
            material: MaterialId::Arena,
        });

        let wall_y = floor_y + wall_height / 2.0;
        let offset = half_size + wall_thickness / 2.0;
        // Walls overlap at the corners so the enclosure has no gaps
        let long = half_size + wall_thickness;
        let x_wall = Vec3::new(wall_thickness / 2.0, wall_height / 2.0, long);
        let z_wall = Vec3::new(long, wall_height / 2.0, wall_thickness / 2.0);
        for (center, half_extents) in [
            (Vec3::new(offset, wall_y, 0.0), x_wall),
            (Vec3::new(-offset, wall_y, 0.0), x_wall),
            (Vec3::new(0.0, wall_y, offset), z_wall),
            (Vec3::new(0.0, wall_y, -offset), z_wall),
        ] {
            bodies.push(StaticBody {
                shape: Shape::Box {
                    center,
                    half_extents,
                },
                material: MaterialId::Arena,
            });
        }

        Self { params, bodies }
    }

    pub fn bodies(&self) -> &[StaticBody] {
        &self.bodies
    }

    /// Whether a point lies inside the walled volume above the floor
    pub fn contains(&self, point: Vec3) -> bool {
        let p = &self.params;
        point.x.abs() <= p.half_size
            && point.z.abs() <= p.half_size
            && point.y >= p.floor_y
            && point.y <= p.floor_y + p.wall_height
    }

    /// Deepest overlap between the die's bounds and any wall, 0 when clear
    pub fn wall_overlap(&self, die: &DieBody) -> f32 {
        let reach = die.world_half_extents();
        self.bodies
            .iter()
            .filter_map(|body| match body.shape {
                Shape::Box {
                    center,
                    half_extents,
                } => Some(
                    (half_extents + reach - (die.pose.position - center).abs())
                        .min_element()
                        .max(0.0),
                ),
                Shape::Plane { .. } => None,
            })
            .fold(0.0, f32::max)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaParams::default())
    }
}
