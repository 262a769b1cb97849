//! Contact detection between the die and static colliders
//!
//! Contacts are generated per box corner: every corner of the die that lies
//! past (or within `CONTACT_MARGIN` of) a collider surface becomes one contact
//! point. Against walls the point is clamped onto the wall face.

use glam::Vec3;

use super::body::{DieBody, Shape, StaticBody};

/// Corners closer than this to a surface already count as touching
pub const CONTACT_MARGIN: f32 = 0.002;

/// A single contact point between the die and a static body
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Index into the world's static body list
    pub static_index: usize,
    /// Offset from the die's center of mass to the contact point
    pub r: Vec3,
    /// Surface normal pointing out of the static body, toward the die
    pub normal: Vec3,
    /// Penetration depth (positive when overlapping)
    pub depth: f32,
}

/// Corner contacts against an infinite plane
pub fn box_plane_contacts(
    die: &DieBody,
    normal: Vec3,
    offset: f32,
    static_index: usize,
    out: &mut Vec<Contact>,
) {
    for corner in die.corners_world() {
        let depth = offset - normal.dot(corner);
        if depth > -CONTACT_MARGIN {
            out.push(Contact {
                static_index,
                r: corner - die.pose.position,
                normal,
                depth,
            });
        }
    }
}

/// Contacts against an axis-aligned static box
///
/// All contacts share one normal: the box face of least overlap with the die's
/// world-space bounds, on the side of the box the die's center lies on. Thin
/// walls therefore always push the die back toward the side it came from.
/// Corners past that face are clamped onto its rectangle, so a die lying
/// across a wall narrower than itself still rests on the wall's edge.
pub fn box_box_contacts(
    die: &DieBody,
    center: Vec3,
    half_extents: Vec3,
    static_index: usize,
    out: &mut Vec<Contact>,
) {
    let offset = die.pose.position - center;
    let overlap = half_extents + die.world_half_extents() + Vec3::splat(CONTACT_MARGIN) - offset.abs();
    if overlap.min_element() <= 0.0 {
        return;
    }

    let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    };
    let sign = if offset[axis] < 0.0 { -1.0 } else { 1.0 };
    let mut normal = Vec3::ZERO;
    normal[axis] = sign;
    let face = center[axis] + sign * half_extents[axis];

    let min = center - half_extents;
    let max = center + half_extents;
    for corner in die.corners_world() {
        let depth = sign * (face - corner[axis]);
        if depth <= -CONTACT_MARGIN {
            continue;
        }
        let mut point = corner.clamp(min, max);
        point[axis] = corner[axis];
        // A clamped point only touches if the die actually covers it
        if point != corner && !die_covers(die, point) {
            continue;
        }
        out.push(Contact {
            static_index,
            r: point - die.pose.position,
            normal,
            depth,
        });
    }
}

fn die_covers(die: &DieBody, point: Vec3) -> bool {
    let local = die.pose.orientation.inverse() * (point - die.pose.position);
    (local.abs() - die.half_extents).max_element() <= CONTACT_MARGIN
}

/// Collect all contacts between `die` and `statics`
pub fn detect_contacts(die: &DieBody, statics: &[StaticBody], out: &mut Vec<Contact>) {
    out.clear();
    for (index, body) in statics.iter().enumerate() {
        match body.shape {
            Shape::Plane { normal, offset } => box_plane_contacts(die, normal, offset, index, out),
            Shape::Box {
                center,
                half_extents,
            } => box_box_contacts(die, center, half_extents, index, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{MaterialId, RigidPose};
    use crate::tuning::DieParams;
    use glam::Quat;

    fn die_at(position: Vec3, orientation: Quat) -> DieBody {
        let mut die = DieBody::new(&DieParams::default());
        die.teleport(RigidPose::new(position, orientation));
        die
    }

    #[test]
    fn test_flat_die_on_floor_has_four_contacts() {
        let die = die_at(Vec3::new(0.0, -1.0, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_plane_contacts(&die, Vec3::Y, -1.5, 0, &mut contacts);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert!(c.depth.abs() < 1e-5);
            assert_eq!(c.normal, Vec3::Y);
        }
    }

    #[test]
    fn test_airborne_die_has_no_contacts() {
        let die = die_at(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_plane_contacts(&die, Vec3::Y, -1.5, 0, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_edge_down_die_has_two_contacts() {
        let rot = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        let half_diag = 0.5 * std::f32::consts::SQRT_2;
        let die = die_at(Vec3::new(0.0, -1.5 + half_diag - 0.01, 0.0), rot);
        let mut contacts = Vec::new();
        box_plane_contacts(&die, Vec3::Y, -1.5, 0, &mut contacts);
        assert_eq!(contacts.len(), 2);
        assert!(contacts.iter().all(|c| (c.depth - 0.01).abs() < 1e-4));
    }

    #[test]
    fn test_wall_contact_normal_points_inward() {
        // Wall occupying x in [6.2, 6.5]
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        let die = die_at(Vec3::new(5.75, 0.0, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 3, &mut contacts);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_eq!(c.normal, -Vec3::X);
            assert_eq!(c.static_index, 3);
            assert!((c.depth - 0.05).abs() < 1e-4);
        }
    }

    #[test]
    fn test_corner_past_wall_midplane_still_pushed_inward() {
        // Corners at x = 6.4 are beyond the wall's midplane at 6.35
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        let die = die_at(Vec3::new(5.9, 0.0, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 1, &mut contacts);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_eq!(c.normal, -Vec3::X);
            assert!((c.depth - 0.2).abs() < 1e-4);
        }
    }

    #[test]
    fn test_die_outside_wall_pushed_outward() {
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        let die = die_at(Vec3::new(6.9, 0.0, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 1, &mut contacts);
        assert_eq!(contacts.len(), 4);
        assert!(contacts.iter().all(|c| c.normal == Vec3::X));
    }

    #[test]
    fn test_die_landing_on_wall_top() {
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        // Wider than the wall and lying across its top; no corner is inside
        let die = die_at(Vec3::new(6.1, 2.45, 0.0), Quat::IDENTITY);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 1, &mut contacts);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_eq!(c.normal, Vec3::Y);
            assert!((c.depth - 0.05).abs() < 1e-4);
            let x = die.pose.position.x + c.r.x;
            assert!((6.2 - 1e-4..=6.5 + 1e-4).contains(&x), "x = {x}");
        }
    }

    #[test]
    fn test_hanging_corner_beside_wall_top_is_not_a_contact() {
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        // Tipped about Z; the lowest corner hangs inside the arena below the
        // wall top, and clamping it onto the wall lands outside the die
        let rot = Quat::from_rotation_z(0.5);
        let die = die_at(Vec3::new(6.2, 2.3, 0.0), rot);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 1, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_rotated_die_clear_of_wall_has_no_contacts() {
        let center = Vec3::new(6.35, 0.25, 0.0);
        let half = Vec3::new(0.15, 1.75, 6.5);
        let rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let die = die_at(Vec3::new(5.4, 0.0, 0.0), rot);
        let mut contacts = Vec::new();
        box_box_contacts(&die, center, half, 1, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_detect_contacts_against_statics() {
        let statics = [StaticBody {
            shape: Shape::Plane {
                normal: Vec3::Y,
                offset: 0.0,
            },
            material: MaterialId::Arena,
        }];
        let die = die_at(Vec3::new(0.0, 0.45, 0.0), Quat::IDENTITY);
        let mut contacts = vec![];
        detect_contacts(&die, &statics, &mut contacts);
        assert_eq!(contacts.len(), 4);
        assert!(contacts.iter().all(|c| (c.depth - 0.05).abs() < 1e-4));
    }
}
