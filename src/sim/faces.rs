//! Face table and outcome resolution
//!
//! A die face is identified by its outward normal in body space. The outcome
//! of a roll is the printed value of the face whose rotated normal points
//! most nearly along world up.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One printed face of the die
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceEntry {
    pub value: u8,
    /// Outward unit normal in body space
    pub normal: Vec3,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FaceTableError {
    #[error("face {value} has a normal that is not a unit axis vector: {normal}")]
    NotAnAxis { value: u8, normal: Vec3 },

    #[error("faces {first} and {second} share the same normal")]
    DuplicateNormal { first: u8, second: u8 },

    #[error("printed values must be exactly 1..=6, got {0:?}")]
    BadValues([u8; 6]),
}

/// Immutable, ordered mapping from body-space normals to printed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[FaceEntry; 6]", into = "[FaceEntry; 6]")]
pub struct FaceTable {
    entries: [FaceEntry; 6],
}

impl FaceTable {
    /// Validate and build a table; entry order is the tie-break order
    pub fn new(entries: [FaceEntry; 6]) -> Result<Self, FaceTableError> {
        for entry in &entries {
            let n = entry.normal;
            let is_axis = [n.x, n.y, n.z].iter().filter(|c| c.abs() == 1.0).count() == 1
                && [n.x, n.y, n.z].iter().filter(|c| **c == 0.0).count() == 2;
            if !is_axis {
                return Err(FaceTableError::NotAnAxis {
                    value: entry.value,
                    normal: n,
                });
            }
        }

        for (i, a) in entries.iter().enumerate() {
            if let Some(b) = entries[i + 1..].iter().find(|b| b.normal == a.normal) {
                return Err(FaceTableError::DuplicateNormal {
                    first: a.value,
                    second: b.value,
                });
            }
        }

        let mut values = entries.map(|e| e.value);
        values.sort_unstable();
        if values != [1, 2, 3, 4, 5, 6] {
            return Err(FaceTableError::BadValues(entries.map(|e| e.value)));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FaceEntry; 6] {
        &self.entries
    }

    /// Printed value of the face pointing most nearly up
    ///
    /// Scans in table order and only replaces the current best on a strictly
    /// greater vertical component, so exact ties go to the earlier entry.
    pub fn resolve(&self, orientation: Quat) -> u8 {
        most_upward(
            self.entries
                .iter()
                .map(|e| (e.value, (orientation * e.normal).y)),
        )
    }

    /// Body-space normal printed with `value`
    pub fn normal_of(&self, value: u8) -> Option<Vec3> {
        self.entries.iter().find(|e| e.value == value).map(|e| e.normal)
    }

    /// Values in box-face order (+X, -X, +Y, -Y, +Z, -Z), the order box
    /// meshes expect per-face materials in
    pub fn material_order(&self) -> [u8; 6] {
        [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z].map(|axis| {
            self.entries
                .iter()
                .find(|e| e.normal == axis)
                .map(|e| e.value)
                .unwrap_or_default()
        })
    }

    /// Orientation that turns the face printed with `value` to world up
    pub fn orientation_showing(&self, value: u8) -> Option<Quat> {
        self.normal_of(value).map(|n| Quat::from_rotation_arc(n, Vec3::Y))
    }
}

impl Default for FaceTable {
    /// Standard layout: opposite faces sum to seven
    fn default() -> Self {
        Self {
            entries: [
                FaceEntry { value: 1, normal: Vec3::Y },
                FaceEntry { value: 6, normal: Vec3::NEG_Y },
                FaceEntry { value: 2, normal: Vec3::Z },
                FaceEntry { value: 5, normal: Vec3::NEG_Z },
                FaceEntry { value: 3, normal: Vec3::X },
                FaceEntry { value: 4, normal: Vec3::NEG_X },
            ],
        }
    }
}

impl TryFrom<[FaceEntry; 6]> for FaceTable {
    type Error = FaceTableError;

    fn try_from(entries: [FaceEntry; 6]) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<FaceTable> for [FaceEntry; 6] {
    fn from(table: FaceTable) -> Self {
        table.entries
    }
}

/// First candidate with the strictly greatest vertical component
fn most_upward(candidates: impl Iterator<Item = (u8, f32)>) -> u8 {
    let mut best = 1;
    let mut best_y = f32::NEG_INFINITY;
    for (value, y) in candidates {
        if y > best_y {
            best_y = y;
            best = value;
        }
    }
    best
}

/// Outcome of the default table for `orientation`
pub fn resolve(orientation: Quat) -> u8 {
    FaceTable::default().resolve(orientation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_shows_one() {
        assert_eq!(resolve(Quat::IDENTITY), 1);
    }

    #[test]
    fn test_quarter_turns() {
        // Rolling +Z up onto the top
        assert_eq!(resolve(Quat::from_rotation_x(-FRAC_PI_2)), 2);
        assert_eq!(resolve(Quat::from_rotation_x(FRAC_PI_2)), 5);
        // +X rotated to the top
        assert_eq!(resolve(Quat::from_rotation_z(FRAC_PI_2)), 3);
        assert_eq!(resolve(Quat::from_rotation_z(-FRAC_PI_2)), 4);
        assert_eq!(resolve(Quat::from_rotation_x(PI)), 6);
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = FaceTable::default();
        assert_eq!(FaceTable::new(*table.entries()), Ok(table));
    }

    #[test]
    fn test_opposite_faces_sum_to_seven() {
        let table = FaceTable::default();
        for entry in table.entries() {
            let opposite = table
                .entries()
                .iter()
                .find(|e| e.normal == -entry.normal)
                .unwrap();
            assert_eq!(entry.value + opposite.value, 7);
        }
    }

    #[test]
    fn test_material_order() {
        assert_eq!(FaceTable::default().material_order(), [3, 4, 1, 6, 2, 5]);
    }

    #[test]
    fn test_exact_tie_goes_to_earlier_entry() {
        let ys = [(4, 0.5), (2, 0.7071), (5, 0.7071), (1, -1.0)];
        assert_eq!(most_upward(ys.into_iter()), 2);
        let ys = [(5, 0.7071), (2, 0.7071)];
        assert_eq!(most_upward(ys.into_iter()), 5);
    }

    #[test]
    fn test_top_face_wins_regardless_of_table_position() {
        // The four side faces tie at exactly zero at identity
        let mut entries = *FaceTable::default().entries();
        entries.swap(0, 5);
        let table = FaceTable::new(entries).unwrap();
        assert_eq!(table.resolve(Quat::IDENTITY), 1);
    }

    #[test]
    fn test_rejects_duplicate_normal() {
        let mut entries = *FaceTable::default().entries();
        entries[1].normal = Vec3::Y;
        assert_eq!(
            FaceTable::new(entries),
            Err(FaceTableError::DuplicateNormal { first: 1, second: 6 })
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut entries = *FaceTable::default().entries();
        entries[1].value = 1;
        assert!(matches!(FaceTable::new(entries), Err(FaceTableError::BadValues(_))));
    }

    #[test]
    fn test_rejects_non_axis_normal() {
        let mut entries = *FaceTable::default().entries();
        entries[0].normal = Vec3::new(0.6, 0.8, 0.0);
        assert!(matches!(
            FaceTable::new(entries),
            Err(FaceTableError::NotAnAxis { value: 1, .. })
        ));
    }

    #[test]
    fn test_orientation_showing_each_value() {
        let table = FaceTable::default();
        for value in 1..=6 {
            let q = table.orientation_showing(value).unwrap();
            assert_eq!(table.resolve(q), value);
        }
    }

    #[test]
    fn test_serde_rejects_invalid_table() {
        let mut entries = *FaceTable::default().entries();
        entries[3].value = 2;
        let json = serde_json::to_string(&entries).unwrap();
        assert!(serde_json::from_str::<FaceTable>(&json).is_err());
    }

    fn arb_quat() -> impl Strategy<Value = Quat> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
            .prop_filter("non-degenerate", |(x, y, z, w)| x * x + y * y + z * z + w * w > 1e-3)
            .prop_map(|(x, y, z, w)| Quat::from_xyzw(x, y, z, w).normalize())
    }

    proptest! {
        #[test]
        fn prop_resolve_is_pure_and_in_range(q in arb_quat()) {
            let table = FaceTable::default();
            let first = table.resolve(q);
            prop_assert!((1..=6).contains(&first));
            prop_assert_eq!(first, table.resolve(q));
        }

        #[test]
        fn prop_resolved_face_is_most_upward(q in arb_quat()) {
            let table = FaceTable::default();
            let value = table.resolve(q);
            let chosen = (q * table.normal_of(value).unwrap()).y;
            for entry in table.entries() {
                prop_assert!((q * entry.normal).y <= chosen);
            }
        }
    }
}
