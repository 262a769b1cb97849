//! Simulation speed control
//!
//! Converts the user-facing speed multiplier and a wall-clock frame delta
//! into a bounded physics delta.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    speed: f32,
}

impl Default for SpeedController {
    fn default() -> Self {
        Self {
            speed: SPEED_DEFAULT,
        }
    }
}

impl SpeedController {
    pub fn new(speed: f32) -> Self {
        let mut controller = Self::default();
        controller.set_speed_value(speed);
        controller
    }

    /// Parse raw user input; anything non-numeric or non-finite means 1.0
    ///
    /// Trailing text after a leading number is ignored, so `"2x"` reads as 2.
    pub fn set_speed(&mut self, raw: &str) -> f32 {
        let parsed = parse_leading_number(raw).unwrap_or(f32::NAN);
        self.set_speed_value(parsed)
    }

    /// Store a numeric speed, clamped to the allowed range
    pub fn set_speed_value(&mut self, value: f32) -> f32 {
        self.speed = if value.is_finite() {
            value.clamp(SPEED_MIN, SPEED_MAX)
        } else {
            SPEED_DEFAULT
        };
        self.speed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Display form, e.g. `1.25x`
    pub fn speed_label(&self) -> String {
        format!("{:.2}x", self.speed)
    }

    /// Physics delta for one frame
    ///
    /// The wall delta is capped before scaling and the scaled result is capped
    /// again, so no multiplier can produce a step large enough to tunnel.
    pub fn derive_physics_delta(&self, wall_delta: f32) -> f32 {
        let wall = if wall_delta.is_finite() {
            wall_delta.clamp(0.0, WALL_DELTA_CAP)
        } else {
            0.0
        };
        (wall * self.speed).min(PHYSICS_DELTA_CAP)
    }
}

/// Longest leading prefix of `raw` (after whitespace) that parses as a number
fn parse_leading_number(raw: &str) -> Option<f32> {
    let text = raw.trim_start();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f32>().ok())
}
