//! Browser bindings
//!
//! A JavaScript host owns the canvas, the render loop and the UI controls. It
//! forwards the frame delta, the roll button and the speed field here, then
//! reads back the die pose, camera and status text each frame.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{DiceSim, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("Dice roller module loaded");
}

/// Handle to one simulation session
#[wasm_bindgen]
pub struct DiceRollerHandle {
    sim: DiceSim,
    pending_roll: bool,
}

#[wasm_bindgen]
impl DiceRollerHandle {
    /// Create a session; omit the seed for a random one
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<DiceRollerHandle, JsError> {
        let settings = Settings {
            seed: seed.map(u64::from),
            ..Settings::default()
        };
        let sim = DiceSim::from_settings(&settings)?;
        Ok(Self {
            sim,
            pending_roll: false,
        })
    }

    /// Create a session from a JSON settings document
    #[wasm_bindgen(js_name = fromSettingsJson)]
    pub fn from_settings_json(json: &str) -> Result<DiceRollerHandle, JsError> {
        let settings = Settings::from_json(json)?;
        let sim = DiceSim::from_settings(&settings)?;
        Ok(Self {
            sim,
            pending_roll: false,
        })
    }

    /// Request a roll on the next tick
    pub fn trigger(&mut self) {
        self.pending_roll = true;
    }

    /// Advance one rendered frame. Returns the rolled value on the frame a
    /// roll settles, 0 otherwise.
    pub fn tick(&mut self, wall_dt: f32) -> u8 {
        let input = TickInput {
            roll: std::mem::take(&mut self.pending_roll),
            speed: None,
        };
        tick(&mut self.sim, &input, wall_dt).resolved.unwrap_or(0)
    }

    /// Apply raw text from the speed field; returns the stored multiplier
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, raw: &str) -> f32 {
        self.sim.set_speed(raw)
    }

    pub fn speed(&self) -> f32 {
        self.sim.speed()
    }

    #[wasm_bindgen(js_name = speedLabel)]
    pub fn speed_label(&self) -> String {
        self.sim.speed_label()
    }

    #[wasm_bindgen(js_name = isRolling)]
    pub fn is_rolling(&self) -> bool {
        self.sim.is_rolling()
    }

    #[wasm_bindgen(js_name = statusText)]
    pub fn status_text(&self) -> String {
        self.sim.status_text()
    }

    /// Interpolated die pose as `[px, py, pz, qx, qy, qz, qw]`
    pub fn pose(&self) -> Vec<f32> {
        let pose = self.sim.interpolated_pose();
        let mut out = pose.position.to_array().to_vec();
        out.extend_from_slice(&pose.orientation.to_array());
        out
    }

    /// Camera as `[eye x, y, z, target x, y, z]`
    pub fn camera(&self) -> Vec<f32> {
        let (eye, target) = self.sim.camera_view();
        let mut out = eye.to_array().to_vec();
        out.extend_from_slice(&target.to_array());
        out
    }

    /// Face values for the box material slots `+X, -X, +Y, -Y, +Z, -Z`
    #[wasm_bindgen(js_name = materialOrder)]
    pub fn material_order(&self) -> Vec<u8> {
        self.sim.faces().material_order().to_vec()
    }

    /// Register a JavaScript callback fired with the value of each settled roll
    #[wasm_bindgen(js_name = onResolved)]
    pub fn on_resolved(&mut self, callback: js_sys::Function) {
        self.sim.on_resolved(move |value| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(value)) {
                log::warn!("resolved callback threw: {err:?}");
            }
        });
    }
}
