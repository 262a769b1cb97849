//! Platform abstraction layer
//!
//! The simulation core has no platform dependencies. This module holds the
//! thin bindings a host needs to drive it:
//! - Browser: `wasm_bindgen` handle for a JavaScript render loop

#[cfg(target_arch = "wasm32")]
pub mod web;
