//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod error;
mod skeleton;

pub use error::BridgeError;

pub use skeleton::{
    // WASM entry points
    update_body,
    reset_body,
    get_joint_positions,
    set_joint_visible,
    is_joint_visible,
    set_smooth_scale,
    get_smooth_scale,
    set_position_scale,
    get_position_scale,
    configure,
    get_skeleton_bones,
    // Internal API
    apply_body_frame,
    reset_body_slot,
    joint_positions,
    set_visibility,
    visibility,
    apply_config_json,
    current_config,
    // Constants
    SKELETON_BONES,
    FLOATS_PER_JOINT,
};
