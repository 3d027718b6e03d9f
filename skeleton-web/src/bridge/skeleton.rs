//! Skeleton smoother bridge
//!
//! Receives raw camera-space joints from JavaScript, runs them through the
//! joint smoother and hands smoothed screen positions back for rendering.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;
use crate::physics::{
    ConfigPatch, DepthSpaceProjector, JointSmoother, JointType, PinholeMapper, Point3, RawJoint,
    ScreenSize, SmootherConfig, BODY_COUNT, JOINT_COUNT,
};
use super::error::BridgeError;

// ============================================================================
// SKELETON TOPOLOGY
// ============================================================================

/// Floats per joint in an incoming frame (x, y, z)
pub const FLOATS_PER_JOINT: usize = 3;

/// Bones of the skeleton as (parent, child) pairs
pub const SKELETON_BONES: [(JointType, JointType); 24] = [
    // Torso
    (JointType::SpineBase, JointType::SpineMid),
    (JointType::SpineMid, JointType::SpineShoulder),
    (JointType::SpineShoulder, JointType::Neck),
    (JointType::Neck, JointType::Head),
    (JointType::SpineShoulder, JointType::ShoulderLeft),
    (JointType::SpineShoulder, JointType::ShoulderRight),
    (JointType::SpineBase, JointType::HipLeft),
    (JointType::SpineBase, JointType::HipRight),
    // Left arm
    (JointType::ShoulderLeft, JointType::ElbowLeft),
    (JointType::ElbowLeft, JointType::WristLeft),
    (JointType::WristLeft, JointType::HandLeft),
    (JointType::HandLeft, JointType::HandTipLeft),
    (JointType::WristLeft, JointType::ThumbLeft),
    // Right arm
    (JointType::ShoulderRight, JointType::ElbowRight),
    (JointType::ElbowRight, JointType::WristRight),
    (JointType::WristRight, JointType::HandRight),
    (JointType::HandRight, JointType::HandTipRight),
    (JointType::WristRight, JointType::ThumbRight),
    // Left leg
    (JointType::HipLeft, JointType::KneeLeft),
    (JointType::KneeLeft, JointType::AnkleLeft),
    (JointType::AnkleLeft, JointType::FootLeft),
    // Right leg
    (JointType::HipRight, JointType::KneeRight),
    (JointType::KneeRight, JointType::AnkleRight),
    (JointType::AnkleRight, JointType::FootRight),
];

type BrowserSmoother = JointSmoother<DepthSpaceProjector<PinholeMapper>>;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SMOOTHER: RefCell<BrowserSmoother> =
        RefCell::new(JointSmoother::new(Some(DepthSpaceProjector::default())));
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

fn body_slot(slot: u32) -> Result<usize, BridgeError> {
    let index = slot as usize;
    if index < BODY_COUNT {
        Ok(index)
    } else {
        Err(BridgeError::InvalidBodySlot(slot, BODY_COUNT))
    }
}

fn joint_type(joint: u32) -> Result<JointType, BridgeError> {
    JointType::from_index(joint as usize).ok_or(BridgeError::InvalidJoint(joint, JOINT_COUNT))
}

/// Flat `[x, y, z, x, y, z, ...]` camera-space data to raw joints
fn parse_frame(data: &[f32]) -> Result<[RawJoint; JOINT_COUNT], BridgeError> {
    let expected = JOINT_COUNT * FLOATS_PER_JOINT;
    if data.len() != expected {
        return Err(BridgeError::InvalidFrameLength(data.len(), expected));
    }

    Ok(JointType::ALL.map(|kind| {
        let base = kind.index() * FLOATS_PER_JOINT;
        RawJoint::new(kind, Point3::new(data[base], data[base + 1], data[base + 2]))
    }))
}

// ============================================================================
// INTERNAL API
// ============================================================================

pub fn apply_body_frame(
    slot: u32,
    delta: f32,
    width: f32,
    height: f32,
    data: &[f32],
) -> Result<(), BridgeError> {
    let body = body_slot(slot)?;
    let joints = parse_frame(data)?;
    SMOOTHER.with(|cell| {
        cell.borrow_mut()
            .update_joint_positions(body, delta, ScreenSize::new(width, height), &joints);
    });
    Ok(())
}

pub fn reset_body_slot(slot: u32) -> Result<(), BridgeError> {
    let body = body_slot(slot)?;
    SMOOTHER.with(|cell| cell.borrow_mut().reset(body));
    Ok(())
}

/// Smoothed positions of one body as `[x, y, x, y, ...]`
pub fn joint_positions(slot: u32) -> Result<Vec<f32>, BridgeError> {
    let body = body_slot(slot)?;
    Ok(SMOOTHER.with(|cell| {
        cell.borrow()
            .joint_properties(body)
            .iter()
            .flat_map(|prop| [prop.position.x, prop.position.y])
            .collect()
    }))
}

pub fn set_visibility(slot: u32, joint: u32, visible: bool) -> Result<(), BridgeError> {
    let body = body_slot(slot)?;
    let joint = joint_type(joint)?;
    SMOOTHER.with(|cell| cell.borrow_mut().set_joint_visible(body, joint, visible));
    Ok(())
}

pub fn visibility(slot: u32, joint: u32) -> Result<bool, BridgeError> {
    let body = body_slot(slot)?;
    let joint = joint_type(joint)?;
    Ok(SMOOTHER.with(|cell| cell.borrow().is_joint_visible(body, joint)))
}

/// Fields missing from `json` keep their current value
pub fn apply_config_json(json: &str) -> Result<SmootherConfig, BridgeError> {
    let patch = ConfigPatch::from_json(json)
        .map_err(|e| BridgeError::InvalidConfig(e.to_string()))?;
    Ok(SMOOTHER.with(|cell| {
        let mut smoother = cell.borrow_mut();
        smoother.apply_patch(patch);
        smoother.config()
    }))
}

pub fn current_config() -> SmootherConfig {
    SMOOTHER.with(|cell| cell.borrow().config())
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from JavaScript once per frame per tracked body with a flat
/// Float32Array of 75 values (25 joints × camera-space x, y, z)
#[wasm_bindgen]
pub fn update_body(slot: u32, delta: f32, width: f32, height: f32, data: &[f32]) -> Result<(), JsValue> {
    apply_body_frame(slot, delta, width, height, data).map_err(|e| {
        log::warn!("{}", e);
        JsValue::from(e)
    })
}

/// Call when a slot no longer holds a continuously tracked body
#[wasm_bindgen]
pub fn reset_body(slot: u32) -> Result<(), JsValue> {
    Ok(reset_body_slot(slot)?)
}

/// Smoothed screen positions as Float32Array of 50 values (x, y per joint)
#[wasm_bindgen]
pub fn get_joint_positions(slot: u32) -> Result<Vec<f32>, JsValue> {
    Ok(joint_positions(slot)?)
}

#[wasm_bindgen]
pub fn set_joint_visible(slot: u32, joint: u32, visible: bool) -> Result<(), JsValue> {
    Ok(set_visibility(slot, joint, visible)?)
}

#[wasm_bindgen]
pub fn is_joint_visible(slot: u32, joint: u32) -> Result<bool, JsValue> {
    Ok(visibility(slot, joint)?)
}

/// Lower = smoother. Non-positive values are ignored.
#[wasm_bindgen]
pub fn set_smooth_scale(scale: f32) {
    SMOOTHER.with(|cell| cell.borrow_mut().set_smooth_scale(scale));
}

#[wasm_bindgen]
pub fn get_smooth_scale() -> f32 {
    current_config().smooth_scale
}

/// Non-positive values are ignored. Every joint snaps on its next update.
#[wasm_bindgen]
pub fn set_position_scale(scale: f32) {
    SMOOTHER.with(|cell| cell.borrow_mut().set_position_scale(scale));
}

#[wasm_bindgen]
pub fn get_position_scale() -> f32 {
    current_config().position_scale
}

/// Apply a partial JSON config, e.g. `{"smooth_scale": 0.5}`; omitted fields are unchanged
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = apply_config_json(json)?;
    log::info!(
        "Smoother configured: smooth_scale={}, position_scale={}",
        config.smooth_scale,
        config.position_scale
    );
    Ok(())
}

/// Bone list as flat joint index pairs (parent, child, parent, child, ...)
#[wasm_bindgen]
pub fn get_skeleton_bones() -> Vec<u32> {
    SKELETON_BONES
        .iter()
        .flat_map(|(parent, child)| [parent.index() as u32, child.index() as u32])
        .collect()
}
