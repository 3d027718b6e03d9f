//! Skeletal joint enumeration and raw per-frame joint records
//!
//! Indices follow the depth sensor's body-frame order, so a raw joint array
//! from the sensor can be indexed directly by `JointType::index()`.

use nalgebra::SVector;

/// 2D screen-space point
pub type Point2 = SVector<f32, 2>;
/// 3D camera-space point (metres)
pub type Point3 = SVector<f32, 3>;

/// Number of joints per tracked body
pub const JOINT_COUNT: usize = 25;

/// Maximum number of simultaneously tracked bodies
pub const BODY_COUNT: usize = 6;

/// One tracked anatomical point of a body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointType {
    SpineBase = 0,
    SpineMid = 1,
    Neck = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
    SpineShoulder = 20,
    HandTipLeft = 21,
    ThumbLeft = 22,
    HandTipRight = 23,
    ThumbRight = 24,
}

impl JointType {
    /// Every joint, in sensor index order
    pub const ALL: [JointType; JOINT_COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];

    /// Position of this joint in a per-body joint array
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            JointType::SpineBase => "spine_base",
            JointType::SpineMid => "spine_mid",
            JointType::Neck => "neck",
            JointType::Head => "head",
            JointType::ShoulderLeft => "shoulder_left",
            JointType::ElbowLeft => "elbow_left",
            JointType::WristLeft => "wrist_left",
            JointType::HandLeft => "hand_left",
            JointType::ShoulderRight => "shoulder_right",
            JointType::ElbowRight => "elbow_right",
            JointType::WristRight => "wrist_right",
            JointType::HandRight => "hand_right",
            JointType::HipLeft => "hip_left",
            JointType::KneeLeft => "knee_left",
            JointType::AnkleLeft => "ankle_left",
            JointType::FootLeft => "foot_left",
            JointType::HipRight => "hip_right",
            JointType::KneeRight => "knee_right",
            JointType::AnkleRight => "ankle_right",
            JointType::FootRight => "foot_right",
            JointType::SpineShoulder => "spine_shoulder",
            JointType::HandTipLeft => "hand_tip_left",
            JointType::ThumbLeft => "thumb_left",
            JointType::HandTipRight => "hand_tip_right",
            JointType::ThumbRight => "thumb_right",
        }
    }
}

/// How confidently the sensor located a joint this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    NotTracked,
    Inferred,
    Tracked,
}

/// A single raw joint observation as delivered by the sensor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawJoint {
    pub kind: JointType,
    /// Camera-space position in metres
    pub position: Point3,
    pub tracking_state: TrackingState,
}

impl RawJoint {
    pub fn new(kind: JointType, position: Point3) -> Self {
        Self {
            kind,
            position,
            tracking_state: TrackingState::Tracked,
        }
    }

    /// A full body worth of joints, all at the camera origin and untracked
    pub fn empty_body() -> [RawJoint; JOINT_COUNT] {
        JointType::ALL.map(|kind| RawJoint {
            kind,
            position: Point3::zeros(),
            tracking_state: TrackingState::NotTracked,
        })
    }
}

/// Render target dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
