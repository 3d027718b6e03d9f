//! Physics module - spring-damper joint smoothing
//!
//! Re-exports only. All logic in submodules.

mod joint;
mod state;
mod projection;
mod config;
mod smoother;

pub use joint::{JointType, TrackingState, RawJoint, ScreenSize, Point2, Point3, JOINT_COUNT, BODY_COUNT};
pub use state::{JointState, DEFAULT_DRAG, SPRING_STIFFNESS};
pub use projection::{ScreenProjector, DepthMapper, DepthSpaceProjector, PinholeMapper, DEPTH_WIDTH, DEPTH_HEIGHT};
pub use config::{SmootherConfig, ConfigPatch};
pub use smoother::{JointSmoother, JointArray};
