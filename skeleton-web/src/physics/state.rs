//! Joint state - per-joint spring-damper smoothing record

use super::joint::{JointType, Point2};

/// Damping applied on each axis unless a joint is tuned otherwise
pub const DEFAULT_DRAG: f32 = 1.5;

/// Multiplier turning the smooth scale into the spring constant
pub const SPRING_STIFFNESS: f32 = 10.0;

/// Smoothing state of one joint of one body
#[derive(Clone, Debug, PartialEq)]
pub struct JointState {
    /// Which skeletal joint this record belongs to
    pub kind: JointType,

    /// Smoothed screen-space position (what gets rendered)
    pub position: Point2,

    /// Velocity from the last integration step
    velocity: Point2,

    /// Latest scaled observation the position eases toward
    pub attraction_point: Point2,

    /// Per-axis damping
    pub drag: Point2,

    /// Rendering hint, no effect on smoothing
    pub is_visible: bool,

    /// Next observation must be taken as-is instead of eased into
    pub needs_realign: bool,
}

impl JointState {
    pub fn new(kind: JointType) -> Self {
        Self {
            kind,
            position: Point2::zeros(),
            velocity: Point2::zeros(),
            attraction_point: Point2::zeros(),
            drag: Point2::repeat(DEFAULT_DRAG),
            is_visible: true,
            needs_realign: true,
        }
    }

    pub fn velocity(&self) -> Point2 {
        self.velocity
    }

    /// True while the position still sits on the origin sentinel
    pub fn is_at_origin(&self) -> bool {
        self.position == Point2::zeros()
    }

    /// Jump straight to `target` and clear the realign flag
    pub fn snap_to(&mut self, target: Point2) {
        self.position = target;
        self.needs_realign = false;
    }

    /// One explicit Euler step toward the attraction point
    ///
    /// ```text
    /// v = (attraction - position) * (10 * smooth_scale)
    /// v = v ∘ drag
    /// position += v * delta
    /// ```
    ///
    /// Not stable for large `delta * smooth_scale`; overshoot is accepted.
    pub fn update_position(&mut self, delta: f32, smooth_scale: f32) {
        let stiffness = SPRING_STIFFNESS * smooth_scale;
        self.velocity = (self.attraction_point - self.position) * stiffness;
        self.velocity = self.velocity.component_mul(&self.drag);
        self.position += self.velocity * delta;
    }

    /// Back to defaults, keeping kind, visibility and the realign flag
    pub fn reset(&mut self) {
        self.velocity = Point2::zeros();
        self.position = Point2::zeros();
        self.attraction_point = Point2::zeros();
        self.drag = Point2::repeat(DEFAULT_DRAG);
    }
}
