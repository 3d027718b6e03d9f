//! Joint smoother - spring-damper easing of every joint of every tracked body
//!
//! Per frame: project raw joints to screen space, flip Y, refresh each joint's
//! attraction point, then run one integration step per joint. A joint snaps
//! instead of easing while it sits on the origin or is flagged for realign.

use super::config::{ConfigPatch, SmootherConfig};
use super::joint::{JointType, Point2, RawJoint, ScreenSize, BODY_COUNT, JOINT_COUNT};
use super::projection::{project_or_origin, DepthSpaceProjector, PinholeMapper, ScreenProjector};
use super::state::JointState;

/// Smoothing state of every joint of one body slot
pub type JointArray = [JointState; JOINT_COUNT];

/// Owns the smoothing state of `BODY_COUNT` body slots
///
/// Slot indices are assigned by the caller and must stay stable across
/// frames. Not synchronized: drive one instance from one thread.
pub struct JointSmoother<P = DepthSpaceProjector<PinholeMapper>> {
    projector: Option<P>,
    smooth_scale: f32,
    position_scale: f32,
    bodies: [JointArray; BODY_COUNT],
}

impl JointSmoother {
    /// Smoother with no projector: every observation lands on the origin
    pub fn without_projector() -> Self {
        Self::new(None)
    }
}

impl<P: ScreenProjector> JointSmoother<P> {
    pub fn new(projector: Option<P>) -> Self {
        Self {
            projector,
            smooth_scale: 1.0,
            position_scale: 1.0,
            bodies: std::array::from_fn(|_| Self::default_body()),
        }
    }

    pub fn with_config(projector: Option<P>, config: SmootherConfig) -> Self {
        let mut smoother = Self::new(projector);
        smoother.apply_config(config);
        smoother
    }

    fn default_body() -> JointArray {
        JointType::ALL.map(JointState::new)
    }

    fn check_slot(body: usize) {
        assert!(
            body < BODY_COUNT,
            "body slot {} out of range (capacity {})",
            body,
            BODY_COUNT
        );
    }

    /// Advance one body slot by one frame
    ///
    /// - `body`: slot index, panics if `>= BODY_COUNT`
    /// - `delta`: frame time in seconds
    /// - `screen`: render target size in pixels
    /// - `joints`: raw joints in `JointType` index order
    pub fn update_joint_positions(
        &mut self,
        body: usize,
        delta: f32,
        screen: ScreenSize,
        joints: &[RawJoint; JOINT_COUNT],
    ) {
        Self::check_slot(body);
        let scale = self.position_scale;

        for (prop, raw) in self.bodies[body].iter_mut().zip(joints.iter()) {
            let raw_screen = project_or_origin(
                self.projector.as_ref(),
                raw.position,
                screen.width,
                screen.height,
            );
            // Invert the Y axis
            let target = Point2::new(raw_screen.x, screen.height - raw_screen.y) * scale;

            if prop.is_at_origin() || prop.needs_realign {
                prop.snap_to(target);
            }
            prop.attraction_point = target;
        }

        for prop in self.bodies[body].iter_mut() {
            prop.update_position(delta, self.smooth_scale);
        }
    }

    /// Restore every joint of `body` to its default motion state
    ///
    /// The realign flag is left alone; the zeroed position triggers a snap on
    /// the next update anyway.
    pub fn reset(&mut self, body: usize) {
        Self::check_slot(body);
        for prop in self.bodies[body].iter_mut() {
            prop.reset();
        }
        log::debug!("Reset body slot {}", body);
    }

    /// The lower the value, the smoother (and slower) the easing
    pub fn set_smooth_scale(&mut self, scale: f32) {
        if scale.is_nan() || scale <= 0.0 {
            log::warn!("Ignoring non-positive smooth scale {}", scale);
            return;
        }
        self.smooth_scale = scale;
        log::info!("Smooth scale set to {}", scale);
    }

    pub fn smooth_scale(&self) -> f32 {
        self.smooth_scale
    }

    /// Changes the screen-coordinate multiplier and flags every joint of
    /// every body to snap on its next update.
    pub fn set_position_scale(&mut self, scale: f32) {
        if scale.is_nan() || scale <= 0.0 {
            log::warn!("Ignoring non-positive position scale {}", scale);
            return;
        }
        self.position_scale = scale;
        self.invalidate_all();
        log::info!("Position scale set to {}, all joints flagged for realign", scale);
    }

    pub fn position_scale(&self) -> f32 {
        self.position_scale
    }

    /// Flag every joint of every body for realign
    pub fn invalidate_all(&mut self) {
        for prop in self.bodies.iter_mut().flatten() {
            prop.needs_realign = true;
        }
    }

    /// Apply every value that differs from the current one
    ///
    /// Re-applying the current position scale does not flag joints for realign.
    pub fn apply_config(&mut self, config: SmootherConfig) {
        if config.smooth_scale != self.smooth_scale {
            self.set_smooth_scale(config.smooth_scale);
        }
        if config.position_scale != self.position_scale {
            self.set_position_scale(config.position_scale);
        }
    }

    /// Apply only the fields a partial config supplies
    pub fn apply_patch(&mut self, patch: ConfigPatch) {
        self.apply_config(self.config().merged(patch));
    }

    pub fn config(&self) -> SmootherConfig {
        SmootherConfig {
            smooth_scale: self.smooth_scale,
            position_scale: self.position_scale,
        }
    }

    pub fn joint_properties(&self, body: usize) -> &JointArray {
        Self::check_slot(body);
        &self.bodies[body]
    }

    pub fn joint_position(&self, body: usize, joint: JointType) -> Point2 {
        self.joint_properties(body)[joint.index()].position
    }

    pub fn set_joint_visible(&mut self, body: usize, joint: JointType, visible: bool) {
        Self::check_slot(body);
        self.bodies[body][joint.index()].is_visible = visible;
    }

    pub fn is_joint_visible(&self, body: usize, joint: JointType) -> bool {
        self.joint_properties(body)[joint.index()].is_visible
    }

    pub fn has_projector(&self) -> bool {
        self.projector.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::joint::Point3;

    const KINECT_SCREEN: ScreenSize = ScreenSize {
        width: 512.0,
        height: 424.0,
    };
    const DT: f32 = 1.0 / 60.0;

    fn fixed(x: f32, y: f32) -> impl Fn(Point3, f32, f32) -> Point2 {
        move |_p, _w, _h| Point2::new(x, y)
    }

    /// Projector that reads the screen point straight out of the raw x/y
    fn passthrough(p: Point3, _w: f32, _h: f32) -> Point2 {
        Point2::new(p.x, p.y)
    }

    fn body_at(x: f32, y: f32) -> [RawJoint; JOINT_COUNT] {
        JointType::ALL.map(|kind| RawJoint::new(kind, Point3::new(x, y, 1.0)))
    }

    #[test]
    fn test_fresh_smoother_is_at_origin() {
        let smoother = JointSmoother::new(Some(fixed(1.0, 1.0)));
        for body in 0..BODY_COUNT {
            for (i, prop) in smoother.joint_properties(body).iter().enumerate() {
                assert_eq!(prop.kind.index(), i);
                assert_eq!(prop.position, Point2::zeros());
                assert_eq!(prop.velocity(), Point2::zeros());
                assert!(prop.needs_realign);
            }
        }
        assert_eq!(smoother.smooth_scale(), 1.0);
        assert_eq!(smoother.position_scale(), 1.0);
    }

    #[test]
    fn test_first_update_snaps_regardless_of_delta() {
        for delta in [DT, 0.5, 3.0] {
            let mut smoother = JointSmoother::new(Some(fixed(100.0, 50.0)));
            smoother.update_joint_positions(0, delta, KINECT_SCREEN, &RawJoint::empty_body());
            for prop in smoother.joint_properties(0) {
                assert_eq!(prop.position, Point2::new(100.0, 374.0));
                assert!(!prop.needs_realign);
            }
        }
    }

    #[test]
    fn test_end_to_end_snap_then_hold() {
        let mut smoother = JointSmoother::new(Some(fixed(100.0, 50.0)));
        let joints = RawJoint::empty_body();

        smoother.update_joint_positions(0, DT, KINECT_SCREEN, &joints);
        for joint in JointType::ALL {
            assert_eq!(smoother.joint_position(0, joint), Point2::new(100.0, 374.0));
        }

        smoother.update_joint_positions(0, DT, KINECT_SCREEN, &joints);
        for prop in smoother.joint_properties(0) {
            assert_eq!(prop.position, Point2::new(100.0, 374.0));
            assert_eq!(prop.velocity(), Point2::zeros());
        }
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        smoother.update_joint_positions(0, DT, ScreenSize::new(800.0, 600.0), &body_at(10.0, 100.0));
        assert_eq!(smoother.joint_position(0, JointType::Head), Point2::new(10.0, 500.0));
    }

    #[test]
    fn test_position_scale_applies_to_target() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        smoother.set_position_scale(2.0);
        smoother.update_joint_positions(0, DT, ScreenSize::new(800.0, 600.0), &body_at(10.0, 100.0));

        let prop = &smoother.joint_properties(0)[JointType::Head.index()];
        assert_eq!(prop.position, Point2::new(20.0, 1000.0));
        assert_eq!(prop.attraction_point, Point2::new(20.0, 1000.0));
    }

    #[test]
    fn test_eases_toward_new_observation() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));

        // 100 * 10 * 1.5 / 60 = 25 pixels toward the target
        let pos = smoother.joint_position(0, JointType::Head);
        assert!((pos.x - 125.0).abs() < 1e-3);
        assert!((pos.y - 300.0).abs() < 1e-3);
        let prop = &smoother.joint_properties(0)[JointType::Head.index()];
        assert_eq!(prop.attraction_point, Point2::new(200.0, 300.0));
    }

    #[test]
    fn test_converges_monotonically_when_stable() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(1, DT, screen, &body_at(50.0, 300.0));

        // dt * 10 * drag = 0.25: the error shrinks by a quarter each frame
        let target = body_at(250.0, 100.0);
        let mut last_error = f32::MAX;
        for _ in 0..40 {
            smoother.update_joint_positions(1, DT, screen, &target);
            let prop = &smoother.joint_properties(1)[JointType::Head.index()];
            let error = (prop.attraction_point - prop.position).norm();
            assert!(error < last_error);
            last_error = error;
        }
        assert!(last_error < 1e-2);
    }

    #[test]
    fn test_large_delta_overshoots_by_euler_factor() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));

        // factor = 10 * 1.5 * 0.2 = 3: the error flips sign and doubles
        smoother.update_joint_positions(0, 0.2, screen, &body_at(200.0, 300.0));

        let pos = smoother.joint_position(0, JointType::Head);
        assert!((pos.x - 400.0).abs() < 1e-2);
        assert!((pos.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_scale_divides_spring_strength() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.set_smooth_scale(0.5);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));

        let pos = smoother.joint_position(0, JointType::Head);
        assert!((pos.x - 112.5).abs() < 1e-3);
    }

    #[test]
    fn test_non_positive_scales_are_ignored() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.set_smooth_scale(2.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        let before = smoother.joint_properties(0).clone();

        for bad in [0.0, -1.0, f32::NAN] {
            smoother.set_smooth_scale(bad);
            smoother.set_position_scale(bad);
        }

        assert_eq!(smoother.smooth_scale(), 2.0);
        assert_eq!(smoother.position_scale(), 1.0);
        assert_eq!(smoother.joint_properties(0), &before);
    }

    #[test]
    fn test_position_rescale_forces_snap() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));
        assert_ne!(smoother.joint_properties(0)[0].velocity(), Point2::zeros());

        smoother.set_position_scale(1.5);
        assert!(smoother.joint_properties(0).iter().all(|p| p.needs_realign));
        assert!(smoother.joint_properties(5).iter().all(|p| p.needs_realign));

        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));
        for prop in smoother.joint_properties(0) {
            assert_eq!(prop.position, Point2::new(300.0, 450.0));
            assert!(!prop.needs_realign);
        }
    }

    #[test]
    fn test_reset_clears_only_that_slot() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));
        smoother.update_joint_positions(1, DT, screen, &body_at(50.0, 50.0));
        let other = smoother.joint_properties(1).clone();

        smoother.reset(0);

        for prop in smoother.joint_properties(0) {
            assert_eq!(prop.position, Point2::zeros());
            assert_eq!(prop.velocity(), Point2::zeros());
            assert_eq!(prop.attraction_point, Point2::zeros());
        }
        assert_eq!(smoother.joint_properties(1), &other);
    }

    #[test]
    fn test_reset_slot_snaps_on_next_update() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.reset(0);
        assert!(!smoother.joint_properties(0)[0].needs_realign);

        smoother.update_joint_positions(0, DT, screen, &body_at(400.0, 100.0));
        assert_eq!(smoother.joint_position(0, JointType::Head), Point2::new(400.0, 500.0));
    }

    #[test]
    fn test_visibility_is_independent_of_motion() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));
        let before = smoother.joint_properties(0)[JointType::HandLeft.index()].clone();

        smoother.set_joint_visible(0, JointType::HandLeft, false);
        assert!(!smoother.is_joint_visible(0, JointType::HandLeft));
        assert!(smoother.is_joint_visible(0, JointType::HandRight));

        let after = &smoother.joint_properties(0)[JointType::HandLeft.index()];
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity(), before.velocity());
        assert_eq!(after.attraction_point, before.attraction_point);

        smoother.set_joint_visible(0, JointType::HandLeft, true);
        assert!(smoother.is_joint_visible(0, JointType::HandLeft));
    }

    #[test]
    fn test_updating_one_slot_leaves_others_untouched() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(2, DT, screen, &body_at(10.0, 10.0));
        let snapshot: Vec<JointArray> = (0..BODY_COUNT)
            .map(|b| smoother.joint_properties(b).clone())
            .collect();

        smoother.update_joint_positions(3, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(3, DT, screen, &body_at(200.0, 300.0));

        for body in (0..BODY_COUNT).filter(|&b| b != 3) {
            assert_eq!(smoother.joint_properties(body), &snapshot[body]);
        }
    }

    #[test]
    fn test_missing_projector_degrades_to_origin() {
        let mut smoother = JointSmoother::without_projector();
        assert!(!smoother.has_projector());
        smoother.update_joint_positions(0, DT, ScreenSize::new(640.0, 480.0), &body_at(1.0, 1.0));
        assert_eq!(smoother.joint_position(0, JointType::Head), Point2::new(0.0, 480.0));
    }

    #[test]
    fn test_with_config_applies_valid_values_only() {
        let config = SmootherConfig {
            smooth_scale: 0.25,
            position_scale: -3.0,
        };
        let smoother = JointSmoother::with_config(Some(passthrough), config);
        assert_eq!(smoother.smooth_scale(), 0.25);
        assert_eq!(smoother.position_scale(), 1.0);
        assert_eq!(
            smoother.config(),
            SmootherConfig {
                smooth_scale: 0.25,
                position_scale: 1.0
            }
        );
    }

    #[test]
    fn test_partial_config_keeps_position_scale() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.set_position_scale(2.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));
        smoother.update_joint_positions(0, DT, screen, &body_at(200.0, 300.0));
        let before = smoother.joint_properties(0).clone();

        smoother.apply_patch(ConfigPatch {
            smooth_scale: Some(0.5),
            position_scale: None,
        });

        assert_eq!(smoother.smooth_scale(), 0.5);
        assert_eq!(smoother.position_scale(), 2.0);
        assert!(smoother.joint_properties(0).iter().all(|p| !p.needs_realign));
        assert_eq!(smoother.joint_properties(0), &before);
    }

    #[test]
    fn test_reapplying_same_position_scale_keeps_tracking() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        smoother.update_joint_positions(0, DT, screen, &body_at(100.0, 300.0));

        smoother.apply_config(SmootherConfig::default());

        assert!(smoother.joint_properties(0).iter().all(|p| !p.needs_realign));
    }

    #[test]
    fn test_joint_eased_onto_origin_snaps_next_frame() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        let screen = ScreenSize::new(800.0, 600.0);
        // stiffness 1.0, drag 1.5, dt 2/3: the step covers the whole gap
        smoother.set_smooth_scale(0.1);
        smoother.update_joint_positions(0, DT, screen, &body_at(2.0, 598.0));
        assert_eq!(smoother.joint_position(0, JointType::Head), Point2::new(2.0, 2.0));

        // raw (0, height) flips onto the origin
        smoother.update_joint_positions(0, 2.0 / 3.0, screen, &body_at(0.0, 600.0));
        let prop = &smoother.joint_properties(0)[JointType::Head.index()];
        assert_eq!(prop.position, Point2::zeros());
        assert!(!prop.needs_realign);

        // Sitting on the origin counts as uninitialized: snap, no easing
        smoother.update_joint_positions(0, DT, screen, &body_at(50.0, 500.0));
        assert_eq!(smoother.joint_position(0, JointType::Head), Point2::new(50.0, 100.0));
    }

    #[test]
    #[should_panic(expected = "body slot 6 out of range")]
    fn test_out_of_range_slot_panics() {
        let mut smoother = JointSmoother::new(Some(passthrough));
        smoother.update_joint_positions(BODY_COUNT, DT, KINECT_SCREEN, &RawJoint::empty_body());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_reset_panics() {
        let mut smoother = JointSmoother::without_projector();
        smoother.reset(BODY_COUNT + 3);
    }
}
