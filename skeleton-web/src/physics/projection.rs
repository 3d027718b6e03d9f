//! Camera-space to screen-space projection
//!
//! The smoother only needs `ScreenProjector`. `DepthSpaceProjector` maps a
//! camera point into the depth image (fixed 512×424 reference resolution)
//! through a `DepthMapper`, then rescales to the render target.

use super::joint::{Point2, Point3};

/// Depth image reference width (pixels)
pub const DEPTH_WIDTH: f32 = 512.0;
/// Depth image reference height (pixels)
pub const DEPTH_HEIGHT: f32 = 424.0;

/// Maps a 3D camera-space point to a 2D point on a `width`×`height` target
pub trait ScreenProjector {
    fn project(&self, point: Point3, width: f32, height: f32) -> Point2;
}

impl<F> ScreenProjector for F
where
    F: Fn(Point3, f32, f32) -> Point2,
{
    fn project(&self, point: Point3, width: f32, height: f32) -> Point2 {
        self(point, width, height)
    }
}

/// Camera space → depth image coordinates. `None` when the point can't be mapped.
pub trait DepthMapper {
    fn camera_to_depth(&self, point: Point3) -> Option<Point2>;
}

/// Pinhole model of the depth camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeMapper {
    /// Focal length in pixels
    pub fx: f32,
    pub fy: f32,
    /// Principal point in pixels
    pub cx: f32,
    pub cy: f32,
}

impl PinholeMapper {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }
}

impl Default for PinholeMapper {
    /// Nominal depth camera intrinsics
    fn default() -> Self {
        Self::new(365.456, 365.456, 254.878, 205.395)
    }
}

impl DepthMapper for PinholeMapper {
    /// Camera space is Y-up; depth image rows grow downward.
    fn camera_to_depth(&self, point: Point3) -> Option<Point2> {
        if point.z.is_nan() || point.z <= 0.0 {
            return None;
        }

        let u = self.cx + self.fx * point.x / point.z;
        let v = self.cy - self.fy * point.y / point.z;

        if u.is_finite() && v.is_finite() {
            Some(Point2::new(u, v))
        } else {
            None
        }
    }
}

/// Depth-image projection rescaled to an arbitrary render target
#[derive(Clone, Debug, Default)]
pub struct DepthSpaceProjector<M> {
    mapper: M,
}

impl<M: DepthMapper> DepthSpaceProjector<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }
}

impl<M: DepthMapper> ScreenProjector for DepthSpaceProjector<M> {
    /// Target size is taken in whole pixels; fractions are truncated.
    fn project(&self, point: Point3, width: f32, height: f32) -> Point2 {
        match self.mapper.camera_to_depth(point) {
            Some(depth) => Point2::new(
                depth.x * width.trunc() / DEPTH_WIDTH,
                depth.y * height.trunc() / DEPTH_HEIGHT,
            ),
            None => Point2::zeros(),
        }
    }
}

/// Projection through an optional projector; absent means origin
pub fn project_or_origin<P: ScreenProjector>(
    projector: Option<&P>,
    point: Point3,
    width: f32,
    height: f32,
) -> Point2 {
    match projector {
        Some(p) => p.project(point, width, height),
        None => Point2::zeros(),
    }
}
