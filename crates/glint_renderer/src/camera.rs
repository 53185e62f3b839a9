//! Pinhole eye looking through a screen window on the `z = 0` plane.

use glint_core::View;
use glint_math::Vec3;

/// Maps pixel coordinates to primary ray directions.
///
/// Pixel `(x, y)` samples the screen point `(left + x*dx, top + (y+1)*dy, 0)`
/// of the view window. Column 0 lies on the left edge of the window while
/// row 0 lies one step below its top edge, so the last row lands on the
/// bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    left: f32,
    /// Screen y of row 0
    top: f32,
    dx: f32,
    dy: f32,
}

impl Camera {
    pub fn new(view: &View, width: u32, height: u32) -> Self {
        let w = &view.window;
        let dy = (w.bottom - w.top) / height.max(1) as f32;
        Self {
            eye: view.eye,
            left: w.left,
            top: w.top + dy,
            dx: (w.right - w.left) / width.max(1) as f32,
            dy,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Screen step per pixel along x and y.
    pub fn pixel_delta(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }

    /// Point on the screen plane for a (possibly fractional) pixel position.
    #[inline]
    pub fn screen_point(&self, x: f32, y: f32) -> Vec3 {
        Vec3::new(self.left + x * self.dx, self.top + y * self.dy, 0.0)
    }

    /// Unit direction from the eye through pixel `(x, y)` nudged by a screen-space offset.
    #[inline]
    pub fn direction(&self, x: u32, y: u32, offset_x: f32, offset_y: f32) -> Vec3 {
        let p = self.screen_point(x as f32, y as f32) + Vec3::new(offset_x, offset_y, 0.0);
        (p - self.eye).normalize_or_zero()
    }
}
