use cgmath::{Vector3, Vector4};

use crate::gfx::device::{Context, GraphicsDevice};

/// Window-space rectangle that normalized device coordinates map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y
    }

    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.bottom() && y <= self.top()
    }

    pub fn apply<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().viewport(self.x, self.y, self.width, self.height);
    }

    /// Maps a point in normalized device coordinates to window coordinates,
    /// with depth mapped into `[near, far]`.
    pub fn ndc_to_window(&self, ndc: Vector4<f32>, near: f32, far: f32) -> Vector3<f32> {
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        Vector3::new(
            half_w * ndc.x + (self.x as f32 + half_w),
            half_h * ndc.y + (self.y as f32 + half_h),
            (far - near) / 2.0 * ndc.z + (far + near) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::HeadlessDevice;

    #[test]
    fn test_edges_and_aspect() {
        let vp = Viewport::new(10, 20, 300, 150);
        assert_eq!((vp.left(), vp.right(), vp.bottom(), vp.top()), (10, 310, 20, 170));
        assert_eq!(vp.aspect(), 2.0);
        assert!(vp.contains(310, 170));
        assert!(!vp.contains(9, 100));
    }

    #[test]
    fn test_ndc_corners() {
        let vp = Viewport::new(0, 0, 101, 50);
        let low = vp.ndc_to_window(Vector4::new(-1.0, -1.0, -1.0, 1.0), 0.0, 1.0);
        let high = vp.ndc_to_window(Vector4::new(1.0, 1.0, 1.0, 1.0), 0.0, 1.0);
        assert_eq!(low, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(high, Vector3::new(101.0, 50.0, 1.0));
    }

    #[test]
    fn test_apply() {
        let mut ctx = Context::new(HeadlessDevice::new());
        Viewport::new(1, 2, 3, 4).apply(&mut ctx);
        assert_eq!(ctx.device().viewport_rect(), [1, 2, 3, 4]);
    }
}
