use trellis_engine::coords::{Mat4, Viewport};

/// Projection and viewport shared by every draw call of a frame.
///
/// The projection maps logical pixels (top-left origin, +Y down) to clip
/// space. Immutable once built; the window rebuilds it on resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderingContext {
    projection: Mat4,
    viewport: Viewport,
}

impl RenderingContext {
    /// Degenerate sizes are clamped to one logical pixel so the projection
    /// stays finite.
    pub fn new(width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width.max(1.0), height.max(1.0));
        Self {
            projection: Mat4::orthographic(0.0, viewport.width, viewport.height, 0.0, -1.0, 1.0),
            viewport,
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_is_clip_top_left() {
        let ctx = RenderingContext::new(800.0, 600.0);
        let [x, y, _] = ctx.projection().transform_point(0.0, 0.0, 0.0);
        assert!((x + 1.0).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        assert_eq!(ctx.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn zero_size_stays_finite() {
        let ctx = RenderingContext::new(0.0, 0.0);
        assert!(ctx.projection().is_finite());
        assert!(ctx.viewport().is_valid());
    }
}
