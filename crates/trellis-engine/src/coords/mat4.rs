use core::ops::Mul;

/// 4×4 column-major matrix.
///
/// Layout matches WGSL `mat4x4<f32>`: `cols[c][r]` is column `c`, row `r`.
/// Vectors are treated as columns, so `a * b` applies `b` first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    #[inline]
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    #[inline]
    pub const fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Right-handed orthographic projection with a `[0, 1]` depth range.
    ///
    /// Passing `bottom > top` (e.g. `orthographic(0, w, h, 0, -1, 1)`) yields
    /// the top-left-origin, +Y-down mapping used for logical pixels.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rcp_w = 1.0 / (right - left);
        let rcp_h = 1.0 / (top - bottom);
        let r = 1.0 / (near - far);
        Self {
            cols: [
                [rcp_w + rcp_w, 0.0, 0.0, 0.0],
                [0.0, rcp_h + rcp_h, 0.0, 0.0],
                [0.0, 0.0, r, 0.0],
                [-(left + right) * rcp_w, -(top + bottom) * rcp_h, r * near, 1.0],
            ],
        }
    }

    /// Transforms the point `(x, y, z, 1)` and returns `xyz / w`.
    pub fn transform_point(&self, x: f32, y: f32, z: f32) -> [f32; 3] {
        let c = &self.cols;
        let mut out = [0.0f32; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = c[0][row] * x + c[1][row] * y + c[2][row] * z + c[3][row];
        }
        let w = if out[3] != 0.0 { out[3] } else { 1.0 };
        [out[0] / w, out[1] / w, out[2] / w]
    }

    #[inline]
    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        self.cols
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut cols = [[0.0f32; 4]; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            for (r, v) in col.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_is_neutral() {
        let m = Mat4::translation(3.0, 4.0, 0.0);
        assert_eq!(Mat4::IDENTITY * m, m);
        assert_eq!(m * Mat4::IDENTITY, m);
    }

    #[test]
    fn translate_then_scale_maps_unit_quad() {
        // translate ∘ scale: scale applies first.
        let m = Mat4::translation(50.0, 20.0, 0.0) * Mat4::scale(100.0, 40.0, 1.0);
        assert!(approx(m.transform_point(0.0, 0.0, 0.0), [50.0, 20.0, 0.0]));
        assert!(approx(m.transform_point(1.0, 1.0, 0.0), [150.0, 60.0, 0.0]));
    }

    #[test]
    fn orthographic_maps_corners_to_clip_space() {
        let p = Mat4::orthographic(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        assert!(approx(p.transform_point(0.0, 0.0, 0.0), [-1.0, 1.0, 0.5]));
        assert!(approx(p.transform_point(800.0, 600.0, 0.0), [1.0, -1.0, 0.5]));
        assert!(approx(p.transform_point(400.0, 300.0, 0.0), [0.0, 0.0, 0.5]));
    }

    #[test]
    fn zero_scale_is_degenerate_but_finite() {
        let m = Mat4::translation(10.0, 10.0, 0.0) * Mat4::scale(0.0, -5.0, 1.0);
        assert!(m.is_finite());
        assert!(approx(m.transform_point(1.0, 1.0, 0.0), [10.0, 5.0, 0.0]));
    }
}
