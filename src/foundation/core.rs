use std::ops::Mul;

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Row-major 4x4 matrix accumulated from `Concat44` commands.
///
/// Only the `z = 0` plane matters for 2D drawing: a point `(x, y)` maps to
/// `(m0*x + m1*y + m3, m4*x + m5*y + m7)` divided by `w = m12*x + m13*y + m15`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform(pub [f64; 16]);

impl Transform {
    /// The identity matrix, the state before any `Concat44`.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Build from 16 row-major coefficients.
    pub fn new(m: [f64; 16]) -> Self {
        Self(m)
    }

    /// Build from four rows of four.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut m = [0.0f64; 16];
        for (r, row) in rows.iter().enumerate() {
            m[r * 4..r * 4 + 4].copy_from_slice(row);
        }
        Self(m)
    }

    /// Pure 2D translation.
    pub fn translate(tx: f64, ty: f64) -> Self {
        let mut m = Self::IDENTITY.0;
        m[3] = tx;
        m[7] = ty;
        Self(m)
    }

    /// Pure 2D (non-uniform) scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        let mut m = Self::IDENTITY.0;
        m[0] = sx;
        m[5] = sy;
        Self(m)
    }

    /// Row-major coefficients.
    pub fn coeffs(&self) -> &[f64; 16] {
        &self.0
    }

    /// `self x rhs`, the composition used when a new matrix is concatenated.
    pub fn concat(&self, rhs: &Self) -> Self {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0f64; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += a[i * 4 + k] * b[k * 4 + j];
                }
                out[i * 4 + j] = acc;
            }
        }
        Self(out)
    }

    /// `true` when this is the identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `true` when the 2D mapping has no perspective component.
    pub fn is_affine(&self) -> bool {
        let m = &self.0;
        m[12] == 0.0 && m[13] == 0.0 && m[15] == 1.0
    }

    /// The 2D affine part, when the mapping is affine.
    pub fn to_affine(&self) -> Option<Affine> {
        if !self.is_affine() {
            return None;
        }
        let m = &self.0;
        Some(Affine::new([m[0], m[4], m[1], m[5], m[3], m[7]]))
    }

    /// Map a point through the full projective mapping.
    ///
    /// Returns `None` when the point lands on or behind the projection plane
    /// (`w <= 0`) or the result is not finite.
    pub fn map_point(&self, p: Point) -> Option<Point> {
        let m = &self.0;
        let x = m[0] * p.x + m[1] * p.y + m[3];
        let y = m[4] * p.x + m[5] * p.y + m[7];
        let w = m[12] * p.x + m[13] * p.y + m[15];
        if w.is_nan() || w <= 0.0 {
            return None;
        }
        let out = Point::new(x / w, y / w);
        (out.x.is_finite() && out.y.is_finite()).then_some(out)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.concat(&rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
