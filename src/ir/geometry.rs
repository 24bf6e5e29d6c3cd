use std::sync::{Arc, OnceLock};

use crate::foundation::core::{Point, Rect, Vec2};

/// Elliptical corner radii of a rounded rectangle, one `(rx, ry)` pair per corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadii {
    /// Upper-left corner.
    pub upper_left: Vec2,
    /// Upper-right corner.
    pub upper_right: Vec2,
    /// Lower-right corner.
    pub lower_right: Vec2,
    /// Lower-left corner.
    pub lower_left: Vec2,
}

impl CornerRadii {
    /// Same circular radius on every corner.
    pub fn uniform(r: f64) -> Self {
        let v = Vec2::new(r, r);
        Self {
            upper_left: v,
            upper_right: v,
            lower_right: v,
            lower_left: v,
        }
    }

    /// Corners in clockwise order starting at the upper left.
    pub fn as_array(&self) -> [Vec2; 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_right,
            self.lower_left,
        ]
    }

    /// Inverse of [`CornerRadii::as_array`].
    pub fn from_array(c: [Vec2; 4]) -> Self {
        Self {
            upper_left: c[0],
            upper_right: c[1],
            lower_right: c[2],
            lower_left: c[3],
        }
    }

    /// `true` when every radius component is zero.
    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(|r| r.x == 0.0 && r.y == 0.0)
    }

    /// Nine-patch radii: one horizontal radius per side column and one
    /// vertical radius per side row.
    pub fn nine_patch(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            upper_left: Vec2::new(left, top),
            upper_right: Vec2::new(right, top),
            lower_right: Vec2::new(right, bottom),
            lower_left: Vec2::new(left, bottom),
        }
    }

    /// `[left, top, right, bottom]` when the radii form a nine patch.
    pub fn as_nine_patch(&self) -> Option<[f64; 4]> {
        let (ul, ur, lr, ll) = (
            self.upper_left,
            self.upper_right,
            self.lower_right,
            self.lower_left,
        );
        (ul.x == ll.x && ur.x == lr.x && ul.y == ur.y && ll.y == lr.y)
            .then_some([ul.x, ul.y, ur.x, lr.y])
    }
}

/// A region of the canvas, either a drawn shape or an accumulated clip.
///
/// Shapes produced by the compiler are in device space (the accumulated
/// transform has been applied), except `TextBlob` and `ImageRect`, which are
/// opaque local-space regions.
///
/// Clip chains nest one level per pushed clip, so equality and drop walk
/// `Intersect`/`Difference` operands with an explicit stack.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// The whole canvas; identity for intersection.
    Full,
    /// Axis-aligned rectangle `(l, t, r, b)`.
    Rect(Rect),
    /// Axis-aligned rectangle with elliptical corners.
    RRect {
        /// Bounds.
        rect: Rect,
        /// Per-corner radii.
        radii: CornerRadii,
    },
    /// Ellipse inscribed in the bounds.
    Oval(Rect),
    /// Opaque path, resolved through the [`PathTable`](crate::PathTable).
    Path {
        /// Index of the command that produced the path.
        command: usize,
        /// Slot within that command.
        slot: usize,
    },
    /// Text run, represented by its origin and bounding box only.
    TextBlob {
        /// Baseline origin.
        origin: Point,
        /// Bounding box.
        bounds: Rect,
    },
    /// Destination rectangle of an image draw.
    ImageRect(Rect),
    /// `g1 ∩ g2`; `g1` is the older clip.
    Intersect(Arc<Geometry>, Arc<Geometry>),
    /// `g1 \ g2`; `g1` is the older clip.
    Difference(Arc<Geometry>, Arc<Geometry>),
}

fn shared_full() -> Arc<Geometry> {
    static FULL: OnceLock<Arc<Geometry>> = OnceLock::new();
    Arc::clone(FULL.get_or_init(|| Arc::new(Geometry::Full)))
}

impl Geometry {
    /// Intersection that never keeps `Full` as an operand.
    pub fn intersect(a: Geometry, b: Geometry) -> Geometry {
        match (a, b) {
            (Geometry::Full, g) | (g, Geometry::Full) => g,
            (a, b) => Geometry::Intersect(Arc::new(a), Arc::new(b)),
        }
    }

    /// Difference `a \ b`.
    pub fn difference(a: Geometry, b: Geometry) -> Geometry {
        Geometry::Difference(Arc::new(a), Arc::new(b))
    }

    /// Bounds of the simple box-like shapes (`Rect`, `RRect`, `Oval`, `ImageRect`).
    pub fn box_bounds(&self) -> Option<Rect> {
        match self {
            Geometry::Rect(r) | Geometry::Oval(r) | Geometry::ImageRect(r) => Some(*r),
            Geometry::RRect { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// `true` for `Intersect` and `Difference`.
    pub fn is_compound(&self) -> bool {
        matches!(self, Geometry::Intersect(..) | Geometry::Difference(..))
    }

    fn take_operands(&mut self, out: &mut Vec<Arc<Geometry>>) {
        if let Geometry::Intersect(a, b) | Geometry::Difference(a, b) = self {
            out.push(std::mem::replace(a, shared_full()));
            out.push(std::mem::replace(b, shared_full()));
        }
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Geometry, &Geometry)> = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if std::ptr::eq(a, b) {
                continue;
            }
            let same = match (a, b) {
                (Geometry::Intersect(a1, a2), Geometry::Intersect(b1, b2))
                | (Geometry::Difference(a1, a2), Geometry::Difference(b1, b2)) => {
                    pending.push((a1.as_ref(), b1.as_ref()));
                    pending.push((a2.as_ref(), b2.as_ref()));
                    true
                }
                (Geometry::Full, Geometry::Full) => true,
                (Geometry::Rect(x), Geometry::Rect(y))
                | (Geometry::Oval(x), Geometry::Oval(y))
                | (Geometry::ImageRect(x), Geometry::ImageRect(y)) => x == y,
                (
                    Geometry::RRect { rect: r1, radii: c1 },
                    Geometry::RRect { rect: r2, radii: c2 },
                ) => r1 == r2 && c1 == c2,
                (
                    Geometry::Path {
                        command: c1,
                        slot: s1,
                    },
                    Geometry::Path {
                        command: c2,
                        slot: s2,
                    },
                ) => c1 == c2 && s1 == s2,
                (
                    Geometry::TextBlob {
                        origin: o1,
                        bounds: b1,
                    },
                    Geometry::TextBlob {
                        origin: o2,
                        bounds: b2,
                    },
                ) => o1 == o2 && b1 == b2,
                _ => false,
            };
            if !same {
                return false;
            }
        }
        true
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        if !self.is_compound() {
            return;
        }
        let mut stack = Vec::new();
        self.take_operands(&mut stack);
        while let Some(operand) = stack.pop() {
            if let Ok(mut g) = Arc::try_unwrap(operand) {
                g.take_operands(&mut stack);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/geometry.rs"]
mod tests;
