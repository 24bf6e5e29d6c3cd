use std::collections::BTreeMap;

use crate::foundation::core::{Affine, Point, Rect, Transform};

/// Winding rule of a path, as recorded by Skia.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    Winding,
    /// Even-odd.
    EvenOdd,
    /// Outside of the non-zero region.
    InverseWinding,
    /// Outside of the even-odd region.
    InverseEvenOdd,
}

impl FillRule {
    /// `true` for the inverse rules, which cover everything outside the outline.
    pub fn is_inverse(self) -> bool {
        matches!(self, FillRule::InverseWinding | FillRule::InverseEvenOdd)
    }
}

/// One path segment. Conics are rational quadratics with weight `w`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathVerb {
    /// Start a new contour.
    Move(Point),
    /// Straight segment.
    Line(Point),
    /// Quadratic Bézier (control, end).
    Quad(Point, Point),
    /// Conic section (control, end, weight).
    Conic(Point, Point, f64),
    /// Cubic Bézier (control 1, control 2, end).
    Cubic(Point, Point, Point),
    /// Close the current contour.
    Close,
}

impl PathVerb {
    fn map(self, mut f: impl FnMut(Point) -> Point) -> PathVerb {
        match self {
            PathVerb::Move(p) => PathVerb::Move(f(p)),
            PathVerb::Line(p) => PathVerb::Line(f(p)),
            PathVerb::Quad(c, p) => PathVerb::Quad(f(c), f(p)),
            PathVerb::Conic(c, p, w) => PathVerb::Conic(f(c), f(p), w),
            PathVerb::Cubic(c1, c2, p) => PathVerb::Cubic(f(c1), f(c2), f(p)),
            PathVerb::Close => PathVerb::Close,
        }
    }
}

/// An exact outline: verbs plus fill rule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    /// Fill rule.
    pub fill_rule: FillRule,
    /// Segments in recording order.
    pub verbs: Vec<PathVerb>,
}

impl PathData {
    /// Empty path with the given fill rule.
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            fill_rule,
            verbs: Vec::new(),
        }
    }

    /// Every on-curve and control point, in order.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.verbs.len() * 2);
        for v in &self.verbs {
            match *v {
                PathVerb::Move(p) | PathVerb::Line(p) => out.push(p),
                PathVerb::Quad(c, p) | PathVerb::Conic(c, p, _) => {
                    out.push(c);
                    out.push(p);
                }
                PathVerb::Cubic(c1, c2, p) => {
                    out.push(c1);
                    out.push(c2);
                    out.push(p);
                }
                PathVerb::Close => {}
            }
        }
        out
    }

    /// Bounding box of all points (control points included).
    pub fn control_bounds(&self) -> Option<Rect> {
        let pts = self.points();
        let first = *pts.first()?;
        let mut r = Rect::from_points(first, first);
        for p in &pts[1..] {
            r = r.union_pt(*p);
        }
        Some(r)
    }

    /// Apply an affine map to every point. Exact for every verb kind.
    pub fn transformed(&self, affine: Affine) -> PathData {
        PathData {
            fill_rule: self.fill_rule,
            verbs: self.verbs.iter().map(|v| v.map(|p| affine * p)).collect(),
        }
    }

    /// `true` when every coordinate and conic weight is finite.
    pub fn is_finite(&self) -> bool {
        let weights_ok = self.verbs.iter().all(|v| match v {
            PathVerb::Conic(_, _, w) => w.is_finite(),
            _ => true,
        });
        weights_ok && self.points().iter().all(|p| p.is_finite())
    }
}

/// A path stored in the side table.
///
/// When `projection` is `None`, `path` is already in device space. Otherwise
/// `path` is in local space and maps to device space through `projection`,
/// because a perspective mapping of curves has no exact verb-level form.
#[derive(Clone, Debug, PartialEq)]
pub struct PathEntry {
    /// The outline.
    pub path: PathData,
    /// Perspective matrix still to be applied, if any.
    pub projection: Option<Transform>,
}

/// Side store for shapes that canonicalize to an opaque [`Geometry::Path`](crate::Geometry::Path).
///
/// Keyed by `(command_index, slot)`; slots count up from zero per command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathTable {
    entries: BTreeMap<(usize, usize), PathEntry>,
}

impl PathTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` in the next free slot of `command`, returning the key.
    pub fn insert(&mut self, command: usize, entry: PathEntry) -> (usize, usize) {
        let slot = self
            .entries
            .range((command, 0)..=(command, usize::MAX))
            .count();
        self.entries.insert((command, slot), entry);
        (command, slot)
    }

    /// Look up an entry.
    pub fn get(&self, command: usize, slot: usize) -> Option<&PathEntry> {
        self.entries.get(&(command, slot))
    }

    /// Number of stored paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no path was stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(usize, usize), &PathEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/path.rs"]
mod tests;
