use std::f64::consts::FRAC_1_SQRT_2;

use crate::foundation::core::{Point, Rect, Transform, Vec2};
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::geometry::{CornerRadii, Geometry};
use crate::ir::path::{FillRule, PathData, PathEntry, PathTable, PathVerb};
use crate::stream::command::Shape;

const RADIUS_TOLERANCE: f64 = 1e-9;

/// Reduce a local-space shape to the simplest exact device-space geometry.
///
/// Shapes that stay axis-aligned boxes under `transform` come back as
/// `Rect`, `RRect` or `Oval`; everything else is stored in `paths` under the
/// command `index` and referenced as `Geometry::Path`.
pub(crate) fn canonicalize(
    shape: &Shape,
    transform: &Transform,
    index: usize,
    paths: &mut PathTable,
) -> LskiaResult<Geometry> {
    let local = match shape {
        Shape::Full => return Ok(Geometry::Full),
        Shape::TextBlob { origin, bounds } => {
            ensure_finite(index, &[origin.x, origin.y])?;
            ensure_finite_rect(index, bounds)?;
            return Ok(Geometry::TextBlob {
                origin: *origin,
                bounds: *bounds,
            });
        }
        Shape::ImageRect(r) => {
            ensure_finite_rect(index, r)?;
            return Ok(Geometry::ImageRect(*r));
        }
        Shape::Rect(r) => {
            ensure_finite_rect(index, r)?;
            rect_path(*r)
        }
        Shape::Oval(r) => {
            ensure_finite_rect(index, r)?;
            oval_path(*r)
        }
        Shape::RRect { rect, radii } => {
            ensure_finite_rect(index, rect)?;
            for c in radii.as_array() {
                ensure_finite(index, &[c.x, c.y])?;
                if c.x < 0.0 || c.y < 0.0 {
                    return Err(LskiaError::malformed_geometry(index, "negative corner radius"));
                }
            }
            rrect_path(*rect, radii)
        }
        Shape::Path(p) => {
            if !p.is_finite() {
                return Err(LskiaError::malformed_geometry(
                    index,
                    "path has non-finite coordinates",
                ));
            }
            p.clone()
        }
    };

    let Some(affine) = transform.to_affine() else {
        return projective_entry(local, transform, index, paths);
    };

    let device = local.transformed(affine);
    if !device.is_finite() {
        return Err(LskiaError::malformed_geometry(
            index,
            "shape has non-finite coordinates after transform",
        ));
    }

    if let Some(rect) = as_rect(&device) {
        return Ok(Geometry::Rect(rect));
    }
    if let Some(g) = as_rounded(&device) {
        return Ok(g);
    }

    let (command, slot) = paths.insert(
        index,
        PathEntry {
            path: device,
            projection: None,
        },
    );
    tracing::trace!(command, slot, "shape stored as path");
    Ok(Geometry::Path { command, slot })
}

fn projective_entry(
    local: PathData,
    transform: &Transform,
    index: usize,
    paths: &mut PathTable,
) -> LskiaResult<Geometry> {
    if local
        .points()
        .into_iter()
        .any(|p| transform.map_point(p).is_none())
    {
        return Err(LskiaError::malformed_geometry(
            index,
            "perspective maps a vertex onto or behind the projection plane",
        ));
    }
    let (command, slot) = paths.insert(
        index,
        PathEntry {
            path: local,
            projection: Some(*transform),
        },
    );
    tracing::trace!(command, slot, "perspective shape stored as path");
    Ok(Geometry::Path { command, slot })
}

fn ensure_finite(index: usize, values: &[f64]) -> LskiaResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LskiaError::malformed_geometry(index, "non-finite coordinate"))
    }
}

fn ensure_finite_rect(index: usize, r: &Rect) -> LskiaResult<()> {
    ensure_finite(index, &[r.x0, r.y0, r.x1, r.y1])
}

pub(crate) fn rect_path(r: Rect) -> PathData {
    PathData {
        fill_rule: FillRule::Winding,
        verbs: vec![
            PathVerb::Move(Point::new(r.x0, r.y0)),
            PathVerb::Line(Point::new(r.x1, r.y0)),
            PathVerb::Line(Point::new(r.x1, r.y1)),
            PathVerb::Line(Point::new(r.x0, r.y1)),
            PathVerb::Close,
        ],
    }
}

pub(crate) fn oval_path(r: Rect) -> PathData {
    let r = r.abs();
    let (cx, cy) = ((r.x0 + r.x1) / 2.0, (r.y0 + r.y1) / 2.0);
    let w = FRAC_1_SQRT_2;
    PathData {
        fill_rule: FillRule::Winding,
        verbs: vec![
            PathVerb::Move(Point::new(cx, r.y0)),
            PathVerb::Conic(Point::new(r.x1, r.y0), Point::new(r.x1, cy), w),
            PathVerb::Conic(Point::new(r.x1, r.y1), Point::new(cx, r.y1), w),
            PathVerb::Conic(Point::new(r.x0, r.y1), Point::new(r.x0, cy), w),
            PathVerb::Conic(Point::new(r.x0, r.y0), Point::new(cx, r.y0), w),
            PathVerb::Close,
        ],
    }
}

/// Clockwise from the top edge. A zero radius gives a degenerate corner conic.
pub(crate) fn rrect_path(r: Rect, radii: &CornerRadii) -> PathData {
    let r = r.abs();
    let [ul, ur, lr, ll] = radii.as_array();
    let w = FRAC_1_SQRT_2;
    PathData {
        fill_rule: FillRule::Winding,
        verbs: vec![
            PathVerb::Move(Point::new(r.x0 + ul.x, r.y0)),
            PathVerb::Line(Point::new(r.x1 - ur.x, r.y0)),
            PathVerb::Conic(Point::new(r.x1, r.y0), Point::new(r.x1, r.y0 + ur.y), w),
            PathVerb::Line(Point::new(r.x1, r.y1 - lr.y)),
            PathVerb::Conic(Point::new(r.x1, r.y1), Point::new(r.x1 - lr.x, r.y1), w),
            PathVerb::Line(Point::new(r.x0 + ll.x, r.y1)),
            PathVerb::Conic(Point::new(r.x0, r.y1), Point::new(r.x0, r.y1 - ll.y), w),
            PathVerb::Line(Point::new(r.x0, r.y0 + ul.y)),
            PathVerb::Conic(Point::new(r.x0, r.y0), Point::new(r.x0 + ul.x, r.y0), w),
            PathVerb::Close,
        ],
    }
}

/// Start point and segments of a single explicitly closed contour.
fn closed_contour(path: &PathData) -> Option<(Point, &[PathVerb])> {
    if path.fill_rule.is_inverse() {
        return None;
    }
    let (PathVerb::Move(start), rest) = path.verbs.split_first()? else {
        return None;
    };
    let (PathVerb::Close, segments) = rest.split_last()? else {
        return None;
    };
    if segments
        .iter()
        .any(|v| matches!(v, PathVerb::Move(_) | PathVerb::Close))
    {
        return None;
    }
    Some((*start, segments))
}

fn corner_of(p: Point, b: Rect) -> Option<usize> {
    match (p.x == b.x0, p.x == b.x1, p.y == b.y0, p.y == b.y1) {
        (true, _, true, _) => Some(0),
        (_, true, true, _) => Some(1),
        (_, true, _, true) => Some(2),
        (true, _, _, true) => Some(3),
        _ => None,
    }
}

/// A closed contour of four axis-aligned corners.
pub(crate) fn as_rect(path: &PathData) -> Option<Rect> {
    let (start, segments) = closed_contour(path)?;
    let mut pts = Vec::with_capacity(5);
    pts.push(start);
    for v in segments {
        let PathVerb::Line(p) = v else {
            return None;
        };
        pts.push(*p);
    }
    if pts.len() == 5 && pts[4] == pts[0] {
        pts.pop();
    }
    if pts.len() != 4 {
        return None;
    }

    let bounds = path.control_bounds()?;
    let mut seen = [false; 4];
    for (i, p) in pts.iter().enumerate() {
        let q = pts[(i + 1) % 4];
        if p.x != q.x && p.y != q.y {
            return None;
        }
        seen[corner_of(*p, bounds)?] = true;
    }
    let degenerate = bounds.width() == 0.0 || bounds.height() == 0.0;
    (degenerate || seen.iter().all(|s| *s)).then_some(bounds)
}

/// Rounded-rect outline: edge lines plus one quarter conic per bounding-box
/// corner. Yields `Rect` for zero radii and `Oval` for half-size radii.
pub(crate) fn as_rounded(path: &PathData) -> Option<Geometry> {
    let (start, segments) = closed_contour(path)?;
    let bounds = path.control_bounds()?;
    if bounds.width() == 0.0 || bounds.height() == 0.0 || segments.len() > 8 {
        return None;
    }

    let mut radii: [Option<Vec2>; 4] = [None; 4];
    let mut order = Vec::with_capacity(4);
    let mut prev = start;
    for (i, seg) in segments.iter().enumerate() {
        let next_is_line = matches!(segments[(i + 1) % segments.len()], PathVerb::Line(_));
        match *seg {
            PathVerb::Line(p) => {
                let on_edge = (prev.x == p.x && (p.x == bounds.x0 || p.x == bounds.x1))
                    || (prev.y == p.y && (p.y == bounds.y0 || p.y == bounds.y1));
                if !on_edge || next_is_line {
                    return None;
                }
                prev = p;
            }
            PathVerb::Conic(c, p, w) => {
                if w != FRAC_1_SQRT_2 {
                    return None;
                }
                let corner = corner_of(c, bounds)?;
                let quarter = (prev.x == c.x && p.y == c.y) || (prev.y == c.y && p.x == c.x);
                if !quarter || radii[corner].is_some() {
                    return None;
                }
                radii[corner] = Some(Vec2::new(
                    (prev.x - c.x).abs().max((p.x - c.x).abs()),
                    (prev.y - c.y).abs().max((p.y - c.y).abs()),
                ));
                order.push(corner);
                prev = p;
            }
            _ => return None,
        }
    }
    if prev != start || order.len() != 4 {
        return None;
    }

    let step = (order[1] + 4 - order[0]) % 4;
    if step != 1 && step != 3 {
        return None;
    }
    if (0..4).any(|i| (order[(i + 1) % 4] + 4 - order[i]) % 4 != step) {
        return None;
    }

    let [Some(ul), Some(ur), Some(lr), Some(ll)] = radii else {
        return None;
    };
    let (w, h) = (bounds.width(), bounds.height());
    // Radii are differences of mapped coordinates; allow for rounding.
    let tol = RADIUS_TOLERANCE * w.max(h);
    if ul.x + ur.x > w + tol
        || ll.x + lr.x > w + tol
        || ul.y + ll.y > h + tol
        || ur.y + lr.y > h + tol
    {
        return None;
    }

    let radii = CornerRadii::from_array([ul, ur, lr, ll]);
    if radii.is_zero() {
        return Some(Geometry::Rect(bounds));
    }
    let is_half = |r: &Vec2| (r.x - w / 2.0).abs() <= tol && (r.y - h / 2.0).abs() <= tol;
    if radii.as_array().iter().all(is_half) {
        return Some(Geometry::Oval(bounds));
    }
    Some(Geometry::RRect {
        rect: bounds,
        radii,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/canon.rs"]
mod tests;
