use std::sync::Arc;

use crate::ir::geometry::Geometry;
use crate::stream::command::ClipOp;

/// The most recently pushed operand of an intersection chain.
///
/// `Full` has none, and neither does a `Difference`: its right operand was
/// subtracted, not intersected.
fn last_operand(clip: &Geometry) -> Option<&Geometry> {
    match clip {
        Geometry::Full | Geometry::Difference(..) => None,
        Geometry::Intersect(_, last) => Some(last.as_ref()),
        leaf => Some(leaf),
    }
}

fn replace_last_operand(clip: &Geometry, g: Geometry) -> Geometry {
    match clip {
        Geometry::Intersect(older, _) => Geometry::Intersect(Arc::clone(older), Arc::new(g)),
        _ => g,
    }
}

/// Combine the current clip with a newly pushed shape.
///
/// With `simplify`, redundant intersections are folded:
/// the same operand twice is a no-op, a rect over a rounded rect with the
/// same bounds is a no-op, and a rounded rect over a rect with the same
/// bounds replaces the rect. `Difference` always pushes.
pub(crate) fn merge_clip(current: &Geometry, g: Geometry, op: ClipOp, simplify: bool) -> Geometry {
    match op {
        ClipOp::Difference => Geometry::difference(current.clone(), g),
        ClipOp::Intersect if !simplify => Geometry::intersect(current.clone(), g),
        ClipOp::Intersect => {
            let Some(last) = last_operand(current) else {
                return Geometry::intersect(current.clone(), g);
            };
            if *last == g {
                return current.clone();
            }
            match (last, &g) {
                (Geometry::RRect { rect, .. }, Geometry::Rect(r)) if rect == r => current.clone(),
                (Geometry::Rect(r), Geometry::RRect { rect, .. }) if rect == r => {
                    replace_last_operand(current, g)
                }
                _ => Geometry::intersect(current.clone(), g),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/clip.rs"]
mod tests;
