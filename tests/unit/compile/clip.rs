use super::*;
use crate::foundation::core::Rect;
use crate::ir::geometry::CornerRadii;

fn rect(l: f64, t: f64, r: f64, b: f64) -> Geometry {
    Geometry::Rect(Rect::new(l, t, r, b))
}

fn rrect(l: f64, t: f64, r: f64, b: f64, radius: f64) -> Geometry {
    Geometry::RRect {
        rect: Rect::new(l, t, r, b),
        radii: CornerRadii::uniform(radius),
    }
}

fn push(c: &Geometry, g: Geometry) -> Geometry {
    merge_clip(c, g, ClipOp::Intersect, true)
}

#[test]
fn first_clip_replaces_full() {
    assert_eq!(push(&Geometry::Full, rect(0.0, 0.0, 10.0, 10.0)), rect(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn same_rect_twice_is_idempotent() {
    let once = push(&Geometry::Full, rect(0.0, 0.0, 10.0, 10.0));
    let twice = push(&once, rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(once, twice);

    let chained = push(&once, rect(2.0, 2.0, 5.0, 5.0));
    assert_eq!(push(&chained, rect(2.0, 2.0, 5.0, 5.0)), chained);
}

#[test]
fn rrect_absorbs_rect_with_same_bounds() {
    let c = push(&Geometry::Full, rect(0.0, 0.0, 10.0, 10.0));
    let c = push(&c, rrect(0.0, 0.0, 10.0, 10.0, 2.0));
    assert_eq!(c, push(&Geometry::Full, rrect(0.0, 0.0, 10.0, 10.0, 2.0)));
}

#[test]
fn rect_over_rrect_with_same_bounds_is_noop() {
    let c = push(&Geometry::Full, rrect(0.0, 0.0, 10.0, 10.0, 2.0));
    assert_eq!(push(&c, rect(0.0, 0.0, 10.0, 10.0)), c);
}

#[test]
fn rrect_replaces_last_operand_only() {
    let base = rect(-5.0, -5.0, 50.0, 50.0);
    let c = push(&push(&Geometry::Full, base.clone()), rect(0.0, 0.0, 10.0, 10.0));
    let c = push(&c, rrect(0.0, 0.0, 10.0, 10.0, 1.0));
    assert_eq!(
        c,
        Geometry::Intersect(Arc::new(base), Arc::new(rrect(0.0, 0.0, 10.0, 10.0, 1.0)))
    );
}

#[test]
fn different_shapes_intersect_in_order() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(5.0, 0.0, 10.0, 10.0);
    let c = push(&push(&Geometry::Full, a.clone()), b.clone());
    assert_eq!(c, Geometry::Intersect(Arc::new(a), Arc::new(b)));
}

#[test]
fn difference_always_pushes() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let c = merge_clip(&Geometry::Full, a.clone(), ClipOp::Difference, true);
    let c2 = merge_clip(&c, a.clone(), ClipOp::Difference, true);
    assert_eq!(
        c2,
        Geometry::difference(Geometry::difference(Geometry::Full, a.clone()), a.clone())
    );
    // A difference hides the previous operand from the intersect rules.
    let c3 = push(&c, a.clone());
    assert_eq!(c3, Geometry::Intersect(Arc::new(c), Arc::new(a)));
}

#[test]
fn simplification_can_be_disabled() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let once = merge_clip(&Geometry::Full, a.clone(), ClipOp::Intersect, false);
    let twice = merge_clip(&once, a.clone(), ClipOp::Intersect, false);
    assert_eq!(twice, Geometry::Intersect(Arc::new(a.clone()), Arc::new(a)));
}
