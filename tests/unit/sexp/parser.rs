use super::*;
use crate::sexp::write::{geometry_to_sexp, to_program, to_sexp};

fn sample() -> Layer {
    let bottom = Layer::draw(
        Arc::new(Layer::Empty),
        Geometry::Full,
        Paint::default_for(0),
        Geometry::Full,
        Transform::IDENTITY,
    );
    let mut paint = Paint::default_for(3);
    paint.fill = Fill::Color {
        a: 0.5,
        r: 0.1,
        g: 0.2,
        b: 1.0 / 3.0,
    };
    paint.blend_mode = BlendMode::Multiply;
    let top = Layer::draw(
        Arc::new(Layer::Empty),
        Geometry::RRect {
            rect: Rect::new(0.0, 0.0, 10.0, 20.0),
            radii: CornerRadii::from_array([
                Vec2::new(1.0, 2.0),
                Vec2::new(3.0, 4.0),
                Vec2::new(5.0, 6.0),
                Vec2::new(7.0, 8.0),
            ]),
        },
        paint,
        Geometry::Intersect(
            Arc::new(Geometry::Rect(Rect::new(-1.0, -0.0, 5.5, 1e-7))),
            Arc::new(Geometry::Path { command: 2, slot: 0 }),
        ),
        Transform::translate(3.0, 4.0),
    );
    let clipped = Layer::clip(
        Arc::new(top),
        Geometry::difference(
            Geometry::Full,
            Geometry::TextBlob {
                origin: Point::new(1.0, 2.0),
                bounds: Rect::new(0.0, -8.0, 30.0, 2.0),
            },
        ),
        Transform::scale(2.0, 2.0),
    );
    let mut layer_paint = Paint::default_for(1);
    layer_paint.fill = Fill::RadialGradient { is_opaque: true };
    layer_paint.style = Style::Stroke;
    layer_paint.color_filter = ColorFilter::Luma;
    Layer::save_layer(Arc::new(bottom), Arc::new(clipped), layer_paint)
}

#[test]
fn reads_back_what_was_written() {
    let layer = sample();
    assert_eq!(parse_layer(&to_sexp(&layer)).expect("parse"), layer);
}

#[test]
fn accepts_let_binding_and_comments() {
    let layer = sample();
    let src = format!("; optimized\n{}", to_program("test", &layer));
    assert_eq!(parse_layer(&src).expect("parse"), layer);
}

#[test]
fn accepts_engine_number_formats() {
    let src = "(Draw (Empty) (Rect 0 0 1e1 10) (Paint (Color 1 0 0 0) (SrcOver) (Solid) (IdFilter) 4.0) \
               (Full) (Matrix 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1))";
    let layer = parse_layer(src).expect("parse");
    let Layer::Draw { ref shape, ref paint, .. } = layer else {
        panic!("expected draw");
    };
    let shape = shape.clone();
    assert_eq!(shape, Geometry::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert_eq!(paint.provenance, 4);
}

#[test]
fn compact_rrect_is_nine_patch() {
    let g = parse_geometry("(RRect 0.0 0.0 10.0 10.0 2.0 3.0 4.0 5.0)").expect("parse");
    assert_eq!(
        g,
        Geometry::RRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            radii: CornerRadii::from_array([
                Vec2::new(2.0, 3.0),
                Vec2::new(4.0, 3.0),
                Vec2::new(4.0, 5.0),
                Vec2::new(2.0, 5.0),
            ]),
        }
    );
    let full = Geometry::RRect {
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
        radii: CornerRadii::uniform(2.0),
    };
    assert_eq!(parse_geometry(&geometry_to_sexp(&full)).expect("parse"), full);
}

#[test]
fn deep_clip_chain_reads_back() {
    let mut clip = Geometry::Full;
    for i in 0..50_000 {
        let x = i as f64;
        let g = Geometry::Rect(Rect::new(x, 0.0, x + 1.0, 1.0));
        clip = if i % 3 == 2 {
            Geometry::difference(clip, g)
        } else {
            Geometry::intersect(clip, g)
        };
    }
    let text = geometry_to_sexp(&clip);
    assert_eq!(parse_geometry(&text).expect("parse"), clip);

    let unclosed = &text[..text.len() - 1];
    let err = parse_geometry(unclosed).unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { .. }));
}

#[test]
fn non_finite_values_read_back() {
    let g = Geometry::Rect(Rect::new(f64::NEG_INFINITY, 0.0, f64::INFINITY, 1.0));
    assert_eq!(parse_geometry(&geometry_to_sexp(&g)).expect("parse"), g);
}

#[test]
fn wrong_rrect_arity_is_rejected() {
    let err = parse_geometry("(RRect 0 0 10 10 1 2)").unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { offset: 20, .. }));
}

#[test]
fn mismatch_reports_offending_offset() {
    let err = parse_layer("(Draw (Empty) (Square 1 2 3 4))").unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { offset: 15, .. }));

    let err = parse_layer("(Empty").unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { offset: 6, .. }));

    let err = parse_layer("(Empty) (Empty)").unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { offset: 8, .. }));

    let err = parse_geometry("(Rect 0 0 one 1)").unwrap_err();
    assert!(matches!(err, LskiaError::GrammarMismatch { offset: 10, .. }));
}

#[test]
fn unknown_blend_mode_is_rejected() {
    let src = "(Draw (Empty) (Full) (Paint (Color 1 0 0 0) (Glow) (Solid) (IdFilter) 0) \
               (Full) (Matrix 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1))";
    let err = parse_layer(src).unwrap_err();
    let LskiaError::GrammarMismatch { offset, message } = err else {
        panic!("expected grammar mismatch");
    };
    assert_eq!(&src[offset..offset + 4], "Glow");
    assert!(message.contains("blend mode"));
}

#[test]
fn negative_provenance_is_rejected() {
    let src = "(Draw (Empty) (Full) (Paint (Color 1 0 0 0) (SrcOver) (Solid) (IdFilter) -1) \
               (Full) (Matrix 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1))";
    assert!(matches!(
        parse_layer(src).unwrap_err(),
        LskiaError::GrammarMismatch { .. }
    ));
}

#[test]
fn deep_spines_parse_without_recursion() {
    let mut src = String::new();
    let depth = 50_000;
    for _ in 0..depth {
        src.push_str("(SaveLayer (Empty) ");
    }
    src.push_str("(Empty)");
    for i in 0..depth {
        src.push_str(&format!(
            " (Paint (Color 1.0 0.0 0.0 0.0) (SrcOver) (Solid) (IdFilter) {i}))"
        ));
    }
    let layer = parse_layer(&src).expect("parse");
    assert_eq!(layer.stats().save_layers, depth);
    assert_eq!(layer.stats().max_depth, depth);
}
