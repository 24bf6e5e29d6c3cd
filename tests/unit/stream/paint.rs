use serde_json::json;

use super::*;

#[test]
fn empty_paint_is_default_with_provenance() {
    let p = compile_paint(&json!({}), 7).expect("paint");
    assert_eq!(p, Paint::default_for(7));
}

#[test]
fn color_is_normalized_argb() {
    let p = compile_paint(&json!({"color": [255, 255, 0, 51]}), 0).expect("paint");
    assert_eq!(p.fill, Fill::from_argb8(255.0, 255.0, 0.0, 51.0));
    assert!(p.fill.is_opaque());
    let p = compile_paint(&json!({"color": [128, 0, 0, 0]}), 0).expect("paint");
    assert!(!p.fill.is_opaque());
}

#[test]
fn harmless_keys_are_accepted() {
    let p = compile_paint(
        &json!({
            "antiAlias": true,
            "dither": true,
            "strokeWidth": 2,
            "cap": "round",
            "strokeJoin": "miter",
            "strokeMiter": 4,
            "style": "stroke"
        }),
        1,
    )
    .expect("paint");
    assert_eq!(p.style, Style::Stroke);
}

#[test]
fn blend_mode_by_name() {
    let p = compile_paint(&json!({"blendMode": "DstIn"}), 0).expect("paint");
    assert_eq!(p.blend_mode, BlendMode::DstIn);
    let err = compile_paint(&json!({"blendMode": "Sparkle"}), 3).unwrap_err();
    assert!(matches!(
        err,
        LskiaError::UnsupportedAttribute { index: 3, ref attribute, .. } if attribute == "paint.blendMode"
    ));
}

#[test]
fn unknown_paint_key_fails_closed() {
    let err = compile_paint(&json!({"maskFilter": {}}), 5).unwrap_err();
    assert!(matches!(
        err,
        LskiaError::UnsupportedAttribute { index: 5, ref attribute, .. } if attribute == "paint.maskFilter"
    ));
}

#[test]
fn gradient_shaders_replace_color() {
    let linear = json!({
        "color": [255, 1, 2, 3],
        "shader": {
            "name": "SkLocalMatrixShader",
            "values": {
                "01_SkLinearGradient": {
                    "00_uint": 0,
                    "01_colorArray": [[1.0, 1.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]]
                }
            }
        }
    });
    let p = compile_paint(&linear, 0).expect("paint");
    assert_eq!(p.fill, Fill::LinearGradient { is_opaque: true });

    let radial = json!({
        "shader": {
            "values": {
                "01_SkRadialGradient": {
                    "01_colorArray": [[1.0, 1.0, 0.0, 0.0], [0.5, 0.0, 0.0, 1.0]]
                }
            }
        }
    });
    let p = compile_paint(&radial, 0).expect("paint");
    assert_eq!(p.fill, Fill::RadialGradient { is_opaque: false });
}

#[test]
fn other_shaders_fail_closed() {
    let err = compile_paint(
        &json!({"shader": {"values": {"01_SkImageShader": {}}}}),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, LskiaError::UnsupportedAttribute { .. }));
}

#[test]
fn luma_runtime_filter() {
    let p = compile_paint(
        &json!({
            "colorfilter": {
                "name": "SkRuntimeColorFilter",
                "values": {"01_string": "half4 main(half4 c) { return sk_luma(c); }"}
            }
        }),
        0,
    )
    .expect("paint");
    assert_eq!(p.color_filter, ColorFilter::Luma);

    let err = compile_paint(
        &json!({"colorfilter": {"name": "SkModeColorFilter", "values": {}}}),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, LskiaError::UnsupportedAttribute { .. }));

    let err = compile_paint(
        &json!({"colorfilter": {"name": "SkRuntimeColorFilter", "values": {"01_string": "x"}}}),
        0,
    )
    .unwrap_err();
    assert!(matches!(err, LskiaError::UnsupportedAttribute { .. }));
}

#[test]
fn unknown_style_fails_closed() {
    let err = compile_paint(&json!({"style": "hairline"}), 0).unwrap_err();
    assert!(matches!(
        err,
        LskiaError::UnsupportedAttribute { ref attribute, .. } if attribute == "paint.style"
    ));
}
