use serde_json::{Map, Value};

use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::paint::{BlendMode, ColorFilter, Fill, Paint, Style};
use crate::stream::value::{Site, array, numbers, object, reject_unknown_keys};

const PAINT_KEYS: &[&str] = &[
    "color",
    "blendMode",
    "style",
    "shader",
    "colorfilter",
    "antiAlias",
    "dither",
    "strokeWidth",
    "cap",
    "strokeJoin",
    "strokeMiter",
];

/// Compile a recorded paint. `index` becomes the paint's provenance.
///
/// Keys that change what gets drawn must be understood; anything else is an
/// `UnsupportedAttribute` error.
pub(crate) fn compile_paint(v: &Value, index: usize) -> LskiaResult<Paint> {
    let obj = object(v, Site::new(index, "paint"))?;
    reject_unknown_keys(obj, PAINT_KEYS, index, "paint")?;

    let mut paint = Paint::default_for(index);

    if let Some(c) = obj.get("color") {
        let [a, r, g, b] = numbers::<4>(c, Site::new(index, "paint.color"))?;
        paint.fill = Fill::from_argb8(a, r, g, b);
    }
    if let Some(shader) = obj.get("shader") {
        paint.fill = shader_fill(shader, index)?;
    }
    if let Some(style) = obj.get("style") {
        paint.style = match style.as_str() {
            Some("fill") => Style::Solid,
            Some("stroke") => Style::Stroke,
            _ => return Err(unsupported(index, "paint.style", style)),
        };
    }
    if let Some(filter) = obj.get("colorfilter") {
        paint.color_filter = color_filter(filter, index)?;
    }
    if let Some(mode) = obj.get("blendMode") {
        paint.blend_mode = mode
            .as_str()
            .and_then(BlendMode::from_name)
            .ok_or_else(|| unsupported(index, "paint.blendMode", mode))?;
    }

    Ok(paint)
}

fn unsupported(index: usize, attribute: &str, found: &Value) -> LskiaError {
    LskiaError::unsupported_attribute(index, attribute, format!("unsupported value {found}"))
}

/// Look up `name` directly or behind the debugger's `NN_` ordering prefix.
fn entry<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    obj.iter()
        .find(|(k, _)| {
            k.as_str() == name
                || k.split_once('_')
                    .is_some_and(|(prefix, rest)| {
                        rest == name && prefix.bytes().all(|b| b.is_ascii_digit())
                    })
        })
        .map(|(_, v)| v)
}

fn shader_fill(v: &Value, index: usize) -> LskiaResult<Fill> {
    let site = Site::new(index, "paint.shader");
    let values = object(v, site)?
        .get("values")
        .ok_or_else(|| site.invalid("is missing 'values'"))?;
    let values = object(values, site)?;

    if let Some(gradient) = entry(values, "SkLinearGradient") {
        return Ok(Fill::LinearGradient {
            is_opaque: gradient_is_opaque(gradient, index)?,
        });
    }
    if let Some(gradient) = entry(values, "SkRadialGradient") {
        return Ok(Fill::RadialGradient {
            is_opaque: gradient_is_opaque(gradient, index)?,
        });
    }
    Err(LskiaError::unsupported_attribute(
        index,
        "paint.shader",
        "only linear and radial gradients are supported",
    ))
}

fn gradient_is_opaque(v: &Value, index: usize) -> LskiaResult<bool> {
    let site = Site::new(index, "paint.shader.colorArray");
    let gradient = object(v, site)?;
    let colors = entry(gradient, "colorArray").ok_or_else(|| site.invalid("is missing"))?;
    let mut opaque = true;
    for color in array(colors, site)? {
        let [a, _, _, _] = numbers::<4>(color, site)?;
        opaque &= a == 1.0;
    }
    Ok(opaque)
}

fn color_filter(v: &Value, index: usize) -> LskiaResult<ColorFilter> {
    let site = Site::new(index, "paint.colorfilter");
    let obj = object(v, site)?;
    let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
    if name != "SkRuntimeColorFilter" {
        return Err(LskiaError::unsupported_attribute(
            index,
            "paint.colorfilter",
            format!("unsupported color filter '{name}'"),
        ));
    }
    let mentions_luma = obj
        .get("values")
        .and_then(Value::as_object)
        .is_some_and(|values| {
            values
                .values()
                .filter_map(Value::as_str)
                .any(|src| src.contains("sk_luma"))
        });
    if !mentions_luma {
        return Err(LskiaError::unsupported_attribute(
            index,
            "paint.colorfilter",
            "runtime color filter is not a luminance filter",
        ));
    }
    Ok(ColorFilter::Luma)
}

#[cfg(test)]
#[path = "../../tests/unit/stream/paint.rs"]
mod tests;
