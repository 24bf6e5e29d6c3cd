use serde_json::Value;

use crate::foundation::core::Point;
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::path::{FillRule, PathData, PathVerb};
use crate::stream::value::{Site, array, number, object, point, reject_unknown_keys};

const PATH_KEYS: &[&str] = &["fillType", "verbs"];

/// Decode a Skia debugger path record (`{"fillType": .., "verbs": [..]}`).
pub(crate) fn decode_path(v: &Value, index: usize) -> LskiaResult<PathData> {
    let site = Site::new(index, "path");
    let obj = object(v, site)?;
    reject_unknown_keys(obj, PATH_KEYS, index, "path")?;

    let fill_rule = match obj.get("fillType") {
        None => FillRule::Winding,
        Some(v) => fill_rule(v, index)?,
    };

    let verbs = match obj.get("verbs") {
        Some(v) => array(v, Site::new(index, "path.verbs"))?,
        None => return Err(site.invalid("is missing 'verbs'")),
    };

    let mut out = PathData::new(fill_rule);
    out.verbs.reserve(verbs.len());
    for verb in verbs {
        out.verbs.push(decode_verb(verb, index)?);
    }
    Ok(out)
}

fn fill_rule(v: &Value, index: usize) -> LskiaResult<FillRule> {
    let name = v
        .as_str()
        .ok_or_else(|| Site::new(index, "path.fillType").invalid("must be a string"))?;
    match name {
        "winding" => Ok(FillRule::Winding),
        "evenOdd" => Ok(FillRule::EvenOdd),
        "inverseWinding" => Ok(FillRule::InverseWinding),
        "inverseEvenOdd" => Ok(FillRule::InverseEvenOdd),
        other => Err(LskiaError::unsupported_attribute(
            index,
            "path.fillType",
            format!("unknown fill type '{other}'"),
        )),
    }
}

fn decode_verb(v: &Value, index: usize) -> LskiaResult<PathVerb> {
    let site = Site::new(index, "path.verbs");
    if let Some(s) = v.as_str() {
        return match s {
            "close" => Ok(PathVerb::Close),
            other => Err(LskiaError::unsupported_attribute(
                index,
                "path.verbs",
                format!("unknown verb '{other}'"),
            )),
        };
    }

    let obj = object(v, site)?;
    let mut entries = obj.iter();
    let (Some((kind, args)), None) = (entries.next(), entries.next()) else {
        return Err(site.invalid("entries must hold exactly one verb"));
    };

    match kind.as_str() {
        "move" => Ok(PathVerb::Move(point(args, site)?)),
        "line" => Ok(PathVerb::Line(point(args, site)?)),
        "quad" => {
            let pts = point_list(args, 2, site)?;
            Ok(PathVerb::Quad(pts[0], pts[1]))
        }
        "conic" => {
            let arr = array(args, site)?;
            if arr.len() != 3 {
                return Err(site.invalid("conic must be [[x,y],[x,y],w]"));
            }
            let w = number(&arr[2], site)?;
            Ok(PathVerb::Conic(point(&arr[0], site)?, point(&arr[1], site)?, w))
        }
        "cubic" => {
            let pts = point_list(args, 3, site)?;
            Ok(PathVerb::Cubic(pts[0], pts[1], pts[2]))
        }
        other => Err(LskiaError::unsupported_attribute(
            index,
            "path.verbs",
            format!("unknown verb '{other}'"),
        )),
    }
}

fn point_list(args: &Value, n: usize, site: Site<'_>) -> LskiaResult<Vec<Point>> {
    let arr = array(args, site)?;
    if arr.len() != n {
        return Err(site.invalid(&format!("verb needs {n} points, found {}", arr.len())));
    }
    arr.iter().map(|p| point(p, site)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/stream/path.rs"]
mod tests;
