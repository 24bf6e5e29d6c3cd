use serde_json::Value;

use crate::foundation::core::{Point, Rect, Transform};
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::geometry::CornerRadii;
use crate::ir::paint::Paint;
use crate::ir::path::PathData;
use crate::stream::paint::compile_paint;
use crate::stream::path::decode_path;
use crate::stream::value::{Site, array, ltrb, number, numbers, object, require, vec2};

/// Boolean operator of a clip command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipOp {
    /// Keep the part inside the new shape.
    Intersect,
    /// Keep the part outside the new shape.
    Difference,
}

/// A shape in the command's local coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Whole canvas (`DrawPaint`).
    Full,
    /// Rectangle.
    Rect(Rect),
    /// Rounded rectangle.
    RRect {
        /// Bounds.
        rect: Rect,
        /// Corner radii.
        radii: CornerRadii,
    },
    /// Ellipse inscribed in the bounds.
    Oval(Rect),
    /// Arbitrary outline.
    Path(PathData),
    /// Text run, bounded.
    TextBlob {
        /// Baseline origin.
        origin: Point,
        /// Bounding box.
        bounds: Rect,
    },
    /// Image destination rectangle.
    ImageRect(Rect),
}

/// A decoded, checked command record.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Push a copy of the current state.
    Save,
    /// Push a state that draws into a fresh offscreen layer.
    SaveLayer {
        /// Compositing paint, if recorded.
        paint: Option<Paint>,
        /// The record carried a `bounds` hint.
        has_bounds: bool,
    },
    /// Pop the current state.
    Restore,
    /// Post-multiply the current transform.
    Concat44(Transform),
    /// Draw a shape.
    Draw {
        /// Local-space shape.
        shape: Shape,
        /// Paint, if recorded.
        paint: Option<Paint>,
    },
    /// Narrow the clip.
    Clip {
        /// Local-space shape.
        shape: Shape,
        /// Boolean operator.
        op: ClipOp,
    },
}

const COMMON: &[&str] = &["command", "visible"];

fn allowed_fields(name: &str) -> Option<&'static [&'static str]> {
    Some(match name {
        "Save" | "Restore" => &[],
        "SaveLayer" => &["paint", "bounds"],
        "Concat44" => &["matrix"],
        "DrawPaint" => &["paint"],
        "DrawRect" | "DrawOval" | "DrawRRect" => &["coords", "paint"],
        "DrawPath" => &["path", "paint"],
        "DrawImageRect" => &["dst", "src", "image", "sampling", "constraint", "paint"],
        "DrawTextBlob" => &["x", "y", "bounds", "runs", "paint"],
        "ClipRect" | "ClipRRect" => &["coords", "op", "antiAlias"],
        "ClipPath" => &["path", "op", "antiAlias"],
        _ => return None,
    })
}

impl Command {
    /// Decode the record at position `index` of a command stream.
    ///
    /// Unknown command names and unknown fields fail closed.
    pub fn decode(v: &Value, index: usize) -> LskiaResult<Self> {
        let obj = object(v, Site::new(index, "command"))?;
        let name = require(obj, "command", index)?
            .as_str()
            .ok_or_else(|| Site::new(index, "command").invalid("must be a string"))?;
        let Some(fields) = allowed_fields(name) else {
            return Err(LskiaError::unsupported_command(index, name));
        };
        if let Some(key) = obj
            .keys()
            .find(|k| !COMMON.contains(&k.as_str()) && !fields.contains(&k.as_str()))
        {
            return Err(LskiaError::unsupported_attribute(
                index,
                key.clone(),
                format!("not a field of {name}"),
            ));
        }

        let paint = || -> LskiaResult<Option<Paint>> {
            obj.get("paint").map(|p| compile_paint(p, index)).transpose()
        };
        let field = |key: &str| require(obj, key, index);

        let cmd = match name {
            "Save" => Command::Save,
            "Restore" => Command::Restore,
            "SaveLayer" => Command::SaveLayer {
                paint: paint()?,
                has_bounds: obj.contains_key("bounds"),
            },
            "Concat44" => Command::Concat44(matrix(field("matrix")?, index)?),
            "DrawPaint" => Command::Draw {
                shape: Shape::Full,
                paint: paint()?,
            },
            "DrawRect" => Command::Draw {
                shape: Shape::Rect(ltrb(field("coords")?, Site::new(index, "coords"))?),
                paint: paint()?,
            },
            "DrawOval" => Command::Draw {
                shape: Shape::Oval(ltrb(field("coords")?, Site::new(index, "coords"))?),
                paint: paint()?,
            },
            "DrawRRect" => Command::Draw {
                shape: rrect(field("coords")?, index)?,
                paint: paint()?,
            },
            "DrawPath" => Command::Draw {
                shape: Shape::Path(decode_path(field("path")?, index)?),
                paint: paint()?,
            },
            "DrawImageRect" => Command::Draw {
                shape: Shape::ImageRect(ltrb(field("dst")?, Site::new(index, "dst"))?),
                paint: paint()?,
            },
            "DrawTextBlob" => {
                let x = number(field("x")?, Site::new(index, "x"))?;
                let y = number(field("y")?, Site::new(index, "y"))?;
                Command::Draw {
                    shape: Shape::TextBlob {
                        origin: Point::new(x, y),
                        bounds: ltrb(field("bounds")?, Site::new(index, "bounds"))?,
                    },
                    paint: paint()?,
                }
            }
            "ClipRect" => Command::Clip {
                shape: Shape::Rect(ltrb(field("coords")?, Site::new(index, "coords"))?),
                op: clip_op(field("op")?, index)?,
            },
            "ClipRRect" => Command::Clip {
                shape: rrect(field("coords")?, index)?,
                op: clip_op(field("op")?, index)?,
            },
            "ClipPath" => Command::Clip {
                shape: Shape::Path(decode_path(field("path")?, index)?),
                op: clip_op(field("op")?, index)?,
            },
            _ => return Err(LskiaError::unsupported_command(index, name)),
        };
        Ok(cmd)
    }

    /// Record name as it appears in traces.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Save => "Save",
            Command::SaveLayer { .. } => "SaveLayer",
            Command::Restore => "Restore",
            Command::Concat44(_) => "Concat44",
            Command::Draw { shape, .. } => match shape {
                Shape::Full => "DrawPaint",
                Shape::Rect(_) => "DrawRect",
                Shape::RRect { .. } => "DrawRRect",
                Shape::Oval(_) => "DrawOval",
                Shape::Path(_) => "DrawPath",
                Shape::TextBlob { .. } => "DrawTextBlob",
                Shape::ImageRect(_) => "DrawImageRect",
            },
            Command::Clip { shape, .. } => match shape {
                Shape::RRect { .. } => "ClipRRect",
                Shape::Path(_) => "ClipPath",
                _ => "ClipRect",
            },
        }
    }
}

/// `[[l,t,r,b], [ulx,uly], [urx,ury], [lrx,lry], [llx,lly]]`.
fn rrect(v: &Value, index: usize) -> LskiaResult<Shape> {
    let site = Site::new(index, "coords");
    let parts = array(v, site)?;
    if parts.len() != 5 {
        return Err(site.invalid("must be [bounds, ul, ur, lr, ll]"));
    }
    let rect = ltrb(&parts[0], site)?;
    let mut corners = [Default::default(); 4];
    for (corner, part) in corners.iter_mut().zip(&parts[1..]) {
        *corner = vec2(part, site)?;
    }
    Ok(Shape::RRect {
        rect,
        radii: CornerRadii::from_array(corners),
    })
}

/// Four rows of four, or sixteen flat numbers, row-major.
fn matrix(v: &Value, index: usize) -> LskiaResult<Transform> {
    let site = Site::new(index, "matrix");
    let rows = array(v, site)?;
    if rows.len() == 16 {
        return Ok(Transform::new(numbers::<16>(v, site)?));
    }
    if rows.len() != 4 {
        return Err(site.invalid("must be 4 rows of 4 or 16 numbers"));
    }
    let mut out = [[0.0f64; 4]; 4];
    for (row, v) in out.iter_mut().zip(rows) {
        *row = numbers::<4>(v, site)?;
    }
    Ok(Transform::from_rows(out))
}

fn clip_op(v: &Value, index: usize) -> LskiaResult<ClipOp> {
    match v.as_str() {
        Some("intersect") => Ok(ClipOp::Intersect),
        Some("difference") => Ok(ClipOp::Difference),
        _ => Err(LskiaError::unsupported_attribute(
            index,
            "op",
            format!("unsupported clip op {v}"),
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/command.rs"]
mod tests;
