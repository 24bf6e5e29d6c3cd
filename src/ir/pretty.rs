use std::fmt;

use crate::foundation::core::Transform;
use crate::ir::geometry::Geometry;
use crate::ir::layer::Layer;
use crate::ir::paint::{ColorFilter, Fill, Paint, Style};

enum Piece<'a> {
    Geometry(&'a Geometry),
    Operator(&'static str),
}

impl fmt::Display for Geometry {
    /// Operands are printed infix (`a ∩ b`, `a / b`) from an explicit stack.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Geometry(self)];
        while let Some(piece) = stack.pop() {
            let g = match piece {
                Piece::Operator(op) => {
                    f.write_str(op)?;
                    continue;
                }
                Piece::Geometry(g) => g,
            };
            match g {
                Geometry::Full => f.write_str("Full()")?,
                Geometry::Rect(r) => write!(f, "Rect({}, {}, {}, {})", r.x0, r.y0, r.x1, r.y1)?,
                Geometry::RRect { rect, radii } => {
                    write!(f, "RRect({}, {}, {}, {}", rect.x0, rect.y0, rect.x1, rect.y1)?;
                    for c in radii.as_array() {
                        write!(f, ", {}, {}", c.x, c.y)?;
                    }
                    f.write_str(")")?;
                }
                Geometry::Oval(r) => write!(f, "Oval({}, {}, {}, {})", r.x0, r.y0, r.x1, r.y1)?,
                Geometry::Path { command, slot } => write!(f, "Path({command}.{slot})")?,
                Geometry::TextBlob { origin, bounds } => write!(
                    f,
                    "TextBlob({}, {}, {}, {}, {}, {})",
                    origin.x, origin.y, bounds.x0, bounds.y0, bounds.x1, bounds.y1
                )?,
                Geometry::ImageRect(r) => {
                    write!(f, "ImageRect({}, {}, {}, {})", r.x0, r.y0, r.x1, r.y1)?
                }
                Geometry::Intersect(a, b) => stack.extend([
                    Piece::Geometry(b.as_ref()),
                    Piece::Operator(" ∩ "),
                    Piece::Geometry(a.as_ref()),
                ]),
                Geometry::Difference(a, b) => stack.extend([
                    Piece::Geometry(b.as_ref()),
                    Piece::Operator(" / "),
                    Piece::Geometry(a.as_ref()),
                ]),
            }
        }
        Ok(())
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Fill::Color { a, r, g, b } => write!(
                f,
                "Color({}, {}, {}, {})",
                (a * 255.0).round(),
                (r * 255.0).round(),
                (g * 255.0).round(),
                (b * 255.0).round()
            ),
            Fill::LinearGradient { .. } => f.write_str("LinearGradient"),
            Fill::RadialGradient { .. } => f.write_str("RadialGradient"),
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.style {
            Style::Solid => "Solid",
            Style::Stroke => "Stroke",
        };
        let filter = match self.color_filter {
            ColorFilter::Identity => "IdFilter",
            ColorFilter::Luma => "LumaFilter",
        };
        write!(
            f,
            "Paint({}, {}, {style}, {filter})",
            self.fill,
            self.blend_mode.name()
        )
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("Identity");
        }
        f.write_str("Mat[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

/// Render a layer as an indented listing for humans.
///
/// Each layer's bottom chain comes first at the same indent, so the listing
/// reads in painting order. The output is not meant to be parsed back.
pub fn pretty_print(layer: &Layer) -> String {
    let mut lines: Vec<(usize, String)> = Vec::new();
    listing(layer, 0, &mut lines);
    let mut out = String::new();
    for (indent, line) in lines {
        for _ in 0..indent {
            out.push_str("  ");
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn listing(layer: &Layer, indent: usize, lines: &mut Vec<(usize, String)>) {
    let mut spine = Vec::new();
    let mut cursor = layer;
    loop {
        match cursor {
            Layer::Draw { bottom, .. } | Layer::SaveLayer { bottom, .. } => {
                spine.push(cursor);
                cursor = bottom;
            }
            Layer::Empty | Layer::Clip { .. } => break,
        }
    }

    match cursor {
        Layer::Empty if spine.is_empty() => lines.push((indent, "Empty()".to_owned())),
        Layer::Clip {
            layer,
            clip,
            transform,
        } => {
            lines.push((indent, format!("Clip with {clip}:")));
            lines.push((indent + 1, format!("@ {transform}")));
            listing(layer, indent + 1, lines);
        }
        _ => {}
    }

    for node in spine.into_iter().rev() {
        match node {
            Layer::Draw {
                shape,
                paint,
                clip,
                transform,
                ..
            } => {
                lines.push((indent, format!("Draw {shape}")));
                lines.push((indent + 1, format!("with {paint}")));
                lines.push((indent + 1, format!("in {clip}")));
                lines.push((indent + 1, format!("@ {transform}")));
            }
            Layer::SaveLayer { top, paint, .. } => {
                lines.push((indent, format!("SaveLayer {paint}:")));
                listing(top, indent + 1, lines);
            }
            Layer::Empty | Layer::Clip { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/pretty.rs"]
mod tests;
