use crate::foundation::core::Transform;
use crate::ir::geometry::Geometry;
use crate::ir::layer::Layer;
use crate::ir::paint::{ColorFilter, Fill, Paint, Style};

/// Format a float so that it reads back as the same value and always looks
/// like a float (`5.0`, `-0.0`, `0.1`). Non-finite values print as `NaN`,
/// `inf` and `-inf`.
pub fn fmt_f64(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    let mut s = v.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

enum Item<'a> {
    Layer(&'a Layer),
    Geometry(&'a Geometry),
    Paint(&'a Paint),
    Transform(&'a Transform),
    Close,
}

struct Writer {
    out: String,
}

impl Writer {
    fn sep(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('(') {
            self.out.push(' ');
        }
    }

    fn open(&mut self, name: &str) {
        self.sep();
        self.out.push('(');
        self.out.push_str(name);
    }

    fn close(&mut self) {
        self.out.push(')');
    }

    fn leaf(&mut self, name: &str) {
        self.open(name);
        self.close();
    }

    fn atom(&mut self, s: &str) {
        self.sep();
        self.out.push_str(s);
    }

    fn num(&mut self, v: f64) {
        self.atom(&fmt_f64(v));
    }

    fn nums(&mut self, vs: &[f64]) {
        for v in vs {
            self.num(*v);
        }
    }

    fn fill(&mut self, fill: &Fill) {
        match *fill {
            Fill::Color { a, r, g, b } => {
                self.open("Color");
                self.nums(&[a, r, g, b]);
            }
            Fill::LinearGradient { is_opaque } => {
                self.open("LinearGradient");
                self.atom(if is_opaque { "true" } else { "false" });
            }
            Fill::RadialGradient { is_opaque } => {
                self.open("RadialGradient");
                self.atom(if is_opaque { "true" } else { "false" });
            }
        }
        self.close();
    }

    fn paint(&mut self, p: &Paint) {
        self.open("Paint");
        self.fill(&p.fill);
        self.leaf(p.blend_mode.name());
        self.leaf(match p.style {
            Style::Solid => "Solid",
            Style::Stroke => "Stroke",
        });
        self.leaf(match p.color_filter {
            ColorFilter::Identity => "IdFilter",
            ColorFilter::Luma => "LumaFilter",
        });
        self.atom(&p.provenance.to_string());
        self.close();
    }

    fn transform(&mut self, t: &Transform) {
        self.open("Matrix");
        self.nums(t.coeffs());
        self.close();
    }

    /// Walks the tree with an explicit stack; children are pushed in reverse.
    fn run<'a>(&mut self, root: Item<'a>) {
        let mut stack = vec![root];
        while let Some(item) = stack.pop() {
            match item {
                Item::Close => self.close(),
                Item::Paint(p) => self.paint(p),
                Item::Transform(t) => self.transform(t),
                Item::Layer(layer) => match layer {
                    Layer::Empty => self.leaf("Empty"),
                    Layer::Draw {
                        bottom,
                        shape,
                        paint,
                        clip,
                        transform,
                    } => {
                        self.open("Draw");
                        stack.extend([
                            Item::Close,
                            Item::Transform(transform),
                            Item::Geometry(clip),
                            Item::Paint(paint),
                            Item::Geometry(shape),
                            Item::Layer(bottom),
                        ]);
                    }
                    Layer::SaveLayer { bottom, top, paint } => {
                        self.open("SaveLayer");
                        stack.extend([
                            Item::Close,
                            Item::Paint(paint),
                            Item::Layer(top),
                            Item::Layer(bottom),
                        ]);
                    }
                    Layer::Clip {
                        layer,
                        clip,
                        transform,
                    } => {
                        self.open("Clip");
                        stack.extend([
                            Item::Close,
                            Item::Transform(transform),
                            Item::Geometry(clip),
                            Item::Layer(layer),
                        ]);
                    }
                },
                Item::Geometry(g) => match g {
                    Geometry::Full => self.leaf("Full"),
                    Geometry::Rect(r) => {
                        self.open("Rect");
                        self.nums(&[r.x0, r.y0, r.x1, r.y1]);
                        self.close();
                    }
                    Geometry::RRect { rect, radii } => {
                        self.open("RRect");
                        self.nums(&[rect.x0, rect.y0, rect.x1, rect.y1]);
                        // Nine-patch radii use the compact eight-float form.
                        match radii.as_nine_patch() {
                            Some(sides) => self.nums(&sides),
                            None => {
                                for c in radii.as_array() {
                                    self.nums(&[c.x, c.y]);
                                }
                            }
                        }
                        self.close();
                    }
                    Geometry::Oval(r) => {
                        self.open("Oval");
                        self.nums(&[r.x0, r.y0, r.x1, r.y1]);
                        self.close();
                    }
                    Geometry::Path { command, slot } => {
                        self.open("Path");
                        self.atom(&command.to_string());
                        self.atom(&slot.to_string());
                        self.close();
                    }
                    Geometry::TextBlob { origin, bounds } => {
                        self.open("TextBlob");
                        self.nums(&[
                            origin.x, origin.y, bounds.x0, bounds.y0, bounds.x1, bounds.y1,
                        ]);
                        self.close();
                    }
                    Geometry::ImageRect(r) => {
                        self.open("ImageRect");
                        self.nums(&[r.x0, r.y0, r.x1, r.y1]);
                        self.close();
                    }
                    Geometry::Intersect(a, b) => {
                        self.open("Intersect");
                        stack.extend([Item::Close, Item::Geometry(b), Item::Geometry(a)]);
                    }
                    Geometry::Difference(a, b) => {
                        self.open("Difference");
                        stack.extend([Item::Close, Item::Geometry(b), Item::Geometry(a)]);
                    }
                },
            }
        }
    }
}

/// Serialize a layer to its textual form.
///
/// The output is deterministic and distinct layers always produce distinct
/// text. Long chains are written without recursion.
pub fn to_sexp(layer: &Layer) -> String {
    let mut w = Writer { out: String::new() };
    w.run(Item::Layer(layer));
    w.out
}

/// Serialize a geometry on its own.
pub fn geometry_to_sexp(g: &Geometry) -> String {
    let mut w = Writer { out: String::new() };
    w.run(Item::Geometry(g));
    w.out
}

/// Wrap a layer as a `(let name expr)` binding for the rewrite engine.
pub fn to_program(name: &str, layer: &Layer) -> String {
    let mut w = Writer {
        out: String::with_capacity(64),
    };
    w.open("let");
    w.atom(name);
    w.run(Item::Layer(layer));
    w.close();
    w.out.push('\n');
    w.out
}

#[cfg(test)]
#[path = "../../tests/unit/sexp/write.rs"]
mod tests;
