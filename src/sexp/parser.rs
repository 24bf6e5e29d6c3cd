use std::sync::Arc;

use crate::foundation::core::{Point, Rect, Transform, Vec2};
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::geometry::{CornerRadii, Geometry};
use crate::ir::layer::Layer;
use crate::ir::paint::{BlendMode, ColorFilter, Fill, Paint, Style};
use crate::sexp::lexer::{Token, TokenKind, lex};

/// Parse the textual form of a layer.
///
/// Accepts a bare layer expression or a `(let name expr)` binding, with `;`
/// line comments anywhere. Any deviation from the grammar is a
/// `GrammarMismatch` carrying the byte offset of the offending token.
#[tracing::instrument(skip_all, fields(bytes = src.len()))]
pub fn parse_layer(src: &str) -> LskiaResult<Layer> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let layer = p.program()?;
    p.expect_eof()?;
    Ok(layer)
}

/// Parse the textual form of a single geometry.
pub fn parse_geometry(src: &str) -> LskiaResult<Geometry> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let g = p.geometry()?;
    p.expect_eof()?;
    Ok(g)
}

#[derive(Clone, Copy)]
enum BoolOp {
    Intersect,
    Difference,
}

/// Clip operators waiting for their left or right operand.
enum PendingOperand {
    Left(BoolOp),
    Right(BoolOp, Arc<Geometry>),
}

/// Layer constructors waiting for their first child to be parsed.
enum Pending {
    Draw,
    SaveLayerBottom,
    SaveLayerTop(Arc<Layer>),
    Clip,
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token<'a> {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn mismatch(&self, expected: &str) -> LskiaError {
        let t = self.peek();
        let found = match &t.kind {
            TokenKind::LParen => "'('".to_owned(),
            TokenKind::RParen => "')'".to_owned(),
            TokenKind::Atom(s) => format!("'{s}'"),
            TokenKind::Eof => "end of input".to_owned(),
        };
        LskiaError::grammar(t.span.start, format!("expected {expected}, found {found}"))
    }

    fn expect_lparen(&mut self) -> LskiaResult<()> {
        if self.peek().kind == TokenKind::LParen {
            self.bump();
            Ok(())
        } else {
            Err(self.mismatch("'('"))
        }
    }

    fn expect_rparen(&mut self) -> LskiaResult<()> {
        if self.peek().kind == TokenKind::RParen {
            self.bump();
            Ok(())
        } else {
            Err(self.mismatch("')'"))
        }
    }

    fn expect_eof(&self) -> LskiaResult<()> {
        if self.peek().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.mismatch("end of input"))
        }
    }

    fn atom(&mut self, expected: &str) -> LskiaResult<&'a str> {
        match self.peek().kind {
            TokenKind::Atom(s) => {
                self.bump();
                Ok(s)
            }
            _ => Err(self.mismatch(expected)),
        }
    }

    /// `(` followed by a constructor name.
    fn head(&mut self, what: &str) -> LskiaResult<(&'a str, usize)> {
        self.expect_lparen()?;
        let offset = self.peek().span.start;
        let name = self.atom(what)?;
        Ok((name, offset))
    }

    /// `(Name)` with no fields.
    fn unit(&mut self, what: &str) -> LskiaResult<(&'a str, usize)> {
        let head = self.head(what)?;
        self.expect_rparen()?;
        Ok(head)
    }

    fn number(&mut self) -> LskiaResult<f64> {
        let offset = self.peek().span.start;
        let text = self.atom("a number")?;
        text.parse::<f64>()
            .map_err(|_| LskiaError::grammar(offset, format!("'{text}' is not a number")))
    }

    fn numbers<const N: usize>(&mut self) -> LskiaResult<[f64; N]> {
        let mut out = [0.0f64; N];
        for v in &mut out {
            *v = self.number()?;
        }
        Ok(out)
    }

    /// Non-negative integer; the engine may print it as `3` or `3.0`.
    fn int(&mut self) -> LskiaResult<usize> {
        let offset = self.peek().span.start;
        let text = self.atom("an integer")?;
        if let Ok(v) = text.parse::<usize>() {
            return Ok(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= usize::MAX as f64 => Ok(v as usize),
            _ => Err(LskiaError::grammar(
                offset,
                format!("'{text}' is not a non-negative integer"),
            )),
        }
    }

    fn boolean(&mut self) -> LskiaResult<bool> {
        let offset = self.peek().span.start;
        match self.atom("a boolean")? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(LskiaError::grammar(
                offset,
                format!("'{other}' is not a boolean"),
            )),
        }
    }

    fn program(&mut self) -> LskiaResult<Layer> {
        let is_binding = self.peek().kind == TokenKind::LParen
            && self
                .tokens
                .get(self.pos + 1)
                .is_some_and(|t| t.kind == TokenKind::Atom("let"));
        if !is_binding {
            return self.layer();
        }
        self.head("'let'")?;
        self.atom("a binding name")?;
        let layer = self.layer()?;
        self.expect_rparen()?;
        Ok(layer)
    }

    /// The bottom/top spine is parsed with an explicit stack of pending
    /// constructors, so nesting depth does not grow the call stack.
    fn layer(&mut self) -> LskiaResult<Layer> {
        let mut pending: Vec<Pending> = Vec::new();
        'descend: loop {
            let (name, offset) = self.head("a layer constructor")?;
            let mut value = match name {
                "Empty" => {
                    self.expect_rparen()?;
                    Layer::Empty
                }
                "Draw" => {
                    pending.push(Pending::Draw);
                    continue 'descend;
                }
                "SaveLayer" => {
                    pending.push(Pending::SaveLayerBottom);
                    continue 'descend;
                }
                "Clip" => {
                    pending.push(Pending::Clip);
                    continue 'descend;
                }
                other => {
                    return Err(LskiaError::grammar(
                        offset,
                        format!("unknown layer constructor '{other}'"),
                    ));
                }
            };

            while let Some(next) = pending.pop() {
                value = match next {
                    Pending::Draw => {
                        let shape = self.geometry()?;
                        let paint = self.paint()?;
                        let clip = self.geometry()?;
                        let transform = self.transform()?;
                        self.expect_rparen()?;
                        Layer::draw(Arc::new(value), shape, paint, clip, transform)
                    }
                    Pending::SaveLayerBottom => {
                        pending.push(Pending::SaveLayerTop(Arc::new(value)));
                        continue 'descend;
                    }
                    Pending::SaveLayerTop(bottom) => {
                        let paint = self.paint()?;
                        self.expect_rparen()?;
                        Layer::save_layer(bottom, Arc::new(value), paint)
                    }
                    Pending::Clip => {
                        let clip = self.geometry()?;
                        let transform = self.transform()?;
                        self.expect_rparen()?;
                        Layer::clip(Arc::new(value), clip, transform)
                    }
                };
            }
            return Ok(value);
        }
    }

    /// Clip chains nest one level per clip, so `Intersect`/`Difference`
    /// operands are parsed with an explicit stack like the layer spine.
    fn geometry(&mut self) -> LskiaResult<Geometry> {
        let mut pending: Vec<PendingOperand> = Vec::new();
        'descend: loop {
            let (name, offset) = self.head("a geometry constructor")?;
            let mut value = match name {
                "Intersect" => {
                    pending.push(PendingOperand::Left(BoolOp::Intersect));
                    continue 'descend;
                }
                "Difference" => {
                    pending.push(PendingOperand::Left(BoolOp::Difference));
                    continue 'descend;
                }
                _ => self.leaf_geometry(name, offset)?,
            };

            while let Some(next) = pending.pop() {
                value = match next {
                    PendingOperand::Left(op) => {
                        pending.push(PendingOperand::Right(op, Arc::new(value)));
                        continue 'descend;
                    }
                    PendingOperand::Right(op, left) => {
                        self.expect_rparen()?;
                        match op {
                            BoolOp::Intersect => Geometry::Intersect(left, Arc::new(value)),
                            BoolOp::Difference => Geometry::Difference(left, Arc::new(value)),
                        }
                    }
                };
            }
            return Ok(value);
        }
    }

    /// A non-compound geometry whose head has been read.
    fn leaf_geometry(&mut self, name: &str, offset: usize) -> LskiaResult<Geometry> {
        let g = match name {
            "Full" => Geometry::Full,
            "Rect" => Geometry::Rect(self.rect()?),
            "Oval" => Geometry::Oval(self.rect()?),
            "ImageRect" => Geometry::ImageRect(self.rect()?),
            "RRect" => self.rrect_fields()?,
            "Path" => Geometry::Path {
                command: self.int()?,
                slot: self.int()?,
            },
            "TextBlob" => {
                let [x, y, l, t, r, b] = self.numbers::<6>()?;
                Geometry::TextBlob {
                    origin: Point::new(x, y),
                    bounds: Rect::new(l, t, r, b),
                }
            }
            other => {
                return Err(LskiaError::grammar(
                    offset,
                    format!("unknown geometry constructor '{other}'"),
                ));
            }
        };
        self.expect_rparen()?;
        Ok(g)
    }

    fn rect(&mut self) -> LskiaResult<Rect> {
        let [l, t, r, b] = self.numbers::<4>()?;
        Ok(Rect::new(l, t, r, b))
    }

    /// Eight floats (bounds, then nine-patch radii `left top right bottom`),
    /// or twelve (bounds, then `(rx, ry)` for ul, ur, lr, ll).
    fn rrect_fields(&mut self) -> LskiaResult<Geometry> {
        let mut vals = Vec::with_capacity(12);
        while vals.len() < 12 && self.peek().kind != TokenKind::RParen {
            vals.push(self.number()?);
        }
        let corners = match vals.len() {
            12 => [
                Vec2::new(vals[4], vals[5]),
                Vec2::new(vals[6], vals[7]),
                Vec2::new(vals[8], vals[9]),
                Vec2::new(vals[10], vals[11]),
            ],
            8 => CornerRadii::nine_patch(vals[4], vals[5], vals[6], vals[7]).as_array(),
            n => {
                return Err(LskiaError::grammar(
                    self.peek().span.start,
                    format!("RRect takes 8 or 12 numbers, found {n}"),
                ));
            }
        };
        Ok(Geometry::RRect {
            rect: Rect::new(vals[0], vals[1], vals[2], vals[3]),
            radii: CornerRadii::from_array(corners),
        })
    }

    fn fill(&mut self) -> LskiaResult<Fill> {
        let (name, offset) = self.head("a fill constructor")?;
        let fill = match name {
            "Color" => {
                let [a, r, g, b] = self.numbers::<4>()?;
                Fill::Color { a, r, g, b }
            }
            "LinearGradient" => Fill::LinearGradient {
                is_opaque: self.boolean()?,
            },
            "RadialGradient" => Fill::RadialGradient {
                is_opaque: self.boolean()?,
            },
            other => {
                return Err(LskiaError::grammar(
                    offset,
                    format!("unknown fill constructor '{other}'"),
                ));
            }
        };
        self.expect_rparen()?;
        Ok(fill)
    }

    fn paint(&mut self) -> LskiaResult<Paint> {
        let (name, offset) = self.head("'Paint'")?;
        if name != "Paint" {
            return Err(LskiaError::grammar(
                offset,
                format!("expected 'Paint', found '{name}'"),
            ));
        }
        let fill = self.fill()?;

        let (mode, offset) = self.unit("a blend mode")?;
        let blend_mode = BlendMode::from_name(mode).ok_or_else(|| {
            LskiaError::grammar(offset, format!("unknown blend mode '{mode}'"))
        })?;

        let (style, offset) = self.unit("a paint style")?;
        let style = match style {
            "Solid" => Style::Solid,
            "Stroke" => Style::Stroke,
            other => {
                return Err(LskiaError::grammar(
                    offset,
                    format!("unknown paint style '{other}'"),
                ));
            }
        };

        let (filter, offset) = self.unit("a color filter")?;
        let color_filter = match filter {
            "IdFilter" => ColorFilter::Identity,
            "LumaFilter" => ColorFilter::Luma,
            other => {
                return Err(LskiaError::grammar(
                    offset,
                    format!("unknown color filter '{other}'"),
                ));
            }
        };

        let provenance = self.int()?;
        self.expect_rparen()?;
        Ok(Paint {
            fill,
            blend_mode,
            style,
            color_filter,
            provenance,
        })
    }

    fn transform(&mut self) -> LskiaResult<Transform> {
        let (name, offset) = self.head("'Matrix'")?;
        if name != "Matrix" {
            return Err(LskiaError::grammar(
                offset,
                format!("expected 'Matrix', found '{name}'"),
            ));
        }
        let m = self.numbers::<16>()?;
        self.expect_rparen()?;
        Ok(Transform::new(m))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sexp/parser.rs"]
mod tests;
