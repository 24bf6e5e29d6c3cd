use std::sync::{Arc, OnceLock};

use crate::foundation::core::Transform;
use crate::ir::geometry::Geometry;
use crate::ir::paint::Paint;

/// A drawing surface expressed as an immutable composition tree.
///
/// Children are shared through [`Arc`]; a tree is never mutated once built.
/// Equality and drop walk the spine iteratively, so arbitrarily long draw
/// chains are safe to compare and release.
#[derive(Clone, Debug)]
pub enum Layer {
    /// Transparent surface, the base of every chain.
    Empty,
    /// `shape` painted over `bottom`, restricted to `clip`.
    Draw {
        /// Layer drawn onto.
        bottom: Arc<Layer>,
        /// Device-space shape.
        shape: Geometry,
        /// How the shape is shaded.
        paint: Paint,
        /// Accumulated device-space clip.
        clip: Geometry,
        /// Accumulated transform at the time of the draw.
        transform: Transform,
    },
    /// Offscreen `top` composited onto `bottom` with `paint`.
    SaveLayer {
        /// Layer composited onto.
        bottom: Arc<Layer>,
        /// Offscreen content.
        top: Arc<Layer>,
        /// Compositing paint.
        paint: Paint,
    },
    /// `layer` restricted to `clip`. Only produced by rewritten expressions.
    Clip {
        /// Clipped content.
        layer: Arc<Layer>,
        /// Clip region.
        clip: Geometry,
        /// Transform the clip was recorded under.
        transform: Transform,
    },
}

/// Node counts of a layer tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LayerStats {
    /// `Draw` nodes.
    pub draws: usize,
    /// `SaveLayer` nodes.
    pub save_layers: usize,
    /// `Clip` nodes.
    pub clips: usize,
    /// Deepest offscreen nesting (`SaveLayer` tops and `Clip` bodies).
    pub max_depth: usize,
}

fn shared_empty() -> Arc<Layer> {
    static EMPTY: OnceLock<Arc<Layer>> = OnceLock::new();
    Arc::clone(EMPTY.get_or_init(|| Arc::new(Layer::Empty)))
}

impl Layer {
    /// Build a [`Layer::Draw`] value.
    pub fn draw(
        bottom: Arc<Layer>,
        shape: Geometry,
        paint: Paint,
        clip: Geometry,
        transform: Transform,
    ) -> Self {
        Self::Draw {
            bottom,
            shape,
            paint,
            clip,
            transform,
        }
    }

    /// Build a [`Layer::SaveLayer`] value.
    pub fn save_layer(bottom: Arc<Layer>, top: Arc<Layer>, paint: Paint) -> Self {
        Self::SaveLayer { bottom, top, paint }
    }

    /// Build a [`Layer::Clip`] value.
    pub fn clip(layer: Arc<Layer>, clip: Geometry, transform: Transform) -> Self {
        Self::Clip {
            layer,
            clip,
            transform,
        }
    }

    /// `true` for [`Layer::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Layer::Empty)
    }

    /// Count nodes by kind and measure offscreen nesting.
    pub fn stats(&self) -> LayerStats {
        let mut stats = LayerStats::default();
        let mut stack: Vec<(&Layer, usize)> = vec![(self, 0)];
        while let Some((layer, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match layer {
                Layer::Empty => {}
                Layer::Draw { bottom, .. } => {
                    stats.draws += 1;
                    stack.push((bottom, depth));
                }
                Layer::SaveLayer { bottom, top, .. } => {
                    stats.save_layers += 1;
                    stack.push((bottom, depth));
                    stack.push((top, depth + 1));
                }
                Layer::Clip { layer, .. } => {
                    stats.clips += 1;
                    stack.push((layer, depth + 1));
                }
            }
        }
        stats
    }

    fn take_children(&mut self, out: &mut Vec<Arc<Layer>>) {
        match self {
            Layer::Empty => {}
            Layer::Draw { bottom, .. } => out.push(std::mem::replace(bottom, shared_empty())),
            Layer::SaveLayer { bottom, top, .. } => {
                out.push(std::mem::replace(bottom, shared_empty()));
                out.push(std::mem::replace(top, shared_empty()));
            }
            Layer::Clip { layer, .. } => out.push(std::mem::replace(layer, shared_empty())),
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::Empty
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        let mut pending: Vec<(&Layer, &Layer)> = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if std::ptr::eq(a, b) {
                continue;
            }
            match (a, b) {
                (Layer::Empty, Layer::Empty) => {}
                (
                    Layer::Draw {
                        bottom: b1,
                        shape: s1,
                        paint: p1,
                        clip: c1,
                        transform: t1,
                    },
                    Layer::Draw {
                        bottom: b2,
                        shape: s2,
                        paint: p2,
                        clip: c2,
                        transform: t2,
                    },
                ) => {
                    if s1 != s2 || p1 != p2 || c1 != c2 || t1 != t2 {
                        return false;
                    }
                    pending.push((b1, b2));
                }
                (
                    Layer::SaveLayer {
                        bottom: b1,
                        top: t1,
                        paint: p1,
                    },
                    Layer::SaveLayer {
                        bottom: b2,
                        top: t2,
                        paint: p2,
                    },
                ) => {
                    if p1 != p2 {
                        return false;
                    }
                    pending.push((b1, b2));
                    pending.push((t1, t2));
                }
                (
                    Layer::Clip {
                        layer: l1,
                        clip: c1,
                        transform: t1,
                    },
                    Layer::Clip {
                        layer: l2,
                        clip: c2,
                        transform: t2,
                    },
                ) => {
                    if c1 != c2 || t1 != t2 {
                        return false;
                    }
                    pending.push((l1, l2));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(child) = stack.pop() {
            // Only the last owner unlinks; shared subtrees stay alive.
            if let Ok(mut layer) = Arc::try_unwrap(child) {
                layer.take_children(&mut stack);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/layer.rs"]
mod tests;
