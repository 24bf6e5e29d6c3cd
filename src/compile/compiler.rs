use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;

use crate::compile::canon::canonicalize;
use crate::compile::clip::merge_clip;
use crate::foundation::core::Transform;
use crate::foundation::diagnostics::{DiagnosticLevel, Diagnostics};
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::geometry::Geometry;
use crate::ir::layer::Layer;
use crate::ir::paint::Paint;
use crate::ir::path::PathTable;
use crate::stream::command::Command;
use crate::stream::trace::Trace;

/// Options for [`Compiler`].
#[derive(Clone, Copy, Debug)]
pub struct CompileOpts {
    /// Fold redundant clip intersections as they are pushed. When off, every
    /// clip is pushed as a new operand, which is useful for A/B comparison.
    pub simplify_clips: bool,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            simplify_clips: true,
        }
    }
}

/// Output of compiling one command stream.
#[derive(Clone, Debug)]
pub struct Compiled {
    /// The layer expression.
    pub layer: Layer,
    /// Exact outlines referenced by `Geometry::Path` nodes in `layer`.
    pub paths: PathTable,
    /// Observations made along the way.
    pub diagnostics: Diagnostics,
}

#[derive(Clone, Debug)]
struct Frame {
    clip: Geometry,
    transform: Transform,
    layer: Arc<Layer>,
    is_save_layer: bool,
    pending_paint: Option<Paint>,
}

impl Frame {
    fn root() -> Self {
        Self {
            clip: Geometry::Full,
            transform: Transform::IDENTITY,
            layer: Arc::new(Layer::Empty),
            is_save_layer: false,
            pending_paint: None,
        }
    }
}

/// Stack-machine compiler from command streams to layer expressions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compiler {
    opts: CompileOpts,
}

impl Compiler {
    /// Create a compiler with the given options.
    pub fn new(opts: CompileOpts) -> Self {
        Self { opts }
    }

    /// Compile raw command records.
    ///
    /// Fails on the first unsupported or malformed command; no partial tree
    /// is returned.
    #[tracing::instrument(skip_all, fields(commands = commands.len()))]
    pub fn compile(&self, commands: &[Value]) -> LskiaResult<Compiled> {
        let mut machine = Machine::new(self.opts);
        for (index, record) in commands.iter().enumerate() {
            let cmd = Command::decode(record, index)?;
            tracing::trace!(index, command = cmd.name(), depth = machine.stack.len(), "step");
            machine.step(index, cmd)?;
        }
        machine.finish()
    }

    /// Compile every command of a loaded trace.
    pub fn compile_trace(&self, trace: &Trace) -> LskiaResult<Compiled> {
        self.compile(&trace.commands)
    }
}

/// Compile raw command records with default options.
pub fn compile(commands: &[Value]) -> LskiaResult<Compiled> {
    Compiler::default().compile(commands)
}

struct Machine {
    opts: CompileOpts,
    stack: SmallVec<[Frame; 8]>,
    paths: PathTable,
    diagnostics: Diagnostics,
}

impl Machine {
    fn new(opts: CompileOpts) -> Self {
        let mut stack = SmallVec::new();
        stack.push(Frame::root());
        Self {
            opts,
            stack,
            paths: PathTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn paint_or_default(&mut self, paint: Option<Paint>, index: usize) -> Paint {
        paint.unwrap_or_else(|| {
            self.diagnostics.info(index, "paint omitted, defaulted");
            Paint::default_for(index)
        })
    }

    fn step(&mut self, index: usize, cmd: Command) -> LskiaResult<()> {
        match cmd {
            Command::Save => {
                let mut frame = self.top()?.clone();
                frame.is_save_layer = false;
                frame.pending_paint = None;
                self.stack.push(frame);
            }
            Command::SaveLayer { paint, has_bounds } => {
                if has_bounds {
                    self.diagnostics.info(index, "SaveLayer bounds hint ignored");
                }
                let paint = self.paint_or_default(paint, index);
                let mut frame = self.top()?.clone();
                frame.layer = Arc::new(Layer::Empty);
                frame.is_save_layer = true;
                frame.pending_paint = Some(paint);
                self.stack.push(frame);
            }
            Command::Restore => {
                if self.stack.len() < 2 {
                    return Err(LskiaError::unbalanced(format!(
                        "Restore at command {index} has no matching Save"
                    )));
                }
                let Some(popped) = self.stack.pop() else {
                    return Err(LskiaError::unbalanced("state stack is empty"));
                };
                let top = self.top()?;
                if popped.is_save_layer {
                    let paint = popped
                        .pending_paint
                        .unwrap_or_else(|| Paint::default_for(index));
                    top.layer = Arc::new(Layer::save_layer(
                        Arc::clone(&top.layer),
                        popped.layer,
                        paint,
                    ));
                } else {
                    // Clip and transform of the outer frame are already scoped.
                    top.layer = popped.layer;
                }
            }
            Command::Concat44(m) => {
                let top = self.top()?;
                top.transform = top.transform.concat(&m);
            }
            Command::Draw { shape, paint } => {
                let paint = self.paint_or_default(paint, index);
                let transform = self.top()?.transform;
                let shape = canonicalize(&shape, &transform, index, &mut self.paths)?;
                self.check_projection(index, &shape);
                let top = self.top()?;
                top.layer = Arc::new(Layer::draw(
                    Arc::clone(&top.layer),
                    shape,
                    paint,
                    top.clip.clone(),
                    top.transform,
                ));
            }
            Command::Clip { shape, op } => {
                let simplify = self.opts.simplify_clips;
                let transform = self.top()?.transform;
                let g = canonicalize(&shape, &transform, index, &mut self.paths)?;
                self.check_projection(index, &g);
                let top = self.top()?;
                top.clip = merge_clip(&top.clip, g, op, simplify);
            }
        }
        Ok(())
    }

    /// Shapes under perspective stay exact but opaque to rewriting.
    fn check_projection(&mut self, index: usize, g: &Geometry) {
        if let Geometry::Path { command, slot } = *g
            && self
                .paths
                .get(command, slot)
                .is_some_and(|entry| entry.projection.is_some())
        {
            self.diagnostics
                .warn(index, "perspective transform, shape kept as a projected path");
        }
    }

    fn top(&mut self) -> LskiaResult<&mut Frame> {
        self.stack
            .last_mut()
            .ok_or_else(|| LskiaError::unbalanced("state stack is empty"))
    }

    fn finish(mut self) -> LskiaResult<Compiled> {
        if self.stack.len() != 1 {
            return Err(LskiaError::unbalanced(format!(
                "{} scope(s) still open at end of stream",
                self.stack.len() - 1
            )));
        }
        let Some(root) = self.stack.pop() else {
            return Err(LskiaError::unbalanced("state stack is empty"));
        };
        if !self.paths.is_empty() {
            self.diagnostics.note(
                DiagnosticLevel::Info,
                format!("{} shape(s) kept as exact paths", self.paths.len()),
            );
        }
        let layer = Arc::unwrap_or_clone(root.layer);
        let stats = layer.stats();
        tracing::debug!(
            draws = stats.draws,
            save_layers = stats.save_layers,
            max_depth = stats.max_depth,
            paths = self.paths.len(),
            "compiled"
        );
        Ok(Compiled {
            layer,
            paths: self.paths,
            diagnostics: self.diagnostics,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
