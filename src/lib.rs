//! lskia compiles recorded Skia command streams into a layer-expression IR.
//!
//! The pipeline is:
//!
//! - Load a [`Trace`] (the JSON command list exported by the Skia debugger)
//! - Compile it with a [`Compiler`] into a [`Layer`] tree plus a [`PathTable`]
//! - Serialize the tree with [`to_sexp`] for an external rewrite engine, and
//!   read the engine's answer back with [`parse_layer`]
//!
//! [`RewriteEngine`] wraps the last two steps around an engine executable.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod compile;
pub(crate) mod ir;
pub(crate) mod pipeline;
pub(crate) mod rewrite;
pub(crate) mod sexp;
pub(crate) mod stream;

pub use crate::foundation::core::{Affine, Point, Rect, Transform, Vec2};
pub use crate::foundation::diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use crate::foundation::error::{LskiaError, LskiaResult};

pub use crate::compile::compiler::{CompileOpts, Compiled, Compiler, compile};
pub use crate::ir::geometry::{CornerRadii, Geometry};
pub use crate::ir::layer::{Layer, LayerStats};
pub use crate::ir::paint::{BlendMode, ColorFilter, Fill, Paint, Style};
pub use crate::ir::path::{FillRule, PathData, PathEntry, PathTable, PathVerb};
pub use crate::ir::pretty::pretty_print;
pub use crate::pipeline::{BatchOpts, check_round_trip, compile_traces};
pub use crate::rewrite::engine::{RewriteEngine, RewriteEngineOpts};
pub use crate::sexp::parser::{parse_geometry, parse_layer};
pub use crate::sexp::write::{fmt_f64, geometry_to_sexp, to_program, to_sexp};
pub use crate::stream::command::{ClipOp, Command, Shape};
pub use crate::stream::trace::Trace;
