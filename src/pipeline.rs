use rayon::prelude::*;

use crate::compile::compiler::{CompileOpts, Compiled, Compiler};
use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::layer::Layer;
use crate::sexp::parser::parse_layer;
use crate::sexp::write::to_sexp;
use crate::stream::trace::Trace;

/// Options for [`compile_traces`].
#[derive(Clone, Copy, Debug)]
pub struct BatchOpts {
    /// Compile traces on a worker pool.
    pub parallel: bool,
    /// Worker count. `None` lets rayon decide. Ignored when not parallel.
    pub threads: Option<usize>,
    /// Options passed to every compilation.
    pub compile: CompileOpts,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            compile: CompileOpts::default(),
        }
    }
}

/// Compile many traces, one result per trace in input order.
///
/// A failing trace does not affect the others. The outer error is reserved
/// for invalid options and worker pool setup.
#[tracing::instrument(skip_all, fields(traces = traces.len(), parallel = opts.parallel))]
pub fn compile_traces(
    traces: &[Trace],
    opts: &BatchOpts,
) -> LskiaResult<Vec<LskiaResult<Compiled>>> {
    let compiler = Compiler::new(opts.compile);
    let results: Vec<LskiaResult<Compiled>> = if opts.parallel && traces.len() > 1 {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            traces
                .par_iter()
                .map(|t| compiler.compile_trace(t))
                .collect()
        })
    } else {
        traces.iter().map(|t| compiler.compile_trace(t)).collect()
    };

    let mut failed = 0usize;
    let mut draws = 0usize;
    let mut max_depth = 0usize;
    for result in &results {
        match result {
            Ok(c) => {
                let stats = c.layer.stats();
                draws += stats.draws;
                max_depth = max_depth.max(stats.max_depth);
            }
            Err(e) => {
                failed += 1;
                tracing::debug!(error = %e, "trace rejected");
            }
        }
    }
    tracing::info!(
        compiled = results.len() - failed,
        failed,
        draws,
        max_depth,
        "batch finished"
    );
    Ok(results)
}

/// Check that `layer` survives serialization and parsing unchanged.
pub fn check_round_trip(layer: &Layer) -> LskiaResult<()> {
    let text = to_sexp(layer);
    let back = parse_layer(&text)?;
    if back != *layer {
        return Err(LskiaError::validation(
            "layer changed after serialize/parse round trip",
        ));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> LskiaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LskiaError::validation(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LskiaError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
