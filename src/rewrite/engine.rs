use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::foundation::error::{LskiaError, LskiaResult};
use crate::ir::layer::Layer;
use crate::sexp::parser::parse_layer;
use crate::sexp::write::to_program;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Options for [`RewriteEngine`].
#[derive(Clone, Debug)]
pub struct RewriteEngineOpts {
    /// Engine executable.
    pub program: PathBuf,
    /// Arguments placed before the rule files (e.g. a runner's own flags).
    pub args: Vec<OsString>,
    /// Rule file passed before the expression file.
    pub prelude: Option<PathBuf>,
    /// Extraction file passed after the expression file.
    pub extraction: Option<PathBuf>,
    /// Name bound to the expression in the `(let name expr)` program.
    pub binding: String,
    /// Kill the engine after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Directory for the expression file. Defaults to the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

impl RewriteEngineOpts {
    /// Options that run `program` with no rule files and a 60s timeout.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            prelude: None,
            extraction: None,
            binding: "test".to_owned(),
            timeout: Some(Duration::from_secs(60)),
            scratch_dir: None,
        }
    }

    /// Return options with leading arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Return options with a prelude rule file.
    pub fn with_prelude(mut self, prelude: impl Into<PathBuf>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Return options with an extraction file.
    pub fn with_extraction(mut self, extraction: impl Into<PathBuf>) -> Self {
        self.extraction = Some(extraction.into());
        self
    }

    /// Return options with a different timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return options with a scratch directory for expression files.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }
}

/// Runs an external equality-saturation engine over serialized layers.
///
/// The engine is invoked as `program [args..] [prelude] <file> [extraction]`
/// and must print the rewritten expression on stdout. A non-zero exit
/// surfaces its stderr unchanged.
#[derive(Clone, Debug)]
pub struct RewriteEngine {
    opts: RewriteEngineOpts,
}

impl RewriteEngine {
    /// Create a runner.
    pub fn new(opts: RewriteEngineOpts) -> Self {
        Self { opts }
    }

    /// The runner's options.
    pub fn opts(&self) -> &RewriteEngineOpts {
        &self.opts
    }

    /// Serialize `layer`, rewrite it, and parse the engine's answer.
    pub fn optimize(&self, layer: &Layer) -> LskiaResult<Layer> {
        let program = to_program(&self.opts.binding, layer);
        let rewritten = self.rewrite(&program)?;
        parse_layer(&rewritten)
    }

    /// Run the engine on program text and return its stdout.
    #[tracing::instrument(skip_all, fields(program = %self.opts.program.display(), bytes = text.len()))]
    pub fn rewrite(&self, text: &str) -> LskiaResult<String> {
        let scratch = self.write_scratch(text)?;

        let mut cmd = Command::new(&self.opts.program);
        cmd.args(&self.opts.args);
        if let Some(prelude) = &self.opts.prelude {
            cmd.arg(prelude);
        }
        cmd.arg(scratch.path());
        if let Some(extraction) = &self.opts.extraction {
            cmd.arg(extraction);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            LskiaError::rewrite_engine(format!(
                "failed to spawn '{}': {e}",
                self.opts.program.display()
            ))
        })?;
        let stdout = drain(child.stdout.take(), "stdout")?;
        let stderr = drain(child.stderr.take(), "stderr")?;

        // On timeout the drain threads are left to finish on their own: a
        // grandchild may still hold the pipes open.
        let status = wait_with_deadline(&mut child, self.opts.timeout)?;
        let stdout = join_drain(stdout, "stdout")?;
        let stderr = join_drain(stderr, "stderr")?;
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, %status, "engine finished");

        if !status.success() {
            return Err(LskiaError::rewrite_engine(format!(
                "engine exited with {status}\n{}",
                String::from_utf8_lossy(&stderr)
            )));
        }
        String::from_utf8(stdout)
            .map_err(|e| LskiaError::rewrite_engine(format!("engine output is not UTF-8: {e}")))
    }

    fn write_scratch(&self, text: &str) -> LskiaResult<ScratchFile> {
        let dir = self
            .opts
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create scratch directory '{}'", dir.display()))?;
        let path = dir.join(format!(
            "lskia_{}_{}.egg",
            std::process::id(),
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write expression file '{}'", path.display()))?;
        Ok(ScratchFile(path))
    }
}

/// Expression file removed when the run ends, whatever the outcome.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>, name: &str) -> LskiaResult<Drain> {
    let mut pipe = pipe
        .ok_or_else(|| LskiaError::rewrite_engine(format!("failed to open engine {name}")))?;
    Ok(std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    }))
}

fn join_drain(handle: Drain, name: &str) -> LskiaResult<Vec<u8>> {
    handle
        .join()
        .map_err(|_| LskiaError::rewrite_engine(format!("engine {name} drain thread panicked")))?
        .map_err(|e| LskiaError::rewrite_engine(format!("engine {name} read failed: {e}")))
}

fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> LskiaResult<ExitStatus> {
    let Some(timeout) = timeout else {
        return child
            .wait()
            .map_err(|e| LskiaError::rewrite_engine(format!("failed to wait for engine: {e}")));
    };
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                return Err(LskiaError::rewrite_engine(format!(
                    "failed to poll engine: {e}"
                )));
            }
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(?timeout, "engine timed out");
            return Err(LskiaError::rewrite_engine(format!(
                "engine timed out after {timeout:?}"
            )));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rewrite/engine.rs"]
mod tests;
