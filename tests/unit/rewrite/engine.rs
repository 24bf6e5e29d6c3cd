use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::foundation::core::{Rect, Transform};
use crate::ir::geometry::Geometry;
use crate::ir::paint::Paint;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lskia_engine_{name}_{}", std::process::id()))
}

fn write_script(dir: &Path, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("mkdir");
    let path = dir.join("engine.sh");
    std::fs::write(&path, body).expect("write script");
    path
}

fn sample_layer() -> Layer {
    Layer::draw(
        Arc::new(Layer::Empty),
        Geometry::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
        Paint::default_for(0),
        Geometry::Full,
        Transform::IDENTITY,
    )
}

#[test]
fn opts_defaults() {
    let opts = RewriteEngineOpts::new("egglog");
    assert_eq!(opts.program, PathBuf::from("egglog"));
    assert_eq!(opts.binding, "test");
    assert!(opts.prelude.is_none());
    assert!(opts.extraction.is_none());
    assert_eq!(opts.timeout, Some(Duration::from_secs(60)));
}

#[test]
fn missing_program_is_engine_error() {
    let engine = RewriteEngine::new(
        RewriteEngineOpts::new("/nonexistent/lskia-engine").with_scratch_dir(scratch("missing")),
    );
    let err = engine.rewrite("(let test (Empty))").expect_err("spawn must fail");
    assert!(matches!(err, LskiaError::RewriteEngine(ref m) if m.contains("failed to spawn")));
}

#[cfg(unix)]
#[test]
fn identity_engine_round_trips_layer() {
    let engine =
        RewriteEngine::new(RewriteEngineOpts::new("cat").with_scratch_dir(scratch("identity")));
    let layer = sample_layer();
    let out = engine.optimize(&layer).expect("optimize");
    assert_eq!(out, layer);
}

#[cfg(unix)]
#[test]
fn scratch_file_is_removed() {
    let dir = scratch("cleanup");
    let engine = RewriteEngine::new(RewriteEngineOpts::new("cat").with_scratch_dir(&dir));
    engine.rewrite("(Empty)").expect("rewrite");
    let leftovers = std::fs::read_dir(&dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".egg"))
        .count();
    assert_eq!(leftovers, 0);
}

#[cfg(unix)]
#[test]
fn failure_surfaces_stderr() {
    let dir = scratch("failure");
    let script = write_script(&dir, "echo 'rule set rejected' >&2\nexit 3\n");
    let engine = RewriteEngine::new(
        RewriteEngineOpts::new("sh")
            .with_prelude(script)
            .with_scratch_dir(&dir),
    );
    let err = engine.optimize(&sample_layer()).expect_err("engine fails");
    match err {
        LskiaError::RewriteEngine(msg) => assert!(msg.contains("rule set rejected\n"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn prelude_and_extraction_bracket_the_expression_file() {
    let dir = scratch("argv");
    let script = write_script(&dir, "echo \"$2\"\n");
    let engine = RewriteEngine::new(
        RewriteEngineOpts::new("sh")
            .with_prelude(script)
            .with_extraction("extract.egg")
            .with_scratch_dir(&dir),
    );
    let out = engine.rewrite("(Empty)").expect("rewrite");
    assert_eq!(out.trim(), "extract.egg");
}

#[cfg(unix)]
#[test]
fn slow_engine_times_out() {
    let dir = scratch("timeout");
    let script = write_script(&dir, "exec sleep 10\n");
    let engine = RewriteEngine::new(
        RewriteEngineOpts::new("sh")
            .with_prelude(script)
            .with_timeout(Some(Duration::from_millis(100)))
            .with_scratch_dir(&dir),
    );
    let err = engine.rewrite("(Empty)").expect_err("timeout");
    assert!(matches!(err, LskiaError::RewriteEngine(ref m) if m.contains("timed out")));
}
