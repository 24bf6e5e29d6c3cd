//! Command stream to layer expression compilation.

pub(crate) mod canon;
pub(crate) mod clip;
pub(crate) mod compiler;
