//! External rewrite-engine invocation.

pub(crate) mod engine;
