//! Command-stream decoding.
//!
//! Raw debugger JSON is turned into typed `Command`
//! values one record at a time. Decoding fails closed: a field or paint key
//! that is not understood is an error, never silently dropped.

pub(crate) mod command;
pub(crate) mod paint;
pub(crate) mod path;
pub(crate) mod trace;
pub(crate) mod value;
