//! Textual form of layer expressions, as exchanged with the rewrite engine.
//!
//! `write` produces the text and `parser` reads it back into the exact
//! same values.

pub(crate) mod lexer;
pub(crate) mod parser;
pub(crate) mod write;
