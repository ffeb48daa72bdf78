//! # capset
//!
//! A paired-delimiter capture engine for token-stream parsers.
//!
//! Register a delimiter family with an open and a close pattern and the
//! parser produces a nested three-node group per matched pair: a container
//! node, an open marker, and a close marker, with correct nesting tracked
//! on an explicit per-family stack.
//!
//! See the [capset module](capset) for the full API.

pub mod capset;
