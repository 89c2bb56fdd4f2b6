//!
//! Reading and writing finite automata in the XML based JFLAP (.jff) format.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod io_jff;
mod line_iterator;

pub use io_jff::*;
