//!
//! A crate containing finite automata related functionality: simulation of
//! (nondeterministic) finite automata and their conversion to deterministic
//! automata using the subset construction.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod error;
mod finite_automaton;
mod random_automaton;
mod state;
mod subset_construction;
mod transition;
mod transition_function;

pub use error::*;
pub use finite_automaton::*;
pub use random_automaton::*;
pub use state::*;
pub use subset_construction::*;
pub use transition::*;
pub use transition_function::*;
