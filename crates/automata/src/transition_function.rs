use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::AutomatonError;
use crate::State;
use crate::Transition;

/// The destination set returned for undefined (state, symbol) pairs.
static NO_DESTINATIONS: BTreeSet<State> = BTreeSet::new();

/// An index over a set of transitions that maps (origin, symbol) to the set of
/// destination states.
///
/// Transitions sharing the same origin and symbol have their destinations
/// unioned. The index is immutable after construction.
#[derive(Clone, Debug)]
pub struct TransitionFunction {
    transitions: FxHashMap<State, FxHashMap<String, BTreeSet<State>>>,
}

impl TransitionFunction {
    /// Builds the transition function, fails when there are no transitions.
    pub fn new<'a, I>(transitions: I) -> Result<TransitionFunction, AutomatonError>
    where
        I: IntoIterator<Item = &'a Transition>,
    {
        let mut function: FxHashMap<State, FxHashMap<String, BTreeSet<State>>> = FxHashMap::default();

        for transition in transitions {
            function
                .entry(transition.origin().clone())
                .or_default()
                .entry(transition.symbol().to_string())
                .or_default()
                .extend(transition.destinations().iter().cloned());
        }

        if function.is_empty() {
            return Err(AutomatonError::EmptyTransitionSet);
        }

        Ok(TransitionFunction { transitions: function })
    }

    /// Returns the states reachable from origin by reading the given symbol.
    ///
    /// An undefined transition yields the empty set, only an empty symbol is an error.
    pub fn where_to_go_with(&self, origin: &State, symbol: &str) -> Result<&BTreeSet<State>, AutomatonError> {
        if symbol.is_empty() {
            return Err(AutomatonError::EmptySymbol);
        }

        Ok(self.destinations(origin, symbol))
    }

    /// Same as [TransitionFunction::where_to_go_with] for symbols that are known to be non-empty.
    pub(crate) fn destinations(&self, origin: &State, symbol: &str) -> &BTreeSet<State> {
        self.transitions
            .get(origin)
            .and_then(|symbols| symbols.get(symbol))
            .unwrap_or(&NO_DESTINATIONS)
    }
}
