use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use itertools::Itertools;

use crate::AutomatonError;
use crate::State;

/// A labelled edge from one origin state to one or more destination states.
///
/// More than one destination on the same symbol is what makes an automaton
/// nondeterministic. Duplicate destinations are collapsed.
#[derive(Clone)]
pub struct Transition {
    origin: State,
    symbol: String,
    destinations: BTreeSet<State>,
}

impl Transition {
    /// Creates a transition, fails when the symbol is empty or no destination is given.
    pub fn new<I>(origin: State, symbol: impl Into<String>, destinations: I) -> Result<Transition, AutomatonError>
    where
        I: IntoIterator<Item = State>,
    {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(AutomatonError::EmptySymbol);
        }

        let destinations: BTreeSet<State> = destinations.into_iter().collect();
        if destinations.is_empty() {
            return Err(AutomatonError::EmptyDestinations);
        }

        Ok(Transition {
            origin,
            symbol,
            destinations,
        })
    }

    pub fn origin(&self) -> &State {
        &self.origin
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn destinations(&self) -> &BTreeSet<State> {
        &self.destinations
    }

    /// Returns an iterator over the origin followed by all destinations.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        std::iter::once(&self.origin).chain(self.destinations.iter())
    }

    /// Replaces every state by the result of the given mapping, which must
    /// preserve the identity of the states.
    pub(crate) fn map_states<F>(&self, mut f: F) -> Transition
    where
        F: FnMut(&State) -> State,
    {
        Transition {
            origin: f(&self.origin),
            symbol: self.symbol.clone(),
            destinations: self.destinations.iter().map(f).collect(),
        }
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.symbol.to_lowercase() == other.symbol.to_lowercase()
            && self.destinations == other.destinations
    }
}

impl Eq for Transition {}

impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin.hash(state);
        self.symbol.to_lowercase().hash(state);
        self.destinations.hash(state);
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --[{}]-> {{{}}}",
            self.origin,
            self.symbol,
            self.destinations.iter().join(", ")
        )
    }
}
