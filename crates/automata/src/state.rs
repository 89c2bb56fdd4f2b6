use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::AutomatonError;

/// A vertex of a finite automaton.
///
/// Two states are the same state iff their identifiers are equal ignoring
/// case, the initial and final flags do not take part in the comparison.
/// States are immutable, use a [StateBuilder] to set the flags.
#[derive(Clone)]
pub struct State {
    identifier: String,

    /// The case normalized identifier, used for equality, hashing and ordering.
    key: String,

    is_initial: bool,
    is_final: bool,
}

impl State {
    /// Creates a state that is neither initial nor final.
    pub fn new(identifier: impl Into<String>) -> Result<State, AutomatonError> {
        StateBuilder::new(identifier).build()
    }

    /// Returns a builder for a state with the given identifier.
    pub fn builder(identifier: impl Into<String>) -> StateBuilder {
        StateBuilder::new(identifier)
    }

    /// Returns the identifier as it was given on creation.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns the same state carrying the union of the flags of both states.
    pub(crate) fn merge(&self, other: &State) -> State {
        debug_assert_eq!(self, other, "Only occurrences of the same state can be merged");

        State {
            identifier: self.identifier.clone(),
            key: self.key.clone(),
            is_initial: self.is_initial || other.is_initial,
            is_final: self.is_final || other.is_final,
        }
    }
}

/// Constructs a fully initialised [State].
#[derive(Clone, Debug)]
pub struct StateBuilder {
    identifier: String,
    is_initial: bool,
    is_final: bool,
}

impl StateBuilder {
    pub fn new(identifier: impl Into<String>) -> StateBuilder {
        StateBuilder {
            identifier: identifier.into(),
            is_initial: false,
            is_final: false,
        }
    }

    /// Marks the state as the initial state.
    pub fn initial(mut self, is_initial: bool) -> StateBuilder {
        self.is_initial = is_initial;
        self
    }

    /// Marks the state as a final (accepting) state.
    pub fn accepting(mut self, is_final: bool) -> StateBuilder {
        self.is_final = is_final;
        self
    }

    /// Returns the state, fails when the identifier is empty.
    pub fn build(self) -> Result<State, AutomatonError> {
        if self.identifier.is_empty() {
            return Err(AutomatonError::EmptyIdentifier);
        }

        Ok(State {
            key: self.identifier.to_lowercase(),
            identifier: self.identifier,
            is_initial: self.is_initial,
            is_final: self.is_final,
        })
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if self.is_initial {
            write!(f, " (initial)")?;
        }
        if self.is_final {
            write!(f, " (final)")?;
        }

        Ok(())
    }
}
