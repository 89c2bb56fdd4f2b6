use thiserror::Error;

/// The conditions under which constructing or querying an automaton fails.
///
/// These are usage errors: retrying the same call can never succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("The state identifier cannot be empty")]
    EmptyIdentifier,

    #[error("The symbol cannot be empty")]
    EmptySymbol,

    #[error("A transition must have at least one destination")]
    EmptyDestinations,

    #[error("The transition set cannot be empty")]
    EmptyTransitionSet,

    #[error("The transition set does not have an initial state defined")]
    NoInitialState,

    #[error("The transition set has more than one initial state defined: {}", .0.join(", "))]
    MultipleInitialStates(Vec<String>),

    #[error("The sentence cannot be empty")]
    EmptySentence,

    #[error("The sentence cannot contain an empty symbol (at position {0})")]
    EmptySentenceSymbol(usize),

    #[error("The automaton to be converted must be a non deterministic automaton")]
    AlreadyDeterministic,
}
