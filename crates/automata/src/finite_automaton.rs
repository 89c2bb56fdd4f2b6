use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use log::debug;
use log::trace;

use crate::AutomatonError;
use crate::State;
use crate::Transition;
use crate::TransitionFunction;

/// The verdict of a simulation together with every state that was visited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationResult {
    /// True iff some run ends in a final state after consuming the whole sentence.
    pub accepted: bool,

    /// The states in the order in which the depth first exploration entered
    /// them, including those on branches that were rejected.
    pub visited_states: Vec<State>,
}

/// A (possibly nondeterministic) finite automaton.
///
/// The alphabet, the states and the final states are all derived from the
/// transitions that the automaton is constructed from. The automaton cannot
/// be changed after construction.
#[derive(Clone)]
pub struct FiniteAutomaton {
    alphabet: BTreeSet<String>,
    states: BTreeSet<State>,
    initial_state: State,
    final_states: BTreeSet<State>,
    transition_function: TransitionFunction,
    is_deterministic: bool,
}

impl FiniteAutomaton {
    /// Creates the automaton defined by the given transitions.
    ///
    /// Every state is identified by its identifier, when the same state occurs
    /// with different flags the flags are combined. Fails when there are no
    /// transitions or when the number of initial states is not exactly one.
    pub fn new<I>(transitions: I) -> Result<FiniteAutomaton, AutomatonError>
    where
        I: IntoIterator<Item = Transition>,
    {
        let transitions: Vec<Transition> = transitions.into_iter().collect();
        if transitions.is_empty() {
            return Err(AutomatonError::EmptyTransitionSet);
        }

        // Collect all the states, combining the flags of every occurrence.
        let mut states: BTreeSet<State> = BTreeSet::new();
        for state in transitions.iter().flat_map(Transition::states) {
            let merged = match states.take(state) {
                Some(existing) => existing.merge(state),
                None => state.clone(),
            };
            states.insert(merged);
        }

        let canonical = |state: &State| states.get(state).cloned().unwrap_or_else(|| state.clone());
        let transitions: Vec<Transition> = transitions
            .iter()
            .map(|transition| transition.map_states(canonical))
            .collect();

        let alphabet: BTreeSet<String> = transitions
            .iter()
            .map(|transition| transition.symbol().to_string())
            .collect();

        let initial_states: Vec<&State> = states.iter().filter(|state| state.is_initial()).collect();
        let initial_state = match initial_states.as_slice() {
            [] => return Err(AutomatonError::NoInitialState),
            [initial] => (*initial).clone(),
            _ => {
                return Err(AutomatonError::MultipleInitialStates(
                    initial_states.iter().map(|state| state.identifier().to_string()).collect(),
                ))
            }
        };

        let final_states: BTreeSet<State> = states.iter().filter(|state| state.is_final()).cloned().collect();
        let transition_function = TransitionFunction::new(&transitions)?;

        let is_deterministic = states.iter().all(|state| {
            alphabet
                .iter()
                .all(|symbol| transition_function.destinations(state, symbol).len() <= 1)
        });

        debug!(
            "Constructed automaton with {} states, {} symbols and {} transitions, deterministic: {}",
            states.len(),
            alphabet.len(),
            transitions.len(),
            is_deterministic
        );

        Ok(FiniteAutomaton {
            alphabet,
            states,
            initial_state,
            final_states,
            transition_function,
            is_deterministic,
        })
    }

    /// Returns the set of all symbols that occur in some transition.
    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    /// Returns the set of all states that occur in some transition.
    pub fn all_states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.final_states
    }

    pub fn transition_function(&self) -> &TransitionFunction {
        &self.transition_function
    }

    /// Returns true iff every (state, symbol) pair has at most one destination.
    pub fn is_deterministic(&self) -> bool {
        self.is_deterministic
    }

    /// Returns the defined outgoing transitions of the given state in alphabet order.
    pub fn outgoing<'a>(&'a self, state: &'a State) -> impl Iterator<Item = (&'a str, &'a BTreeSet<State>)> + 'a {
        self.alphabet.iter().filter_map(move |symbol| {
            let destinations = self.transition_function.destinations(state, symbol);
            (!destinations.is_empty()).then_some((symbol.as_str(), destinations))
        })
    }

    /// Returns true iff some run from the initial state that consumes the
    /// whole sentence ends in a final state.
    ///
    /// Symbols that are not part of the alphabet simply reject the run.
    pub fn is_sentence_acceptable<S: AsRef<str>>(&self, sentence: &[S]) -> Result<bool, AutomatonError> {
        validate_sentence(sentence)?;

        Ok(self.explore(sentence, None))
    }

    /// Same as [FiniteAutomaton::is_sentence_acceptable], but also returns the
    /// states that were visited while deciding acceptance.
    pub fn simulate<S: AsRef<str>>(&self, sentence: &[S]) -> Result<SimulationResult, AutomatonError> {
        validate_sentence(sentence)?;

        let mut visited_states = Vec::new();
        let accepted = self.explore(sentence, Some(&mut visited_states));

        Ok(SimulationResult {
            accepted,
            visited_states,
        })
    }

    /// Returns only the visited states of [FiniteAutomaton::simulate].
    pub fn run_step_by_step<S: AsRef<str>>(&self, sentence: &[S]) -> Result<Vec<State>, AutomatonError> {
        Ok(self.simulate(sentence)?.visited_states)
    }

    /// Depth first search over (state, position) frames. Runs advance
    /// iteratively while there is a single destination, at a nondeterministic
    /// step every destination is pushed as a new frame. The stack holds at most
    /// sentence length times the maximum out degree frames.
    fn explore<S: AsRef<str>>(&self, sentence: &[S], mut visited: Option<&mut Vec<State>>) -> bool {
        let mut stack: Vec<(&State, usize)> = vec![(&self.initial_state, 0)];

        while let Some((mut state, mut position)) = stack.pop() {
            loop {
                if let Some(visited) = visited.as_deref_mut() {
                    visited.push(state.clone());
                }

                if position == sentence.len() {
                    if state.is_final() {
                        trace!("Accepted in state {state}");
                        return true;
                    }

                    trace!("Rejected in state {state}");
                    break;
                }

                let symbol = sentence[position].as_ref();
                position += 1;

                let destinations = self.transition_function.destinations(state, symbol);
                trace!("{state} --[{symbol}]-> {{{}}}", destinations.iter().join(", "));

                if destinations.len() > 1 {
                    // Reversed, such that the first destination is explored first.
                    stack.extend(destinations.iter().rev().map(|destination| (destination, position)));
                    break;
                }

                match destinations.first() {
                    Some(destination) => state = destination,
                    None => break,
                }
            }
        }

        false
    }
}

/// Checks that the sentence is non-empty and contains no empty symbols.
fn validate_sentence<S: AsRef<str>>(sentence: &[S]) -> Result<(), AutomatonError> {
    if sentence.is_empty() {
        return Err(AutomatonError::EmptySentence);
    }

    if let Some(index) = sentence.iter().position(|symbol| symbol.as_ref().is_empty()) {
        return Err(AutomatonError::EmptySentenceSymbol(index));
    }

    Ok(())
}

impl fmt::Display for FiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Is deterministic: {}", self.is_deterministic)?;
        writeln!(f, "Alphabet: {}", self.alphabet.iter().join(", "))?;
        writeln!(f, "States: {}", self.states.iter().join(", "))?;
        writeln!(f, "Initial state: {}", self.initial_state)?;
        write!(f, "Final states: {}", self.final_states.iter().join(", "))
    }
}

impl fmt::Debug for FiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self)?;

        for state in &self.states {
            for (symbol, destinations) in self.outgoing(state) {
                writeln!(f, "{state} --[{symbol}]-> {{{}}}", destinations.iter().join(", "))?;
            }
        }

        Ok(())
    }
}
