use std::collections::BTreeSet;

use rand::Rng;

use crate::AutomatonError;
use crate::FiniteAutomaton;
use crate::State;
use crate::Transition;

/// Generates a random automaton with the desired number of states and
/// symbols, where every state has at most `outdegree` outgoing transitions.
///
/// State q0 is the initial state and always has an outgoing transition. A
/// transition has one or two destinations, so the result is usually
/// nondeterministic.
pub fn random_automaton(
    num_of_states: usize,
    num_of_symbols: usize,
    outdegree: usize,
) -> Result<FiniteAutomaton, AutomatonError> {
    let mut rng = rand::rng();

    let states = (0..num_of_states)
        .map(|index| {
            State::builder(format!("q{index}"))
                .initial(index == 0)
                .accepting(rng.random_bool(0.3))
                .build()
        })
        .collect::<Result<Vec<State>, AutomatonError>>()?;

    let symbols: Vec<String> = (0..num_of_symbols).map(symbol_name).collect();

    let mut transitions = Vec::new();
    if symbols.is_empty() {
        return FiniteAutomaton::new(transitions);
    }

    for (index, state) in states.iter().enumerate() {
        // Ensure that the initial state has at least one outgoing transition.
        let minimum = usize::from(index == 0);

        for _ in 0..rng.random_range(minimum..=outdegree.max(minimum)) {
            let symbol = &symbols[rng.random_range(0..symbols.len())];
            let destinations: Vec<State> = (0..rng.random_range(1..=2))
                .map(|_| states[rng.random_range(0..num_of_states)].clone())
                .collect();

            transitions.push(Transition::new(state.clone(), symbol.clone(), destinations)?);
        }
    }

    FiniteAutomaton::new(transitions)
}

/// Returns a sentence of the given length consisting of random symbols from the alphabet.
pub fn random_sentence(alphabet: &BTreeSet<String>, length: usize) -> Vec<String> {
    let symbols: Vec<&String> = alphabet.iter().collect();
    if symbols.is_empty() {
        return Vec::new();
    }

    let mut rng = rand::rng();
    (0..length)
        .map(|_| symbols[rng.random_range(0..symbols.len())].clone())
        .collect()
}

/// Lower case letters for the first symbols, numbered symbols afterwards.
fn symbol_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => char::from(b'a' + offset).to_string(),
        _ => format!("s{index}"),
    }
}
