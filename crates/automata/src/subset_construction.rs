use std::collections::BTreeSet;
use std::collections::VecDeque;

use itertools::Itertools;
use log::debug;
use log::trace;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::AutomatonError;
use crate::FiniteAutomaton;
use crate::State;
use crate::Transition;

/// Converts a nondeterministic automaton into an equivalent deterministic one
/// using the powerset construction.
///
/// Only the subsets reachable from the initial state are constructed. The
/// resulting automaton consists of fresh states: the initial subset keeps the
/// identifier of the original initial state, every other subset is named
/// after its members. A composite name that is already used by a state of the
/// input is primed until it is free. Fails when the automaton is already
/// deterministic.
pub fn subset_construction(automaton: &FiniteAutomaton) -> Result<FiniteAutomaton, AutomatonError> {
    if automaton.is_deterministic() {
        return Err(AutomatonError::AlreadyDeterministic);
    }

    let transition_function = automaton.transition_function();

    // Case normalized names that cannot be given to a composite subset.
    let mut taken: FxHashSet<String> = automaton
        .all_states()
        .iter()
        .map(|state| state.identifier().to_lowercase())
        .collect();

    // Every subset that was ever discovered, mapped to its state in the result.
    let initial_subset = BTreeSet::from([automaton.initial_state().clone()]);
    let mut subset_states: FxHashMap<BTreeSet<State>, State> = FxHashMap::default();
    subset_states.insert(initial_subset.clone(), automaton.initial_state().clone());

    // Queue of subsets whose outgoing transitions have not been computed yet.
    let mut worklist: VecDeque<(BTreeSet<State>, State)> =
        VecDeque::from([(initial_subset, automaton.initial_state().clone())]);
    let mut transitions: Vec<Transition> = Vec::new();

    while let Some((subset, origin)) = worklist.pop_front() {
        for symbol in automaton.alphabet() {
            let reachable: BTreeSet<State> = subset
                .iter()
                .flat_map(|state| transition_function.destinations(state, symbol).iter().cloned())
                .collect();

            if reachable.is_empty() {
                // No transition on this symbol, the result rejects here as well.
                continue;
            }

            let destination = match subset_states.get(&reachable) {
                Some(existing) => existing.clone(),
                None => {
                    let state = subset_state(&reachable, &mut taken)?;
                    trace!("Discovered subset {state}");

                    subset_states.insert(reachable.clone(), state.clone());
                    worklist.push_back((reachable, state.clone()));
                    state
                }
            };

            transitions.push(Transition::new(origin.clone(), symbol.clone(), [destination])?);
        }
    }

    debug!(
        "Subset construction discovered {} subsets from {} states",
        subset_states.len(),
        automaton.all_states().len()
    );

    FiniteAutomaton::new(transitions)
}

/// Returns a fresh state representing the given non-empty subset, which is
/// final iff one of its members is final.
///
/// A singleton keeps the identifier of its member. A larger subset gets a name
/// that does not occur in `taken`, which is then added to it.
fn subset_state(subset: &BTreeSet<State>, taken: &mut FxHashSet<String>) -> Result<State, AutomatonError> {
    let members = subset.iter().map(State::identifier).join(", ");
    let identifier = if subset.len() > 1 {
        let mut name = format!("[{members}]");
        while taken.contains(&name.to_lowercase()) {
            name.push('\'');
        }

        taken.insert(name.to_lowercase());
        name
    } else {
        members
    };

    State::builder(identifier)
        .accepting(subset.iter().any(State::is_final))
        .build()
}
