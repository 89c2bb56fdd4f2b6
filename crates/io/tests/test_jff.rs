use fars_automata::random_sentence;
use fars_automata::subset_construction;
use fars_io::read_jff;
use fars_io::write_jff;
use test_case::test_case;

#[test_case(include_str!("../../../models/jff/compact.jff") ; "compact.jff")]
#[test_case(include_str!("../../../models/jff/deterministic.jff") ; "deterministic.jff")]
#[test_case(include_str!("../../../models/jff/nondeterministic.jff") ; "nondeterministic.jff")]
fn test_write_and_read(input: &str) {
    let _ = env_logger::builder().is_test(true).try_init();

    let automaton = read_jff(input.as_bytes()).unwrap();

    let mut output: Vec<u8> = Vec::new();
    write_jff(&mut output, &automaton).unwrap();
    let result = read_jff(output.as_slice()).unwrap();

    assert_eq!(automaton.alphabet(), result.alphabet());
    assert_eq!(automaton.all_states(), result.all_states());
    assert_eq!(automaton.initial_state(), result.initial_state());
    assert_eq!(automaton.final_states(), result.final_states());
    assert_eq!(automaton.is_deterministic(), result.is_deterministic());

    for state in automaton.all_states() {
        assert!(automaton.outgoing(state).eq(result.outgoing(state)));
    }
}

#[test_case(include_str!("../../../models/jff/compact.jff") ; "compact.jff")]
#[test_case(include_str!("../../../models/jff/nondeterministic.jff") ; "nondeterministic.jff")]
fn test_subset_construction(input: &str) {
    let _ = env_logger::builder().is_test(true).try_init();

    let nfa = read_jff(input.as_bytes()).unwrap();
    let dfa = subset_construction(&nfa).unwrap();

    // The converted automaton survives the file format as well.
    let mut output: Vec<u8> = Vec::new();
    write_jff(&mut output, &dfa).unwrap();
    let dfa = read_jff(output.as_slice()).unwrap();
    assert!(dfa.is_deterministic());

    for length in 1..12 {
        let sentence = random_sentence(nfa.alphabet(), length);
        assert_eq!(
            nfa.is_sentence_acceptable(&sentence).unwrap(),
            dfa.is_sentence_acceptable(&sentence).unwrap(),
            "Sentence {sentence:?} is not treated the same"
        );
    }
}
