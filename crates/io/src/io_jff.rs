use std::collections::BTreeSet;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use fars_automata::FiniteAutomaton;
use fars_automata::State;
use fars_automata::Transition;
use html_escape::decode_html_entities;
use html_escape::encode_double_quoted_attribute;
use html_escape::encode_text;
use log::debug;
use log::trace;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use thiserror::Error;

use crate::line_iterator::LineIterator;

/// The extension that every JFLAP file name must end with.
pub const JFF_EXTENSION: &str = ".jff";

#[derive(Error, Debug)]
pub enum IOError {
    #[error("The file name {0} does not end with the {JFF_EXTENSION} extension")]
    InvalidExtension(String),

    #[error("The file was not found at path {0}")]
    NotFound(String),

    #[error("Invalid state on line {0}: {1}")]
    InvalidState(usize, &'static str),

    #[error("Invalid transition on line {0}: {1}")]
    InvalidTransition(usize, &'static str),

    #[error("Transition on line {0} refers to undeclared state {1}")]
    UnknownState(usize, String),
}

/// The element of the file that is currently open.
enum Element {
    None,
    State {
        identifier: String,
        is_initial: bool,
        is_final: bool,
    },
    Transition {
        from: Option<String>,
        to: Option<String>,
        read: Option<String>,
    },
}

/// Loads a finite automaton in the JFLAP format from the given reader.
///
/// The relevant part of the format consists of state declarations:
///     `<state id="<id>"> [<initial/>] [<final/>] </state>`
///
/// And one element for every transition:
///     `<transition> <from><id></from> <to><id></to> <read><symbol></read> </transition>`
///
/// Every element must start on its own line, all other lines are ignored.
pub fn read_jff(reader: impl Read) -> Result<FiniteAutomaton, Box<dyn Error>> {
    let mut lines = LineIterator::new(reader);

    // Regex for <state id="<id>" ...>
    let state_regex = Regex::new(r#"^<state\b[^>]*?\bid\s*=\s*"([^"]*)""#).expect("Regex compilation should not fail");

    // Regex for <from>, <to> and <read> with their contents.
    let field_regex =
        Regex::new(r#"<(from|to|read)>\s*(.*?)\s*</(?:from|to|read)>"#).expect("Regex compilation should not fail");

    let mut states: BTreeSet<State> = BTreeSet::new();
    let mut transitions: Vec<Transition> = Vec::new();
    let mut element = Element::None;

    loop {
        lines.advance();
        let line_number = lines.line_number();
        let Some(line) = lines.get() else {
            break;
        };
        trace!("{}", line);

        if line.starts_with("<state") {
            let (_, [identifier]) = state_regex
                .captures(line)
                .ok_or(IOError::InvalidState(line_number, "expected an id attribute"))?
                .extract();

            element = Element::State {
                identifier: decode_html_entities(identifier).into_owned(),
                is_initial: false,
                is_final: false,
            };
        } else if line.starts_with("<transition") {
            element = Element::Transition {
                from: None,
                to: None,
                read: None,
            };
        }

        match &mut element {
            Element::State {
                identifier,
                is_initial,
                is_final,
            } => {
                if line.contains("<initial") {
                    *is_initial = true;
                }

                if line.contains("<final") {
                    *is_final = true;
                }

                if line.contains("</state") || is_self_closing_state(line) {
                    let state = State::builder(identifier.clone())
                        .initial(*is_initial)
                        .accepting(*is_final)
                        .build()?;

                    trace!("Read state {state:?}");
                    if !states.insert(state) {
                        return Err(IOError::InvalidState(line_number, "duplicate state").into());
                    }

                    element = Element::None;
                }
            }
            Element::Transition { from, to, read } => {
                if line.contains("<read/>") {
                    return Err(IOError::InvalidTransition(line_number, "epsilon transitions are not supported").into());
                }

                for captures in field_regex.captures_iter(line) {
                    let (_, [field, content]) = captures.extract();
                    let content = Some(decode_html_entities(content).into_owned());

                    match field {
                        "from" => *from = content,
                        "to" => *to = content,
                        _ => *read = content,
                    }
                }

                if line.contains("</transition") {
                    let from = from.take().ok_or(IOError::InvalidTransition(line_number, "missing <from>"))?;
                    let to = to.take().ok_or(IOError::InvalidTransition(line_number, "missing <to>"))?;
                    let read = read.take().ok_or(IOError::InvalidTransition(line_number, "missing <read>"))?;

                    if read.is_empty() {
                        return Err(
                            IOError::InvalidTransition(line_number, "epsilon transitions are not supported").into(),
                        );
                    }

                    let origin = declared_state(&states, &from, line_number)?;
                    let destination = declared_state(&states, &to, line_number)?;

                    trace!("Read transition {origin} --[{read}]-> {destination}");
                    transitions.push(Transition::new(origin, read, [destination])?);
                    element = Element::None;
                }
            }
            Element::None => {}
        }
    }

    if let Some(error) = lines.error() {
        return Err(error.into());
    }

    debug!("Read {} states and {} transitions", states.len(), transitions.len());
    Ok(FiniteAutomaton::new(transitions)?)
}

/// Returns true iff the line opens a state with a self-closing tag.
fn is_self_closing_state(line: &str) -> bool {
    line.starts_with("<state") && line.split('>').next().is_some_and(|tag| tag.ends_with('/'))
}

/// Returns the declared state with the given identifier.
fn declared_state(states: &BTreeSet<State>, identifier: &str, line_number: usize) -> Result<State, Box<dyn Error>> {
    let key = State::new(identifier)?;

    states
        .get(&key)
        .cloned()
        .ok_or_else(|| IOError::UnknownState(line_number, identifier.to_string()).into())
}

/// Loads a finite automaton in the JFLAP format from the file at the given path.
pub fn load_jff(path: impl AsRef<Path>) -> Result<FiniteAutomaton, Box<dyn Error>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IOError::NotFound(path.to_string_lossy().into_owned()).into());
    }

    debug!("Loading automaton {}", path.to_string_lossy());
    read_jff(File::open(path)?)
}

/// Writes the given automaton in the JFLAP format.
///
/// Every state is written with zero coordinates, and every (state, symbol,
/// destination) triple of the transition function as a separate transition.
pub fn write_jff(writer: &mut impl Write, automaton: &FiniteAutomaton) -> Result<(), Box<dyn Error>> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(writer, "<structure>")?;
    writeln!(writer, "\t<type>fa</type>")?;

    for state in automaton.all_states() {
        writeln!(
            writer,
            "\t<state id=\"{}\">",
            encode_double_quoted_attribute(state.identifier())
        )?;
        writeln!(writer, "\t\t<x>0.00</x>")?;
        writeln!(writer, "\t\t<y>0.00</y>")?;

        if state.is_initial() {
            writeln!(writer, "\t\t<initial/>")?;
        }

        if state.is_final() {
            writeln!(writer, "\t\t<final/>")?;
        }

        writeln!(writer, "\t</state>")?;
    }

    let transition_function = automaton.transition_function();
    for state in automaton.all_states() {
        for symbol in automaton.alphabet() {
            for destination in transition_function.where_to_go_with(state, symbol)? {
                writeln!(writer, "\t<transition>")?;
                writeln!(writer, "\t\t<from>{}</from>", encode_text(state.identifier()))?;
                writeln!(writer, "\t\t<to>{}</to>", encode_text(destination.identifier()))?;
                writeln!(writer, "\t\t<read>{}</read>", encode_text(symbol))?;
                writeln!(writer, "\t</transition>")?;
            }
        }
    }

    writeln!(writer, "</structure>")?;
    Ok(())
}

/// Saves the given automaton in the JFLAP format to the file with the given
/// name, which must end with the .jff extension.
pub fn save_jff(path: impl AsRef<Path>, automaton: &FiniteAutomaton) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    if !name.ends_with(JFF_EXTENSION) {
        return Err(IOError::InvalidExtension(name.into_owned()).into());
    }

    debug!("Saving automaton to {}", name);
    let mut writer = BufWriter::new(File::create(path)?);
    write_jff(&mut writer, automaton)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use fars_automata::AutomatonError;
    use indoc::indoc;
    use test_log::test;

    use super::*;

    fn error_of(input: &str) -> String {
        read_jff(input.as_bytes()).unwrap_err().to_string()
    }

    #[test]
    fn test_reading_jff() {
        let file = include_str!("../../../models/jff/deterministic.jff");
        let automaton = read_jff(file.as_bytes()).unwrap();

        assert!(automaton.is_deterministic());
        assert_eq!(automaton.alphabet(), &BTreeSet::from(["a".to_string(), "b".to_string()]));
        assert_eq!(automaton.initial_state(), &State::new("0").unwrap());
        assert_eq!(automaton.final_states(), &BTreeSet::from([State::new("1").unwrap()]));

        let function = automaton.transition_function();
        let state = |identifier: &str| State::new(identifier).unwrap();
        let single = |identifier: &str| BTreeSet::from([State::new(identifier).unwrap()]);

        assert_eq!(function.where_to_go_with(&state("0"), "b").unwrap(), &single("1"));
        assert_eq!(function.where_to_go_with(&state("0"), "a").unwrap(), &single("0"));
        assert_eq!(function.where_to_go_with(&state("1"), "b").unwrap(), &single("2"));
        assert_eq!(function.where_to_go_with(&state("2"), "b").unwrap(), &single("1"));
    }

    #[test]
    fn test_initial_and_final_state() {
        let input = indoc! {r#"
            <structure>
                <state id="q0"><initial/><final/></state>
                <state id="q1"/>
                <transition>
                    <from>q0</from><to>q1</to><read>a</read>
                </transition>
            </structure>
        "#};

        let automaton = read_jff(input.as_bytes()).unwrap();
        assert!(automaton.initial_state().is_final());
        assert_eq!(automaton.all_states().len(), 2);
    }

    #[test]
    fn test_unknown_state() {
        let input = indoc! {r#"
            <state id="0">
                <initial/>
            </state>
            <transition>
                <from>0</from>
                <to>7</to>
                <read>a</read>
            </transition>
        "#};

        assert_eq!(error_of(input), "Transition on line 8 refers to undeclared state 7");
    }

    #[test]
    fn test_epsilon_transition() {
        let input = indoc! {r#"
            <state id="0">
                <initial/>
            </state>
            <transition>
                <from>0</from>
                <to>0</to>
                <read/>
            </transition>
        "#};

        assert_eq!(
            error_of(input),
            "Invalid transition on line 7: epsilon transitions are not supported"
        );
    }

    #[test]
    fn test_missing_field() {
        let input = indoc! {r#"
            <state id="0">
                <initial/>
            </state>
            <transition>
                <from>0</from>
                <read>a</read>
            </transition>
        "#};

        assert_eq!(error_of(input), "Invalid transition on line 7: missing <to>");
    }

    #[test]
    fn test_duplicate_state() {
        let input = indoc! {r#"
            <state id="q0">
                <initial/>
            </state>
            <state id="Q0">
                <final/>
            </state>
        "#};

        assert_eq!(error_of(input), "Invalid state on line 6: duplicate state");
    }

    #[test]
    fn test_state_without_identifier() {
        assert_eq!(error_of("<state name=\"q0\">\n"), "Invalid state on line 1: expected an id attribute");
    }

    #[test]
    fn test_without_initial_state() {
        let input = indoc! {r#"
            <state id="0">
            </state>
            <transition>
                <from>0</from>
                <to>0</to>
                <read>a</read>
            </transition>
        "#};

        let error = read_jff(input.as_bytes()).unwrap_err();
        assert_eq!(
            error.downcast_ref::<AutomatonError>(),
            Some(&AutomatonError::NoInitialState)
        );
    }

    #[test]
    fn test_without_transitions() {
        let error = read_jff("<structure>\n</structure>\n".as_bytes()).unwrap_err();
        assert_eq!(
            error.downcast_ref::<AutomatonError>(),
            Some(&AutomatonError::EmptyTransitionSet)
        );
    }

    #[test]
    fn test_writing_jff() {
        let file = include_str!("../../../models/jff/nondeterministic.jff");
        let automaton = read_jff(file.as_bytes()).unwrap();

        let mut output: Vec<u8> = Vec::new();
        write_jff(&mut output, &automaton).unwrap();
        let text = String::from_utf8(output).unwrap();

        for state in automaton.all_states() {
            assert!(text.contains(&format!("<state id=\"{}\">", state.identifier())));
        }

        assert!(text.contains("<from>3</from>"));
        assert!(text.contains("<read>b</read>"));
        assert_eq!(text.matches("<transition>").count(), 9);
        assert_eq!(text.matches("<initial/>").count(), 1);
        assert_eq!(text.matches("<final/>").count(), 2);
    }

    #[test]
    fn test_escaped_identifiers() {
        let initial = State::builder("a<b").initial(true).build().unwrap();
        let other = State::builder("\"c\" & d").accepting(true).build().unwrap();
        let automaton = FiniteAutomaton::new([Transition::new(initial, "<", [other]).unwrap()]).unwrap();

        let mut output: Vec<u8> = Vec::new();
        write_jff(&mut output, &automaton).unwrap();

        let result = read_jff(output.as_slice()).unwrap();
        assert_eq!(result.initial_state().identifier(), "a<b");
        assert!(result.alphabet().contains("<"));
        assert!(result.final_states().contains(&State::new("\"c\" & d").unwrap()));
    }

    #[test]
    fn test_save_extension() {
        let file = include_str!("../../../models/jff/deterministic.jff");
        let automaton = read_jff(file.as_bytes()).unwrap();

        let error = save_jff("automaton.txt", &automaton).unwrap_err();
        assert!(matches!(error.downcast_ref::<IOError>(), Some(IOError::InvalidExtension(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let error = load_jff("does-not-exist.jff").unwrap_err();
        assert!(matches!(error.downcast_ref::<IOError>(), Some(IOError::NotFound(_))));
    }
}
