use std::io;
use std::io::BufRead;
use std::io::Write;

use itertools::Itertools;
use log::debug;

use fars_automata::subset_construction;
use fars_automata::FiniteAutomaton;
use fars_io::load_jff;
use fars_io::save_jff;

/// The options of the menu, in the order in which they are shown.
const MENU: [&str; 5] = [
    "Exit",
    "Load automaton from a jff file",
    "Simulate loaded automaton",
    "Convert loaded automaton to a deterministic one",
    "Save converted automaton to a file",
];

/// An interactive menu over the loaded and the converted automaton, reading
/// commands from `input` and printing all results to `output`.
pub struct Shell<R: BufRead, W: Write> {
    input: R,
    output: W,
    loaded: Option<FiniteAutomaton>,
    converted: Option<FiniteAutomaton>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Shell<R, W> {
        Shell {
            input,
            output,
            loaded: None,
            converted: None,
        }
    }

    /// Starts the shell with an automaton that has already been loaded.
    pub fn with_automaton(input: R, output: W, automaton: FiniteAutomaton) -> Shell<R, W> {
        Shell {
            loaded: Some(automaton),
            ..Shell::new(input, output)
        }
    }

    /// Runs the menu until the exit option is chosen or the input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "\n---------- MENU ----------\n")?;
            for (option, description) in MENU.iter().enumerate() {
                writeln!(self.output, "[{option}] - {description}")?;
            }
            writeln!(self.output)?;

            let Some(option) = self.read_option()? else {
                return Ok(());
            };

            debug!("Selected option {option}");
            match option {
                1 => self.load()?,
                2 => self.simulate()?,
                3 => self.convert()?,
                4 => self.save()?,
                _ => return Ok(()),
            }
        }
    }

    /// Prompts until a valid option is entered, returns None at the end of the input.
    fn read_option(&mut self) -> anyhow::Result<Option<usize>> {
        loop {
            let Some(line) = self.prompt("Enter one option: ")? else {
                return Ok(None);
            };

            match line.parse::<usize>() {
                Ok(option) if option < MENU.len() => return Ok(Some(option)),
                _ => writeln!(self.output, "Invalid option. Please type again.")?,
            }
        }
    }

    /// Prints the prompt and reads a trimmed line, returns None at the end of the input.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn load(&mut self) -> anyhow::Result<()> {
        let path = self.prompt("File path: ")?.unwrap_or_default();

        match load_jff(&path) {
            Ok(automaton) => {
                writeln!(self.output, "Automaton successfully loaded.")?;
                print_automaton(&mut self.output, &automaton)?;
                self.loaded = Some(automaton);
            }
            Err(error) => writeln!(self.output, "Failed to read file. Reason: {error}")?,
        }

        Ok(())
    }

    fn simulate(&mut self) -> anyhow::Result<()> {
        if self.loaded.is_none() {
            writeln!(self.output, "There is no automaton to be simulated. Load one before.")?;
            return Ok(());
        }

        let line = self
            .prompt("Sentence (separate symbols with a space): ")?
            .unwrap_or_default();
        let sentence: Vec<&str> = line.split_whitespace().collect();

        match self.loaded.as_ref().map(|automaton| automaton.simulate(&sentence)) {
            Some(Ok(result)) => {
                writeln!(self.output, "Is sentence acceptable? {}", result.accepted)?;
                writeln!(
                    self.output,
                    "Visited states: {}",
                    result.visited_states.iter().join(", ")
                )?;
            }
            Some(Err(error)) => writeln!(self.output, "Failed to execute simulation. Reason: {error}")?,
            None => {}
        }

        Ok(())
    }

    fn convert(&mut self) -> anyhow::Result<()> {
        let Some(automaton) = &self.loaded else {
            writeln!(self.output, "There is no automaton to be converted. Load one before.")?;
            return Ok(());
        };

        match subset_construction(automaton) {
            Ok(converted) => {
                writeln!(self.output, "Automaton successfully converted.")?;
                print_automaton(&mut self.output, &converted)?;
                self.converted = Some(converted);
            }
            Err(error) => writeln!(self.output, "Failed to convert automaton. Reason: {error}")?,
        }

        Ok(())
    }

    fn save(&mut self) -> anyhow::Result<()> {
        if self.converted.is_none() {
            writeln!(
                self.output,
                "There is no converted automaton to be saved. Convert an automaton before."
            )?;
            return Ok(());
        }

        let name = self.prompt("File name: ")?.unwrap_or_default();
        match self.converted.as_ref().map(|automaton| save_jff(&name, automaton)) {
            Some(Ok(())) => writeln!(self.output, "Automaton saved successfully.")?,
            Some(Err(error)) => writeln!(self.output, "Failed to save automaton to file. Reason: {error}")?,
            None => {}
        }

        Ok(())
    }
}

/// Prints the summary of the automaton followed by all its transitions.
fn print_automaton(output: &mut impl Write, automaton: &FiniteAutomaton) -> io::Result<()> {
    writeln!(output, "Automaton information:")?;
    writeln!(output, "\tIs deterministic? {}", automaton.is_deterministic())?;
    writeln!(output, "\tAlphabet: {}", automaton.alphabet().iter().join(", "))?;
    writeln!(output, "\tStates: {}", automaton.all_states().iter().join(", "))?;
    writeln!(output, "\tInitial state: {}", automaton.initial_state())?;
    writeln!(output, "\tFinal states: {}", automaton.final_states().iter().join(", "))?;
    writeln!(output, "\tTransitions:")?;

    for state in automaton.all_states() {
        for (symbol, destinations) in automaton.outgoing(state) {
            writeln!(
                output,
                "\t\tFrom {state} with {symbol}: goes to {}",
                destinations.iter().join(", ")
            )?;
        }
    }

    Ok(())
}
