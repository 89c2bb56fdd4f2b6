use std::error::Error;
use std::io::stdin;
use std::io::stdout;

use clap::Parser;

use fars_io::load_jff;

mod shell;

use shell::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "Maurice Laveaux",
    about = "An interactive tool to simulate finite automata and convert them to deterministic ones"
)]
struct Cli {
    /// An automaton in the JFLAP format that is loaded before the menu is shown.
    #[arg(value_name = "FILE")]
    filename: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let input = stdin().lock();
    let output = stdout().lock();

    let mut shell = match cli.filename {
        Some(filename) => {
            let automaton = load_jff(&filename)?;
            Shell::with_automaton(input, output, automaton)
        }
        None => Shell::new(input, output),
    };

    shell.run()?;
    Ok(())
}
