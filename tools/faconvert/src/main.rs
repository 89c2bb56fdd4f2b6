use std::error::Error;
use std::io::stdout;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use log::info;

use fars_automata::subset_construction;
use fars_io::load_jff;
use fars_io::save_jff;
use fars_io::write_jff;

#[derive(Parser, Debug)]
#[command(
    name = "Maurice Laveaux",
    about = "Converts a nondeterministic finite automaton into a deterministic one"
)]
struct Cli {
    /// The nondeterministic automaton in the JFLAP format.
    #[arg(value_name = "FILE")]
    filename: String,

    /// Where the deterministic automaton is written, must end with .jff. Written to stdout when omitted.
    output: Option<String>,

    /// Print the time spent on every phase.
    #[arg(long)]
    time: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let [read_time, convert_time, write_time] = convert(&cli)?;

    if cli.time {
        eprintln!("Time read: {:.3}s", read_time.as_secs_f64());
        eprintln!("Time convert: {:.3}s", convert_time.as_secs_f64());
        eprintln!("Time write: {:.3}s", write_time.as_secs_f64());
    }

    Ok(())
}

/// Reads, converts and writes the automaton, returns the time spent on each of these phases.
fn convert(cli: &Cli) -> Result<[Duration; 3], Box<dyn Error>> {
    let start = Instant::now();
    let nfa = load_jff(&cli.filename)?;
    let read_time = start.elapsed();
    info!("Read automaton with {} states", nfa.all_states().len());

    let start = Instant::now();
    let dfa = subset_construction(&nfa)?;
    let convert_time = start.elapsed();
    info!("Converted into an automaton with {} states", dfa.all_states().len());

    let start = Instant::now();
    if let Some(output) = &cli.output {
        save_jff(output, &dfa)?;
    } else {
        let mut writer = stdout().lock();
        write_jff(&mut writer, &dfa)?;
        writer.flush()?;
    }

    Ok([read_time, convert_time, start.elapsed()])
}
