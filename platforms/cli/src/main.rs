use clap::Parser;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use turing::{
    Mode, ProgramLoader, ProgramManager, RunConfig, RunReport, StepEvent, Tracer,
    TransitionTable, TuringMachine, WriterTracer,
};

/// Runs a single-tape quintuple Turing machine until it halts.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turing -f programs/binary-increment.tm -i 1011
  turing -p palindrome -i abba --strict -v
  echo 11+111 | turing -p unary-addition")]
struct Cli {
    /// Rule file to load (`<state> <symbol> <symbol> <direction> <state>` per line)
    #[clap(short, long, conflicts_with = "program")]
    file: Option<PathBuf>,

    /// Initial tape content
    #[clap(short, long)]
    input: Option<String>,

    /// Print every step of the execution
    #[clap(short, long)]
    verbose: bool,

    /// Print every step and wait for Enter before applying it
    #[clap(short, long)]
    step: bool,

    /// Halt on `halt*` states and treat a missing rule anywhere else as an error
    #[clap(long)]
    strict: bool,

    /// Fail once this many transitions have been applied
    #[clap(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Print the final report as JSON
    #[clap(long)]
    json: bool,

    /// Run a built-in program instead of a rule file
    #[clap(short, long)]
    program: Option<String>,

    /// List the built-in programs and exit
    #[clap(long)]
    list: bool,
}

impl Cli {
    fn config(&self) -> RunConfig {
        let mode = if self.strict {
            Mode::Strict
        } else {
            Mode::Normal
        };

        RunConfig {
            mode,
            max_steps: self.max_steps,
        }
    }
}

/// Wraps a tracer and blocks on stdin after every step.
struct PausingTracer<T> {
    inner: T,
}

impl<T: Tracer> Tracer for PausingTracer<T> {
    fn on_step(&mut self, event: &StepEvent<'_>) -> io::Result<()> {
        self.inner.on_step(event)?;

        print!("Press Enter to apply...");
        io::stdout().flush()?;
        io::stdin().lock().read_line(&mut String::new())?;
        Ok(())
    }
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        list_programs();
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let interactive = atty::is(atty::Stream::Stdin);

    // Owned only when the rules come from a file.
    let loaded;
    let table: &TransitionTable = match (&cli.program, &cli.file) {
        (Some(name), _) => &ProgramManager::get_program_by_name(name)?.table,
        (None, Some(path)) => {
            loaded = ProgramLoader::load_program(path)?;
            &loaded
        }
        (None, None) => {
            let path = ask(&mut stdin, interactive, "Rule file: ")?;
            loaded = ProgramLoader::load_program(Path::new(path.trim()))?;
            &loaded
        }
    };

    let input = match &cli.input {
        Some(input) => input.clone(),
        None => ask(&mut stdin, interactive, "Input: ")?,
    };
    drop(stdin);

    let mut machine = TuringMachine::new(table, &input)?.with_config(cli.config());

    let report = if cli.step {
        let mut tracer = PausingTracer {
            inner: WriterTracer::new(io::stdout()),
        };
        machine.run_with(&mut tracer)?
    } else if cli.verbose {
        machine.run_with(&mut WriterTracer::new(io::stdout()))?
    } else {
        machine.run()?
    };

    print_report(&report, cli.json)
}

/// Reads one line for a value that was not given as a flag, prompting first on a terminal.
///
/// # Returns
///
/// * `Ok(String)` with the trailing line break removed.
/// * `Err(_)` if the reader is already exhausted.
fn ask<R: BufRead>(reader: &mut R, interactive: bool, prompt: &str) -> io::Result<String> {
    if interactive {
        print!("{}", prompt);
        io::stdout().flush()?;
    }

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("no value for '{}' on stdin", prompt.trim_end_matches([':', ' '])),
        ));
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

fn print_report(report: &RunReport, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Tape: {}", report.tape);
        println!("Last state: {}", report.state);
        println!("Last symbol: {}", report.symbol);
    }
    Ok(())
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:<18} {} (states: {}, rules: {}, sample: \"{}\")",
                info.name,
                info.description,
                info.state_count,
                info.transition_count,
                info.sample_input
            );
        }
    }
}
