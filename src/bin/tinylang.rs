use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tinylang::{Interpreter, LoadMode, Repl, SessionEnd, TinyLangError};

#[derive(Parser)]
#[command(author, version, about = "tiny-lang interpreter")]
struct Args {
    /// Tracing filter directive, e.g. `debug` or `tinylang::program=trace`
    #[arg(long, global = true, env = "TINYLANG_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a tiny-lang script file
    Run { script: PathBuf },
    /// Start an interactive session
    Repl,
    /// Run a snippet of tiny-lang code
    Eval { source: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log.as_deref());

    let outcome = match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(script),
        Command::Repl => run_repl(),
        Command::Eval { source } => run_source(&source),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run_script(path: PathBuf) -> Result<ExitCode, TinyLangError> {
    let source = fs::read_to_string(&path)?;
    tracing::debug!(path = %path.display(), "running script");
    run_source(&source)
}

// A compile error anywhere in the source aborts the whole load before any
// line runs.
fn run_source(source: &str) -> Result<ExitCode, TinyLangError> {
    let mut interpreter = Interpreter::new();
    interpreter.execute_source(source, LoadMode::Script)?;
    Ok(ExitCode::SUCCESS)
}

fn run_repl() -> Result<ExitCode, TinyLangError> {
    let mut repl = Repl::new();
    match repl.run()? {
        SessionEnd::Finished => Ok(ExitCode::SUCCESS),
        SessionEnd::Terminated(_) => Ok(ExitCode::FAILURE),
    }
}
