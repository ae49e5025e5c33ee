use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;

use rlox::Lox;

/// Tree-walking interpreter for the Lox language.
///
/// Run with no arguments for a REPL, or pass a single script to execute it.
#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Lox script to run. Omit to start an interactive prompt.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(64);
        }
    };
    let mut lox = Lox::new(Box::new(io::stdout()), Box::new(io::stderr()));

    match cli.script {
        Some(path) => match lox.run_file(&path) {
            Ok(code) => ExitCode::from(code as u8),
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
        None => match lox.run_prompt() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        },
    }
}
