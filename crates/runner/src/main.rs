use std::path::PathBuf;

use anyhow::{Context, Error, Result};
use clap::{Parser, ValueHint};
use framestack_runner::{run_fibonacci, RunnerOptions};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compute a Fibonacci number on an explicit frame stack",
    long_about = None
)]
struct Args {
    /// Fibonacci index to compute
    #[arg(default_value_t = 10, allow_negative_numbers = true)]
    n: i32,

    /// Write the binary execution trace to this file
    #[arg(long, value_hint = ValueHint::FilePath)]
    trace: Option<PathBuf>,

    /// Enable verbose output (logs to stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let options = RunnerOptions {
        record_trace: args.trace.is_some(),
        ..Default::default()
    };
    let output = run_fibonacci(args.n, options)
        .with_context(|| format!("Failed to compute Fibonacci({})", args.n))?;

    if let Some(path) = &args.trace {
        output
            .write_binary_trace(path)
            .with_context(|| format!("Error writing trace to '{}'", path.display()))?;
    }

    println!("Fibonacci({}) = {}", args.n, output.return_value);

    Ok(())
}
