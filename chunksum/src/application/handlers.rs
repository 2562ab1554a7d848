use std::io::{self, Write};

use chunksum_core::error::Result;
use chunksum_core::{
    Algorithm, FailurePolicy, JsonSink, LineSink, RunOptions, RunStats, drain_into, plan_inputs,
    run,
};
use tracing_subscriber::EnvFilter;

use crate::presentation::cli::{Cli, OutputFormat};

/// stderr logging; `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn handle_list_algorithms() -> Result<()> {
    let mut out = io::stdout().lock();
    for algo in Algorithm::ALL {
        writeln!(out, "{:<12} {} bits", algo.name(), algo.digest_len() * 8)?;
    }
    Ok(())
}

pub fn handle_hash(cli: Cli) -> Result<()> {
    let options = RunOptions {
        algorithm: cli.algorithm,
        chunk_size: cli.chunksize,
        concurrency: cli.threads,
        buffer_size: cli.buffer_size,
        on_failure: if cli.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::Drain
        },
    };
    options.validate()?;

    // every input is sized before the first line is printed
    let entries = plan_inputs(&cli.inputs, options.chunk_size)?;
    let stream = run(entries, &options)?;

    let out = io::stdout().lock();
    let mut stats = RunStats::default();
    let outcome = match cli.format {
        OutputFormat::Line => drain_into(stream, &mut LineSink::new(out), &mut stats),
        OutputFormat::Json => drain_into(stream, &mut JsonSink::new(out), &mut stats),
    };
    // partial progress is reported for failed runs too
    if cli.stats {
        eprintln!("{}", stats.summary());
    }
    outcome
}
