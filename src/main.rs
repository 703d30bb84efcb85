use std::{
    fs,
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{Context as _, bail};
use clap::Parser;
use soul::{
    config::Config,
    error::Error,
    interpreter::evaluator::core::Context,
    repl::{Repl, ReplEvent},
    run_source, toolchain, transpile_file,
};
use tracing_subscriber::EnvFilter;

/// soul is a small scripting language that can be interpreted directly or
/// transpiled to Nim.
///
/// Without a source file an interactive prompt is started.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Transpile the file to Nim instead of running it.
    #[arg(short, long)]
    compile: bool,

    /// Transpile the file and run the result with the Nim toolchain.
    #[arg(short, long)]
    run: bool,

    /// The script to run.
    source: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                                                   EnvFilter::new("warn")
                                                                               }))
                             .with_writer(std::io::stderr)
                             .init();

    let args = Args::parse();
    let config = Config::default();

    let result = match &args.source {
        Some(path) if args.compile || args.run => compile(path, args.run, &config),
        Some(path) => interpret(path, config),
        None => interactive(config),
    };

    if let Err(error) = result {
        if let Some(code) = error.downcast_ref::<Error>().and_then(Error::exit_code) {
            exit(code);
        }
        eprintln!("{error:#}");
        exit(1);
    }
}

fn interpret(path: &Path, config: Config) -> anyhow::Result<()> {
    let source = fs::read_to_string(path).with_context(|| {
                                              format!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                                                      path.display())
                                          })?;

    run_source(&source, config).with_context(|| format!("Failed to run '{}'", path.display()))?;
    Ok(())
}

fn compile(path: &Path, execute: bool, config: &Config) -> anyhow::Result<()> {
    let report =
        transpile_file(path, config.clone()).with_context(|| format!("Failed to compile '{}'", path.display()))?;
    println!("{report}");

    if execute {
        let status = toolchain::invoke(config, &report.target).with_context(|| {
                                                                   format!("Failed to start '{}'",
                                                                           config.toolchain.join(" "))
                                                               })?;
        if !status.success() {
            bail!("'{}' exited with {status}", config.toolchain.join(" "));
        }
    }

    Ok(())
}

fn interactive(config: Config) -> anyhow::Result<()> {
    let mut repl = Repl::new(Context::new(config));

    while let Some(line) = repl.read_line().context("Failed to read input")? {
        match repl.feed(&line) {
            ReplEvent::Incomplete => {},
            ReplEvent::Evaluated(value) => {
                if !value.is_none() {
                    println!("{}", value.repr());
                }
            },
            ReplEvent::Failed(error) => {
                if error.exit_code().is_some() {
                    return Err(error.into());
                }
                eprintln!("{error}");
            },
        }
    }

    if repl.is_continuing() {
        eprintln!("Unexpected end of input.");
    }
    println!();
    Ok(())
}
