//! Command dispatch: single-shot execution and output routing

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::protocol::{self, SchemeResolver};
use crate::repl;
use crate::resolver::Resolver;

/// Dispatch to single-shot or interactive mode.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    protocol::init(&settings);

    match &cli.uri {
        Some(uri) => run_once(&SchemeResolver, uri, cli.output.as_deref(), cli.verbose),
        None => repl::run(
            Arc::new(SchemeResolver),
            &settings.warmup,
            cli.output.as_deref(),
            io::stdin().lock(),
        ),
    }
}

/// Resolve one URI and route the record to the sink.
///
/// The output file is opened before the lookup; a bad path aborts the run
/// before any resolution is attempted.
#[instrument(skip(resolver))]
pub fn run_once(
    resolver: &dyn Resolver,
    uri: &str,
    output: Option<&Path>,
    verbose: bool,
) -> CliResult<()> {
    if verbose {
        println!("loading...");
    }

    let mut sink = Sink::open(output)?;

    let lookup = protocol::fetch(resolver, uri);
    match lookup.outcome {
        Ok(payload) => {
            sink.write_record(&payload)?;
            sink.finish()?;

            if verbose {
                println!("{}", lookup.elapsed_line());
                println!("Done.");
            }
        }
        Err(err) => {
            debug!("resolution failed: {err}");
            eprintln!("No record available.");
        }
    }

    Ok(())
}

/// Output sink for resolved records: stdout, or a file opened up front.
pub enum Sink {
    Stdout,
    File { file: File, path: PathBuf },
}

impl Sink {
    /// Open the sink, creating/truncating the output file when one is given.
    pub fn open(path: Option<&Path>) -> CliResult<Self> {
        match path {
            None => Ok(Sink::Stdout),
            Some(path) => {
                let file = File::create(path).map_err(|source| CliError::OutputFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Sink::File {
                    file,
                    path: path.to_path_buf(),
                })
            }
        }
    }

    /// Write the record followed by a newline.
    pub fn write_record(&mut self, payload: &str) -> CliResult<()> {
        match self {
            Sink::Stdout => {
                println!("{payload}");
                Ok(())
            }
            Sink::File { file, .. } => {
                writeln!(file, "{payload}").map_err(CliError::Write)
            }
        }
    }

    /// Flush and close a file sink; stdout is left open.
    pub fn finish(self) -> CliResult<()> {
        if let Sink::File { mut file, path } = self {
            file.flush().map_err(CliError::Write)?;
            debug!("record written to {}", path.display());
        }
        Ok(())
    }
}
