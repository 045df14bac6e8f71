//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, ValueHint};

/// Shown below the flag list so `--help` documents what counts as a NUM URI.
const URI_HELP: &str = "\
A valid NUM URI is of the form:

  num://numexample.com:1
  num://jo.smith@numexample.com:1
  num://jo.smith@numexample.com:1/work
  num://numexample.com:1/support
  num://numexample.com:1/support/website
  num://numexample.com:1/sales

The num:// protocol prefix can be omitted and the module defaults to 0
when not specified, so `numexample.com` and `num.uk:1` are both accepted.";

/// Command line client for resolving NUM URIs
#[derive(Parser, Debug)]
#[command(name = "numcli")]
#[command(author, version, about, long_about = None)]
#[command(after_help = URI_HELP)]
pub struct Cli {
    /// NUM URI to resolve, e.g. num.uk:1 (omit for interactive mode)
    #[arg(short, long)]
    pub uri: Option<String>,

    /// Print progress and timing messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the resolved record to a file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Enable debug logging (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}
