//! Interactive prompt loop
//!
//! Reads URIs one line at a time until an exit keyword or end of input.
//! Resolution failures are printed and the loop continues.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::cli::commands::run_once;
use crate::cli::error::CliResult;
use crate::resolver::Resolver;

/// Tokens that end the interactive session, compared case-insensitively.
pub const EXIT_WORDS: [&str; 6] = ["q", "quit", "exit", "done", "bye", "goodbye"];

const PROMPT: &str = "Enter URI or Q[uit]> ";

/// Check for a quit command.
pub fn is_exit(line: &str) -> bool {
    let word = line.trim().to_lowercase();
    EXIT_WORDS.contains(&word.as_str())
}

/// Run the interactive loop over `input`.
///
/// A background warm-up resolves the given URIs to prime whatever cache the
/// resolver maintains; its results are never consulted and failures are
/// ignored. Each non-blank, non-exit line is resolved in verbose mode; errors
/// are printed and the loop continues.
pub fn run(
    resolver: Arc<dyn Resolver>,
    warmup: &[String],
    output: Option<&Path>,
    mut input: impl BufRead,
) -> CliResult<()> {
    spawn_warmup(Arc::clone(&resolver), warmup);

    let mut line = String::new();
    loop {
        print!("{PROMPT}");
        io::stdout().flush().ok();

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break, // end of input
            Ok(_) => {}
            Err(err) => {
                debug!("read failed: {err}");
                break;
            }
        }

        let entry = line.trim();
        if entry.is_empty() {
            continue;
        }
        if is_exit(entry) {
            break;
        }

        if let Err(err) = run_once(resolver.as_ref(), entry, output, true) {
            eprintln!("{err}");
        }
    }

    Ok(())
}

/// Fire-and-forget cache warm-up; the thread is never joined.
fn spawn_warmup(resolver: Arc<dyn Resolver>, uris: &[String]) {
    if uris.is_empty() {
        return;
    }

    let uris = uris.to_vec();
    thread::spawn(move || {
        for uri in uris {
            debug!("warm-up: {uri}");
            let _ = resolver.resolve(&uri);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_exit_words_then_recognized_in_any_case() {
        for word in EXIT_WORDS {
            assert!(is_exit(word));
            assert!(is_exit(&word.to_uppercase()));
        }
        assert!(is_exit("  Quit  "));
    }

    #[test]
    fn given_other_input_then_not_an_exit() {
        assert!(!is_exit("num.uk:1"));
        assert!(!is_exit(""));
        assert!(!is_exit("quit now"));
    }
}
