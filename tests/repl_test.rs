//! Tests for the interactive loop

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rstest::rstest;

use numcli::repl;
use numcli::resolver::{Resolver, ResolverError};

/// Resolver that records how many lookups were attempted.
#[derive(Default)]
struct CountingResolver {
    calls: AtomicUsize,
}

impl CountingResolver {
    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolver for CountingResolver {
    fn resolve(&self, _uri: &str) -> Result<String, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(r#"{"status":"ok"}"#.to_string())
    }
}

/// Resolver that fails every lookup but still counts them.
#[derive(Default)]
struct FailingResolver {
    calls: AtomicUsize,
}

impl Resolver for FailingResolver {
    fn resolve(&self, _uri: &str) -> Result<String, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ResolverError::NoRecord)
    }
}

/// Resolver that reports each URI it sees on a channel.
struct ChannelResolver {
    tx: Mutex<Sender<String>>,
}

impl Resolver for ChannelResolver {
    fn resolve(&self, uri: &str) -> Result<String, ResolverError> {
        self.tx
            .lock()
            .expect("channel lock")
            .send(uri.to_string())
            .ok();
        Err(ResolverError::NoRecord)
    }
}

#[rstest]
#[case("q")]
#[case("quit")]
#[case("exit")]
#[case("done")]
#[case("bye")]
#[case("goodbye")]
fn given_exit_keyword_when_looping_then_terminates_without_resolving(#[case] word: &str) {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new(format!("{word}\n"));

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 0, "{word} should quit without a lookup");
}

#[test]
fn given_uppercase_exit_keyword_when_looping_then_still_terminates() {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("GOODBYE\n");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 0);
}

#[test]
fn given_blank_lines_when_looping_then_skipped_without_resolving() {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("\n   \n\t\nquit\n");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 0);
}

#[test]
fn given_uri_then_quit_when_looping_then_resolves_exactly_once() {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("num.uk:1\nquit\n");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 1);
}

#[test]
fn given_end_of_input_when_looping_then_terminates_gracefully() {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 0);
}

#[test]
fn given_failing_resolutions_when_looping_then_loop_continues() {
    let resolver = Arc::new(FailingResolver::default());
    let input = Cursor::new("num.uk:1\nnum.uk:2\nquit\n");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn given_warmup_uris_when_looping_then_resolved_in_background() {
    let (tx, rx) = mpsc::channel();
    let resolver = Arc::new(ChannelResolver { tx: Mutex::new(tx) });
    let warmup = vec!["num.uk:1".to_string(), "num.uk:3".to_string()];
    let input = Cursor::new("q\n");

    repl::run(resolver, &warmup, None, input).unwrap();

    // The warm-up thread is never joined; the channel proves it ran
    let timeout = Duration::from_secs(5);
    assert_eq!(rx.recv_timeout(timeout).unwrap(), "num.uk:1");
    assert_eq!(rx.recv_timeout(timeout).unwrap(), "num.uk:3");
}

#[test]
fn given_empty_warmup_set_when_looping_then_no_background_lookups() {
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("exit\n");

    repl::run(resolver.clone(), &[], None, input).unwrap();

    assert_eq!(resolver.count(), 0);
}

#[test]
fn given_output_file_when_looping_then_record_routed_to_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("record.json");
    let resolver = Arc::new(CountingResolver::default());
    let input = Cursor::new("num.uk:1\nquit\n");

    repl::run(resolver.clone(), &[], Some(&path), input).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "{\"status\":\"ok\"}\n");
    assert_eq!(resolver.count(), 1);
}
