//! Process-wide scheme registration and timed lookups
//!
//! `init` installs the scheme handler table exactly once per process, before
//! any resolution is attempted. `resolver_for` hands out the handler for a
//! URI, and `fetch` wraps a blocking resolution in wall-clock timing.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Settings;
use crate::resolver::{CommandResolver, Resolver, ResolverError};

/// Scheme used when a URI carries no explicit protocol prefix.
pub const DEFAULT_SCHEME: &str = "num";

static HANDLERS: OnceLock<HashMap<String, Arc<dyn Resolver>>> = OnceLock::new();

/// Register the scheme handlers for this process.
///
/// Idempotent: only the first call installs handlers, later calls are no-ops.
/// There is no teardown; the table lives for the process lifetime.
pub fn init(settings: &Settings) {
    HANDLERS.get_or_init(|| {
        debug!("registering {} scheme handler", DEFAULT_SCHEME);
        let mut handlers: HashMap<String, Arc<dyn Resolver>> = HashMap::new();
        handlers.insert(
            DEFAULT_SCHEME.to_string(),
            Arc::new(CommandResolver::new(&settings.resolver)),
        );
        handlers
    });
}

/// Look up the handler registered for a URI's scheme.
///
/// URIs without a `scheme://` prefix (e.g. `num.uk:1`) fall back to the
/// default scheme.
pub fn resolver_for(uri: &str) -> Result<Arc<dyn Resolver>, ResolverError> {
    let scheme = scheme_of(uri);
    HANDLERS
        .get()
        .and_then(|handlers| handlers.get(scheme))
        .cloned()
        .ok_or_else(|| ResolverError::UnknownScheme(scheme.to_string()))
}

fn scheme_of(uri: &str) -> &str {
    match uri.split_once("://") {
        Some((scheme, _))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            scheme
        }
        _ => DEFAULT_SCHEME,
    }
}

/// Resolver that dispatches through the process-wide scheme registry.
#[derive(Debug, Default)]
pub struct SchemeResolver;

impl Resolver for SchemeResolver {
    fn resolve(&self, uri: &str) -> Result<String, ResolverError> {
        resolver_for(uri)?.resolve(uri)
    }
}

/// One resolution attempt with its wall-clock timing.
///
/// Exactly one of payload or error is present, carried by the `Result`.
#[derive(Debug)]
pub struct Lookup {
    pub elapsed: Duration,
    pub outcome: Result<String, ResolverError>,
}

impl Lookup {
    /// Elapsed time the way the shell reports it, e.g. `Took  : 0.200s`.
    pub fn elapsed_line(&self) -> String {
        format!("Took  : {:.3}s", self.elapsed.as_secs_f64())
    }
}

/// Resolve a URI, recording how long the lookup took.
pub fn fetch(resolver: &dyn Resolver, uri: &str) -> Lookup {
    let start = Instant::now();
    let outcome = resolver.resolve(uri);
    Lookup {
        elapsed: start.elapsed(),
        outcome,
    }
}
