//! Resolution boundary
//!
//! The record lookup itself (DNS interaction, URI-to-key transformation,
//! record assembly, caching) is owned by an external resolver. This module
//! defines the trait the shell talks to and the subprocess-backed
//! implementation that delegates to the configured resolver command.

use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::ResolverConfig;

/// Resolution failures.
///
/// The shell collapses all of these into a single "no record" outcome for the
/// user; the variants exist for the debug log and for tests.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("no resolver registered for scheme: {0}")]
    UnknownScheme(String),

    #[error("cannot run resolver {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("resolver failed: {message}")]
    Lookup {
        message: String,
        exit_code: Option<i32>,
    },

    #[error("resolver returned no record")]
    NoRecord,

    #[error("resolver output is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// A NUM record resolver.
///
/// `resolve` blocks until the record is available or the lookup fails; no
/// timeout is imposed here, that is the resolver's responsibility. The
/// warm-up thread shares implementations across threads, hence `Send + Sync`.
pub trait Resolver: Send + Sync {
    fn resolve(&self, uri: &str) -> Result<String, ResolverError>;
}

/// Resolver that delegates to an external resolver command.
///
/// The command is invoked with the URI as its final argument; its stdout is
/// the record payload and a non-zero exit status means the lookup failed.
#[derive(Debug, Clone)]
pub struct CommandResolver {
    command: String,
    args: Vec<String>,
}

impl CommandResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl Resolver for CommandResolver {
    fn resolve(&self, uri: &str) -> Result<String, ResolverError> {
        debug!("resolving {} via {}", uri, self.command);

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(uri)
            .output()
            .map_err(|e| ResolverError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolverError::Lookup {
                message: stderr.trim().to_string(),
                exit_code: output.status.code(),
            });
        }

        let payload = String::from_utf8(output.stdout)?;
        let payload = payload.trim_end();
        if payload.is_empty() {
            return Err(ResolverError::NoRecord);
        }
        Ok(payload.to_string())
    }
}
