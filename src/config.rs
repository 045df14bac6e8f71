//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/numcli/numcli.toml`
//! 3. Environment variables: `NUMCLI_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: {message}")]
    Load { message: String },
}

/// Resolver delegation settings.
///
/// The record lookup is owned by an external resolver executable; these
/// settings name it and any fixed arguments it is invoked with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Resolver executable, invoked with the URI as its final argument
    pub command: String,
    /// Arguments passed before the URI
    pub args: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            command: "num-resolve".into(),
            args: vec![],
        }
    }
}

/// Raw resolver config for intermediate parsing (fields are Option to
/// distinguish "not specified" from an explicit value).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawResolverConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    #[serde(default)]
    pub resolver: RawResolverConfig,
    pub warmup: Option<Vec<String>>,
}

/// Unified configuration for numcli.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// External resolver delegation
    pub resolver: ResolverConfig,
    /// URIs resolved in the background on interactive startup to prime
    /// whatever cache the resolver maintains
    pub warmup: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            warmup: vec!["num.uk:1".into(), "num.uk:3".into(), "num.uk:4".into()],
        }
    }
}

/// Get the XDG config directory for numcli.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "numcli").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("numcli.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Load {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base).
    ///
    /// Overlay wins for any field it specifies; unspecified fields keep the
    /// base value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            resolver: ResolverConfig {
                command: overlay
                    .resolver
                    .command
                    .clone()
                    .unwrap_or_else(|| self.resolver.command.clone()),
                args: overlay
                    .resolver
                    .args
                    .clone()
                    .unwrap_or_else(|| self.resolver.args.clone()),
            },
            warmup: overlay.warmup.clone().unwrap_or_else(|| self.warmup.clone()),
        }
    }

    /// Expand `~`, `$VAR`, and `${VAR}` in the resolver command.
    fn expand_paths(&mut self) {
        self.resolver.command = expand(&self.resolver.command);
    }

    /// Load settings from the default global config location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `global` - Path to the global config file, if any
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config file (when it exists)
    /// 3. Environment variables: `NUMCLI_*` prefix with `__` nesting,
    ///    e.g. `NUMCLI_RESOLVER__COMMAND`
    pub fn load_from(global: Option<&Path>) -> Result<Self, ConfigError> {
        let mut current = Self::default();

        if let Some(path) = global {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply NUMCLI_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("NUMCLI")
                .separator("__")
                .list_separator(","),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("resolver.command") {
            settings.resolver.command = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("resolver.args") {
            settings.resolver.args = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("warmup") {
            settings.warmup = val;
        }

        Ok(settings)
    }
}

fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn config_err(e: config::ConfigError) -> ConfigError {
    ConfigError::Load {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_when_merging_then_keeps_defaults() {
        let base = Settings::default();
        let result = base.merge_with(&RawSettings::default());
        assert_eq!(result, base);
    }

    #[test]
    fn given_overlay_command_when_merging_then_replaces_command_only() {
        let base = Settings::default();
        let overlay = RawSettings {
            resolver: RawResolverConfig {
                command: Some("other-resolver".into()),
                args: None,
            },
            warmup: None,
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.resolver.command, "other-resolver");
        assert_eq!(result.resolver.args, base.resolver.args);
        assert_eq!(result.warmup, base.warmup);
    }

    #[test]
    fn given_overlay_warmup_when_merging_then_replaces_list() {
        let base = Settings::default();
        let overlay = RawSettings {
            resolver: RawResolverConfig::default(),
            warmup: Some(vec!["num.uk:1".into()]),
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.warmup, vec!["num.uk:1".to_string()]);
    }

    #[test]
    fn given_tilde_in_command_when_expanding_then_resolves_home() {
        let mut settings = Settings {
            resolver: ResolverConfig {
                command: "~/bin/num-resolve".into(),
                args: vec![],
            },
            warmup: vec![],
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.resolver.command.starts_with(&home),
            "command should expand ~: {}",
            settings.resolver.command
        );
    }

    #[test]
    fn given_default_settings_then_warmup_targets_well_known_uris() {
        let settings = Settings::default();
        assert_eq!(settings.warmup, vec!["num.uk:1", "num.uk:3", "num.uk:4"]);
    }
}
