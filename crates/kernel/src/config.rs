//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::{NavError, NavResult};
use crate::menu::{DEFAULT_MAX_DEPTH, NavigationRegistry, ResolverOptions};
use crate::permissions::MatchMode;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Navigation TOML to load instead of the embedded one.
    pub nav_config: Option<PathBuf>,

    /// Name comparison strictness (default: substring).
    pub match_mode: MatchMode,

    /// Menu levels the landing route resolver visits (default: 3).
    pub resolve_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nav_config: None,
            match_mode: MatchMode::default(),
            resolve_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> NavResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> NavResult<Self> {
        let nav_config = lookup("NAVGATE_NAV_CONFIG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let match_mode = match lookup("NAVGATE_MATCH_MODE") {
            Some(value) => value.parse()?,
            None => MatchMode::default(),
        };

        let resolve_depth = match lookup("NAVGATE_RESOLVE_DEPTH") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|depth| *depth >= 1)
                .ok_or(NavError::InvalidSetting {
                    key: "NAVGATE_RESOLVE_DEPTH",
                    value,
                })?,
            None => DEFAULT_MAX_DEPTH,
        };

        Ok(Self {
            nav_config,
            match_mode,
            resolve_depth,
        })
    }

    /// Resolver options derived from this configuration.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_depth: self.resolve_depth,
            ..ResolverOptions::default()
        }
    }

    /// Load the configured navigation, or the embedded default.
    pub fn load_navigation(&self) -> NavResult<NavigationRegistry> {
        match &self.nav_config {
            Some(path) => NavigationRegistry::load(path),
            None => NavigationRegistry::embedded(),
        }
    }
}
