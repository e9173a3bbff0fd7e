//! Error types for loading navigation configuration and permission payloads.
//!
//! Permission decisions themselves never fail; a missing tree or a missing
//! route is represented as data by the matcher and resolver.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating inputs.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid navigation config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid permission payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("role payload for {0:?} was not successful")]
    RoleUnavailable(String),

    #[error("package {package:?}: menu item with empty name")]
    EmptyItemName { package: String },

    #[error("duplicate package {0:?}")]
    DuplicatePackage(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },
}

/// Result type alias using NavError.
pub type NavResult<T> = Result<T, NavError>;
