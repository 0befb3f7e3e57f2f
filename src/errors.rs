// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("program '{program}' depends on unknown program '{dependency}'")]
    UnknownProgramReference { program: String, dependency: String },

    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error("Cycle detected in dependency graph: {0}")]
    DagCycle(String),

    #[error("template variable '{0}' refers back to itself")]
    TemplateCycle(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StarterError>;
