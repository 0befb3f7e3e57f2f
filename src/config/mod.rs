// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk in YAML, JSON or TOML (`loader.rs`).
//! - Validate dependency references and acyclicity (`validate.rs`).
//! - Parse `KEY=VALUE` env files (`env_file.rs`).

pub mod env_file;
pub mod loader;
pub mod model;
pub mod validate;

pub use env_file::{load_env_file, parse_env_file};
pub use loader::{load_and_validate, load_from_path, parse_str, ConfigFormat};
pub use model::{ConfigFile, DependsOn, EnvValue, ProgramConfig, RawConfigFile, RawProgramConfig};
pub use validate::validate_config;
