// src/config/env_file.rs

//! `KEY=VALUE` environment files passed with `-e/--env_file`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{Result, StarterError};

/// Read and parse an env file.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        StarterError::ConfigError(format!("cannot read env file {}: {e}", path.display()))
    })?;
    parse_env_file(&contents)
        .map_err(|msg| StarterError::ConfigError(format!("{}: {msg}", path.display())))
}

/// Parse env-file contents.
///
/// Blank lines and lines starting with `#` are skipped. Everything after the
/// first `=` is the value; key and value are trimmed. Later keys win.
pub fn parse_env_file(contents: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    let mut vars = BTreeMap::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("line {}: expected KEY=VALUE, got {line:?}", idx + 1));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {}: empty variable name", idx + 1));
        }

        vars.insert(key.to_string(), value.trim().to_string());
    }

    Ok(vars)
}
