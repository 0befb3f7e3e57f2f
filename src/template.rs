// src/template.rs

//! `${NAME}` / `${NAME:default}` substitution for lifecycle scripts.
//!
//! Scanning rules, left to right:
//! - `\x` emits `x` verbatim (the backslash is dropped).
//! - `${NAME}` / `${NAME:default}` ends at the first `}`; the inner text is
//!   split on the first `:`. A defined `NAME` is replaced by its value, which
//!   is itself resolved (so values can reference other variables). Otherwise a
//!   non-empty default is inserted literally, otherwise nothing is inserted.
//! - An unterminated `${...` is copied through unchanged.
//! - Anything else is copied unchanged.

use std::collections::BTreeMap;

use crate::errors::{Result, StarterError};

/// Immutable variable mapping used for templating and for child processes.
///
/// Overlays produce new values; the host process environment is only read,
/// never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment. Variables that are not
    /// valid UTF-8 cannot be referenced from templates and are left out; the
    /// shell backend still passes them to children by inheritance.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// A copy of `self` with `overrides` layered on top.
    pub fn overlay<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = self.vars.clone();
        vars.extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self { vars }
    }

    /// A copy of `self` with a single binding added or replaced.
    pub fn with_var(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overlay([(name.into(), value.into())])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Resolve every placeholder in `template` against `env`.
///
/// Fails with [`StarterError::TemplateCycle`] when a variable's value leads
/// back to itself (`A=${B}`, `B=${A}`).
pub fn resolve(template: &str, env: &Environment) -> Result<String> {
    let mut chain = Vec::new();
    resolve_inner(template, env, &mut chain)
}

fn resolve_inner<'e>(
    template: &str,
    env: &'e Environment,
    chain: &mut Vec<&'e str>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find(&['\\', '$'][..]) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if let Some(escaped) = tail.strip_prefix('\\') {
            match escaped.chars().next() {
                Some(c) => {
                    out.push(c);
                    rest = &escaped[c.len_utf8()..];
                }
                None => {
                    // Trailing backslash: nothing to escape, keep it.
                    out.push('\\');
                    rest = "";
                }
            }
        } else if let Some(body) = tail.strip_prefix("${") {
            let Some(end) = body.find('}') else {
                out.push_str(tail);
                return Ok(out);
            };

            let inner = &body[..end];
            rest = &body[end + 1..];

            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            if let Some((key, value)) = env.vars.get_key_value(name) {
                if chain.contains(&key.as_str()) {
                    return Err(StarterError::TemplateCycle(name.to_string()));
                }
                chain.push(key.as_str());
                let resolved = resolve_inner(value, env, chain)?;
                chain.pop();
                out.push_str(&resolved);
            } else if let Some(default) = default.filter(|d| !d.is_empty()) {
                out.push_str(default);
            }
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    Ok(out)
}
