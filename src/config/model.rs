// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::ScriptStep;

/// Top-level configuration as read from a YAML/JSON/TOML file.
///
/// ```yaml
/// envs:
///   DATA_DIR: /var/lib/demo
///
/// programs:
///   db:
///     start: "pg_ctl -D ${DATA_DIR}/pg start"
///     stop: "pg_ctl -D ${DATA_DIR}/pg stop"
///   api:
///     depends_on: db
///     start: "./api --port ${API_PORT:8080}"
///     envs:
///       API_PORT: 9000
/// ```
///
/// This is the shape `serde` produces; [`ConfigFile`] is the validated,
/// normalised form the rest of the crate works with.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub programs: BTreeMap<String, RawProgramConfig>,

    /// Global environment overrides applied on top of the ambient environment.
    #[serde(default)]
    pub envs: BTreeMap<String, EnvValue>,
}

/// `programs.<name>` entry before normalisation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProgramConfig {
    /// A single name or a list of names. `depends` is the legacy spelling.
    #[serde(default, alias = "depends")]
    pub depends_on: Option<DependsOn>,

    #[serde(default)]
    pub pre_start: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub post_start: Option<String>,
    #[serde(default)]
    pub pre_stop: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub post_stop: Option<String>,

    #[serde(default)]
    pub envs: BTreeMap<String, EnvValue>,
}

/// `depends_on: db` or `depends_on: [db, cache]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    One(String),
    Many(Vec<String>),
}

impl DependsOn {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            DependsOn::One(name) => vec![name],
            DependsOn::Many(names) => names,
        }
    }
}

/// Scalar value of an `envs` entry. YAML happily parses `PORT: 8080` as a
/// number, so anything scalar is accepted and stringified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl EnvValue {
    pub fn into_string(self) -> String {
        match self {
            EnvValue::Str(s) => s,
            EnvValue::Int(i) => i.to_string(),
            EnvValue::Float(f) => f.to_string(),
            EnvValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::Str(s.to_string())
    }
}

/// Validated configuration. Built once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Programs keyed by name.
    pub programs: BTreeMap<String, ProgramConfig>,

    /// Global `envs`, already stringified.
    pub envs: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Assemble a config without running validation.
    ///
    /// Callers are expected to go through `ConfigFile::try_from(raw)`; this
    /// exists for the validator itself and for tests that need a broken graph.
    pub fn new_unchecked(
        programs: BTreeMap<String, ProgramConfig>,
        envs: BTreeMap<String, String>,
    ) -> Self {
        Self { programs, envs }
    }

    pub fn program(&self, name: &str) -> Option<&ProgramConfig> {
        self.programs.get(name)
    }
}

/// One program after normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramConfig {
    /// Prerequisites, in declaration order.
    pub depends_on: Vec<String>,

    pub pre_start: Option<String>,
    pub start: Option<String>,
    pub post_start: Option<String>,
    pub pre_stop: Option<String>,
    pub stop: Option<String>,
    pub post_stop: Option<String>,

    /// Program-scoped environment overrides.
    pub envs: BTreeMap<String, String>,
}

impl ProgramConfig {
    /// Script template configured for `step`, if any.
    pub fn script(&self, step: ScriptStep) -> Option<&str> {
        let script = match step {
            ScriptStep::PreStart => &self.pre_start,
            ScriptStep::Start => &self.start,
            ScriptStep::PostStart => &self.post_start,
            ScriptStep::PreStop => &self.pre_stop,
            ScriptStep::Stop => &self.stop,
            ScriptStep::PostStop => &self.post_stop,
        };
        script.as_deref()
    }
}

impl From<RawProgramConfig> for ProgramConfig {
    fn from(raw: RawProgramConfig) -> Self {
        Self {
            depends_on: raw.depends_on.map(DependsOn::into_vec).unwrap_or_default(),
            pre_start: raw.pre_start,
            start: raw.start,
            post_start: raw.post_start,
            pre_stop: raw.pre_stop,
            stop: raw.stop,
            post_stop: raw.post_stop,
            envs: stringify_envs(raw.envs),
        }
    }
}

pub(crate) fn stringify_envs(envs: BTreeMap<String, EnvValue>) -> BTreeMap<String, String> {
    envs.into_iter()
        .map(|(k, v)| (k, v.into_string()))
        .collect()
}
