#![allow(dead_code)]

use std::collections::BTreeMap;

use program_starter::config::{ConfigFile, DependsOn, EnvValue, RawConfigFile, RawProgramConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                programs: BTreeMap::new(),
                envs: BTreeMap::new(),
            },
        }
    }

    pub fn with_program(mut self, name: &str, program: RawProgramConfig) -> Self {
        self.config.programs.insert(name.to_string(), program);
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.config.envs.insert(key.to_string(), EnvValue::from(value));
        self
    }

    /// The unvalidated form, for tests that exercise validation itself.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawProgramConfig`.
#[derive(Default)]
pub struct ProgramBuilder {
    program: RawProgramConfig,
    deps: Vec<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program whose `start`/`stop` scripts echo `<name> start` / `<name> stop`.
    pub fn echo(name: &str) -> Self {
        Self::new()
            .start(&format!("echo {name} start"))
            .stop(&format!("echo {name} stop"))
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.deps.push(dep.to_string());
        self
    }

    pub fn pre_start(mut self, script: &str) -> Self {
        self.program.pre_start = Some(script.to_string());
        self
    }

    pub fn start(mut self, script: &str) -> Self {
        self.program.start = Some(script.to_string());
        self
    }

    pub fn post_start(mut self, script: &str) -> Self {
        self.program.post_start = Some(script.to_string());
        self
    }

    pub fn pre_stop(mut self, script: &str) -> Self {
        self.program.pre_stop = Some(script.to_string());
        self
    }

    pub fn stop(mut self, script: &str) -> Self {
        self.program.stop = Some(script.to_string());
        self
    }

    pub fn post_stop(mut self, script: &str) -> Self {
        self.program.post_stop = Some(script.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.program.envs.insert(key.to_string(), EnvValue::from(value));
        self
    }

    pub fn build(mut self) -> RawProgramConfig {
        if !self.deps.is_empty() {
            self.program.depends_on = Some(DependsOn::Many(self.deps));
        }
        self.program
    }
}
