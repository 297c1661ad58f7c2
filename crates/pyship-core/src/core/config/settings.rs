use std::collections::HashMap;
use std::env;

use crate::core::python::detect_interpreter;

pub(crate) const PYTHON_ENV: &str = "PYSHIP_PYTHON";
pub(crate) const SKIP_INSTALL_ENV: &str = "PYSHIP_SKIP_INSTALL";
pub(crate) const TEST_REPOSITORY_ENV: &str = "PYSHIP_TEST_REPOSITORY";

const DEFAULT_TEST_REPOSITORY: &str = "testpypi";

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn flag_is_enabled(&self, key: &str) -> bool {
        matches!(self.vars.get(key).map(String::as_str), Some("1"))
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) python: PythonConfig,
    pub(crate) install: InstallConfig,
    pub(crate) publish: PublishConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        Self {
            python: PythonConfig {
                interpreter: detect_interpreter(snapshot),
            },
            install: InstallConfig {
                skip: snapshot.flag_is_enabled(SKIP_INSTALL_ENV),
            },
            publish: PublishConfig {
                test_repository: snapshot
                    .var(TEST_REPOSITORY_ENV)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(DEFAULT_TEST_REPOSITORY)
                    .to_string(),
            },
        }
    }

    #[must_use]
    pub fn python(&self) -> &PythonConfig {
        &self.python
    }

    #[must_use]
    pub fn install(&self) -> &InstallConfig {
        &self.install
    }

    #[must_use]
    pub fn publish(&self) -> &PublishConfig {
        &self.publish
    }
}

#[derive(Debug, Clone)]
pub struct PythonConfig {
    pub interpreter: String,
}

#[derive(Debug, Clone, Copy)]
pub struct InstallConfig {
    pub skip: bool,
}

#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub test_repository: String,
}
