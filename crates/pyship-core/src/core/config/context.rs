use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::effects::{self, SharedEffects};

pub struct CommandContext {
    config: Config,
    project_root: OnceLock<PathBuf>,
    effects: SharedEffects,
}

impl CommandContext {
    /// Creates a command context from the process environment.
    ///
    /// The project root is the working directory, resolved lazily.
    #[must_use]
    pub fn new(effects: SharedEffects) -> Self {
        Self::with_config(effects, Config::from_env())
    }

    #[must_use]
    pub fn with_config(effects: SharedEffects, config: Config) -> Self {
        Self {
            config,
            project_root: OnceLock::new(),
            effects,
        }
    }

    /// Pins the project root instead of using the working directory.
    #[must_use]
    pub fn with_project_root(self, root: PathBuf) -> Self {
        let _ = self.project_root.set(root);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fs(&self) -> &dyn effects::FileSystem {
        self.effects.fs()
    }

    pub fn tools(&self) -> &dyn effects::ToolRunner {
        self.effects.tools()
    }

    pub fn python(&self) -> &str {
        &self.config.python().interpreter
    }

    /// Resolves the project's root directory.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be inspected.
    pub fn project_root(&self) -> Result<PathBuf> {
        if let Some(path) = self.project_root.get() {
            Ok(path.clone())
        } else {
            let path = std::env::current_dir().context("resolving working directory")?;
            let _ = self.project_root.set(path.clone());
            Ok(path)
        }
    }
}
