use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::process::{run_command, RunOutput, StdinMode};
use super::ToolInvocation;

pub trait ToolRunner: Send + Sync {
    /// Runs the invocation to completion inside `cwd`.
    ///
    /// # Errors
    /// Returns an error only when the program cannot be started or its
    /// output cannot be collected; a non-zero exit is a normal `RunOutput`.
    fn run(&self, invocation: &ToolInvocation, cwd: &Path) -> Result<RunOutput>;
}

pub trait FileSystem: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}

pub trait Effects: Send + Sync {
    fn tools(&self) -> &dyn ToolRunner;
    fn fs(&self) -> &dyn FileSystem;
}

pub type SharedEffects = Arc<dyn Effects>;

pub struct SystemEffects {
    tools: Arc<SystemToolRunner>,
    fs: Arc<SystemFileSystem>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(SystemToolRunner),
            fs: Arc::new(SystemFileSystem),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn tools(&self) -> &dyn ToolRunner {
        self.tools.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, invocation: &ToolInvocation, cwd: &Path) -> Result<RunOutput> {
        let stdin = if invocation.interactive {
            StdinMode::Inherit
        } else {
            StdinMode::Null
        };
        run_command(&invocation.program, &invocation.args, cwd, stdin)
    }
}

pub(crate) struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in
            std::fs::read_dir(path).with_context(|| format!("reading dir {}", path.display()))?
        {
            let entry = entry.with_context(|| format!("reading dir {}", path.display()))?;
            entries.push(entry.path());
        }
        entries.sort();
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path).with_context(|| format!("removing dir {}", path.display()))
    }
}
