//! The build pipeline: manifest check, tooling install, clean, build,
//! validate, and the optional upload.

mod artifacts;
mod manifest;


use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use self::artifacts::{clean_targets, dist_files, relative_path_str, DIST_DIR};
pub use self::manifest::MANIFEST_FILE;
use crate::context::CommandContext;
use crate::outcome::{ExecutionOutcome, StageError};
use crate::reporter::{ReportEvent, Reporter};
use crate::ToolInvocation;

const TEST_INDEX_SIMPLE_URL: &str = "https://test.pypi.org/simple/";
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CheckManifest,
    InstallDeps,
    Clean,
    Build,
    Validate,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::CheckManifest => "check_manifest",
            Stage::InstallDeps => "install_deps",
            Stage::Clean => "clean",
            Stage::Build => "build",
            Stage::Validate => "validate",
            Stage::Upload => "upload",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadTarget {
    TestPypi,
    Pypi,
}

impl UploadTarget {
    #[must_use]
    pub fn index_label(self) -> &'static str {
        match self {
            UploadTarget::TestPypi => "TestPyPI",
            UploadTarget::Pypi => "PyPI",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineRequest {
    pub upload: Option<UploadTarget>,
    pub show_usage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageReport {
    fn new(stage: Stage, status: StageStatus) -> Self {
        Self {
            stage,
            status,
            command: None,
            code: None,
            error: None,
        }
    }
}

/// Runs the pipeline stages against one project root, one at a time.
pub struct Orchestrator<'a> {
    ctx: &'a CommandContext,
    reporter: &'a dyn Reporter,
    root: PathBuf,
    reports: Vec<StageReport>,
}

impl<'a> Orchestrator<'a> {
    /// # Errors
    /// Returns an error if the project root cannot be resolved.
    pub fn new(ctx: &'a CommandContext, reporter: &'a dyn Reporter) -> Result<Self> {
        Ok(Self {
            ctx,
            reporter,
            root: ctx.project_root()?,
            reports: Vec::new(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    /// Runs one invocation and reports its captured output.
    ///
    /// Returns `true` iff the process exited with status zero. Spawn failures
    /// count as failures; nothing here aborts the pipeline.
    pub fn run_command(&mut self, stage: Stage, invocation: &ToolInvocation) -> bool {
        let command = invocation.command_line();
        self.reporter.report(ReportEvent::Step {
            description: &invocation.description,
            command: &command,
        });
        debug!(%stage, %command, "spawning");

        let mut report = StageReport::new(stage, StageStatus::Ok);
        report.command = Some(command.clone());
        let succeeded = match self.ctx.tools().run(invocation, &self.root) {
            Ok(output) => {
                report.code = Some(output.code);
                if output.success() {
                    self.reporter.report(ReportEvent::StepSucceeded {
                        stdout: &output.stdout,
                    });
                    true
                } else {
                    let error = StageError::NonZeroExit {
                        command,
                        code: output.code,
                    };
                    warn!(%stage, code = output.code, "command failed");
                    self.reporter.report(ReportEvent::StepFailed {
                        error: &error,
                        stdout: &output.stdout,
                        stderr: &output.stderr,
                    });
                    report.error = Some(error.to_string());
                    false
                }
            }
            Err(err) => {
                let error = StageError::Spawn {
                    command,
                    reason: format!("{err:#}"),
                };
                warn!(%stage, error = %error, "command could not start");
                self.reporter.report(ReportEvent::StepFailed {
                    error: &error,
                    stdout: "",
                    stderr: "",
                });
                report.error = Some(error.to_string());
                false
            }
        };
        if !succeeded {
            report.status = StageStatus::Failed;
        }
        self.reports.push(report);
        succeeded
    }

    /// `python -m pip install build twine`
    pub fn install_dev_dependencies(&mut self) -> bool {
        let invocation = ToolInvocation::python_module(
            "Installing build dependencies",
            self.ctx.python(),
            "pip",
            ["install", "build", "twine"],
        );
        self.run_command(Stage::InstallDeps, &invocation)
    }

    /// Removes `build`, `dist`, and `*.egg-info` under the project root.
    ///
    /// # Errors
    /// Filesystem failures are returned as-is; the caller does not recover.
    pub fn clean_build(&mut self) -> Result<Vec<PathBuf>> {
        self.reporter
            .report(ReportEvent::Note("Cleaning previous build artifacts..."));
        let fs = self.ctx.fs();
        let targets = clean_targets(fs, &self.root)?;
        for path in &targets {
            if fs.is_dir(path) {
                fs.remove_dir_all(path)?;
            } else {
                fs.remove_file(path)?;
            }
            let shown = PathBuf::from(relative_path_str(path, &self.root));
            self.reporter.report(ReportEvent::Removed(&shown));
        }
        info!(removed = targets.len(), "cleaned build output");
        self.reports.push(StageReport::new(Stage::Clean, StageStatus::Ok));
        Ok(targets)
    }

    /// `python -m build`
    pub fn build_package(&mut self) -> bool {
        let invocation = ToolInvocation::python_module(
            "Building package",
            self.ctx.python(),
            "build",
            Vec::<String>::new(),
        );
        self.run_command(Stage::Build, &invocation)
    }

    /// `python -m twine check dist/*`
    ///
    /// # Errors
    /// Returns an error if `dist/` cannot be listed.
    pub fn check_package(&mut self) -> Result<bool> {
        let Some(files) = self.artifacts_or_fail(Stage::Validate)? else {
            return Ok(false);
        };
        let invocation = ToolInvocation::python_module(
            "Checking package",
            self.ctx.python(),
            "twine",
            std::iter::once("check".to_string()).chain(files),
        );
        Ok(self.run_command(Stage::Validate, &invocation))
    }

    /// `python -m twine upload --repository testpypi dist/*`
    ///
    /// # Errors
    /// Returns an error if `dist/` cannot be listed.
    pub fn upload_to_testpypi(&mut self) -> Result<bool> {
        let repository = self.ctx.config().publish().test_repository.clone();
        self.upload(
            UploadTarget::TestPypi,
            vec!["--repository".to_string(), repository],
        )
    }

    /// `python -m twine upload dist/*`
    ///
    /// # Errors
    /// Returns an error if `dist/` cannot be listed.
    pub fn upload_to_pypi(&mut self) -> Result<bool> {
        self.upload(UploadTarget::Pypi, Vec::new())
    }

    fn upload(&mut self, target: UploadTarget, options: Vec<String>) -> Result<bool> {
        let index = target.index_label();
        self.reporter
            .report(ReportEvent::Note(&format!("Uploading to {index}...")));
        self.reporter.report(ReportEvent::Note(&format!(
            "You'll need to enter your {index} credentials."
        )));
        let Some(files) = self.artifacts_or_fail(Stage::Upload)? else {
            return Ok(false);
        };
        let args = std::iter::once("upload".to_string())
            .chain(options)
            .chain(files);
        let invocation = ToolInvocation::python_module(
            format!("Uploading artifacts to {index}"),
            self.ctx.python(),
            "twine",
            args,
        )
        .interactive();
        Ok(self.run_command(Stage::Upload, &invocation))
    }

    fn artifacts_or_fail(&mut self, stage: Stage) -> Result<Option<Vec<String>>> {
        let files = dist_files(self.ctx.fs(), &self.root)?;
        let error = if files.is_empty() {
            StageError::NoArtifacts {
                dir: DIST_DIR.to_string(),
            }
        } else {
            // twine must receive the exact on-disk name.
            match files
                .iter()
                .map(|path| path.to_str().map(str::to_string).ok_or(path))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(names) => return Ok(Some(names)),
                Err(path) => StageError::NonUtf8Artifact {
                    path: path.display().to_string(),
                },
            }
        };
        warn!(%stage, "{error}");
        self.reporter.report(ReportEvent::StepFailed {
            error: &error,
            stdout: "",
            stderr: "",
        });
        let mut report = StageReport::new(stage, StageStatus::Failed);
        report.error = Some(error.to_string());
        self.reports.push(report);
        Ok(None)
    }

    fn record(&mut self, stage: Stage, status: StageStatus) {
        self.reports.push(StageReport::new(stage, status));
    }
}

/// Runs the full pipeline in the context's project root.
///
/// Gated failures come back as non-success outcomes; only unexpected
/// filesystem faults are returned as errors.
///
/// # Errors
/// Returns an error if the project root cannot be resolved or build output
/// cannot be cleaned or listed.
pub fn run_pipeline(
    ctx: &CommandContext,
    reporter: &dyn Reporter,
    request: &PipelineRequest,
) -> Result<ExecutionOutcome> {
    let mut orchestrator = Orchestrator::new(ctx, reporter)?;
    let fs = ctx.fs();
    let name = manifest::display_name(fs, orchestrator.root());

    reporter.report(ReportEvent::Header(&format!("{name} Package Builder")));
    reporter.report(ReportEvent::Note(&"=".repeat(RULE_WIDTH)));

    if !manifest::has_manifest(fs, orchestrator.root()) {
        let message =
            format!("Error: {MANIFEST_FILE} not found. Please run this script from the project root.");
        reporter.report(ReportEvent::Error(&message));
        orchestrator.record(Stage::CheckManifest, StageStatus::Failed);
        return Ok(ExecutionOutcome::user_error(
            format!("{MANIFEST_FILE} not found"),
            json!({
                "reason": "missing_manifest",
                "hint": format!("Run pyship from the directory that contains {MANIFEST_FILE}."),
                "stages": orchestrator.reports(),
            }),
        ));
    }
    orchestrator.record(Stage::CheckManifest, StageStatus::Ok);
    info!(project = %name, "manifest found");

    if ctx.config().install().skip {
        debug!("skipping tooling install");
        orchestrator.record(Stage::InstallDeps, StageStatus::Skipped);
    } else if !orchestrator.install_dev_dependencies() {
        return Ok(gate_failure(
            &orchestrator,
            "Failed to install build dependencies",
            Stage::InstallDeps,
        ));
    }

    let removed = orchestrator.clean_build()?;
    let removed: Vec<String> = removed
        .iter()
        .map(|path| relative_path_str(path, orchestrator.root()))
        .collect();

    if !orchestrator.build_package() {
        return Ok(gate_failure(&orchestrator, "Failed to build package", Stage::Build));
    }

    if !orchestrator.check_package()? {
        return Ok(gate_failure(&orchestrator, "Package check failed", Stage::Validate));
    }

    reporter.report(ReportEvent::Success("Package built successfully!"));
    reporter.report(ReportEvent::Note(&next_steps(&name)));

    let uploaded = match request.upload {
        Some(UploadTarget::TestPypi) => Some(orchestrator.upload_to_testpypi()?),
        Some(UploadTarget::Pypi) => Some(orchestrator.upload_to_pypi()?),
        None => None,
    };

    if request.show_usage {
        reporter.report(ReportEvent::Note(USAGE));
    }

    let artifacts: Vec<String> = dist_files(fs, orchestrator.root())?
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    let details = json!({
        "project": name,
        "artifacts": artifacts,
        "removed": removed,
        "upload": request.upload,
        "stages": orchestrator.reports(),
    });

    match (request.upload, uploaded) {
        (Some(target), Some(false)) => {
            let message = format!("Upload to {} failed", target.index_label());
            reporter.report(ReportEvent::Error(&message));
            Ok(ExecutionOutcome::failure(message, details))
        }
        (Some(target), _) => Ok(ExecutionOutcome::success(
            format!(
                "built {} artifact(s) and uploaded to {}",
                artifacts.len(),
                target.index_label()
            ),
            details,
        )),
        (None, _) => Ok(ExecutionOutcome::success(
            format!("built {} artifact(s)", artifacts.len()),
            details,
        )),
    }
}

const USAGE: &str = "\
Usage:
  pyship          # Build package only
  pyship --test   # Build and upload to TestPyPI
  pyship --upload # Build and upload to PyPI
  pyship --help   # Show this help";

fn next_steps(name: &str) -> String {
    format!(
        "Next steps:\n\
         1. Test the package: pip install --index-url {TEST_INDEX_SIMPLE_URL} {name}\n\
         2. Upload to TestPyPI: pyship --test\n\
         3. Upload to PyPI: pyship --upload"
    )
}

fn gate_failure(orchestrator: &Orchestrator<'_>, message: &str, stage: Stage) -> ExecutionOutcome {
    orchestrator.reporter.report(ReportEvent::Error(message));
    ExecutionOutcome::failure(
        message,
        json!({
            "reason": "stage_failed",
            "stage": stage,
            "stages": orchestrator.reports(),
        }),
    )
}
