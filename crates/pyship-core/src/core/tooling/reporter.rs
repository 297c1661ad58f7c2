use std::path::Path;

use super::outcome::StageError;

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, Copy)]
pub enum ReportEvent<'a> {
    /// Banner printed before anything else.
    Header(&'a str),
    /// A tool invocation is about to start.
    Step {
        description: &'a str,
        command: &'a str,
    },
    StepSucceeded {
        stdout: &'a str,
    },
    StepFailed {
        error: &'a StageError,
        stdout: &'a str,
        stderr: &'a str,
    },
    Removed(&'a Path),
    /// Plain informational text.
    Note(&'a str),
    /// A gated stage failed; the pipeline stops after this.
    Error(&'a str),
    Success(&'a str),
}

pub trait Reporter {
    fn report(&self, event: ReportEvent<'_>);
}
