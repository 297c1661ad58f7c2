use color_eyre::Result;
use pyship_core::{ExecutionOutcome, ReportEvent, Reporter};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
}

/// Prints pipeline progress as it happens.
///
/// Failures always go to stderr; everything else is dropped under
/// `--quiet` or `--json`.
pub struct ConsoleReporter {
    style: Style,
    silent: bool,
}

impl ConsoleReporter {
    pub fn new(style: Style, opts: OutputOptions) -> Self {
        Self {
            style,
            silent: opts.quiet || opts.json,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: ReportEvent<'_>) {
        match event {
            ReportEvent::StepFailed {
                error,
                stdout,
                stderr,
            } => {
                eprintln!("{}", self.style.warn(&format!("Error: {error}")));
                if !stdout.trim().is_empty() {
                    eprintln!("STDOUT: {}", stdout.trim_end());
                }
                if !stderr.trim().is_empty() {
                    eprintln!("STDERR: {}", stderr.trim_end());
                }
            }
            ReportEvent::Error(text) => eprintln!("{}", self.style.error(text)),
            _ if self.silent => {}
            ReportEvent::Header(text) => println!("{}", self.style.header(text)),
            ReportEvent::Step {
                description,
                command,
            } => {
                println!("\n{}", self.style.step(&format!("{description}...")));
                println!("Running: {}", self.style.command(command));
            }
            ReportEvent::StepSucceeded { stdout } => {
                println!("{}", self.style.ok("Success!"));
                if !stdout.trim().is_empty() {
                    println!("{}", stdout.trim_end());
                }
            }
            ReportEvent::Removed(path) => println!("Removed: {}", path.display()),
            ReportEvent::Note(text) => println!("{}", self.style.info(text)),
            ReportEvent::Success(text) => println!("\n{}", self.style.ok(text)),
        }
    }
}

/// Writes the final envelope for `--json` and returns the exit code.
pub fn emit_output(opts: &OutputOptions, outcome: &ExecutionOutcome) -> Result<i32> {
    if opts.json {
        let payload = pyship_core::to_json_response(outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(outcome.exit_code())
}
