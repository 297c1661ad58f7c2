use tracing::debug;

use crate::config::settings::{EnvSnapshot, PYTHON_ENV};

const FALLBACK_INTERPRETER: &str = "python";

/// Picks the interpreter used for every tool invocation.
///
/// An explicit `PYSHIP_PYTHON` always wins. Otherwise the first of `python3`
/// and `python` found on `PATH` is used; when neither exists the bare name is
/// returned so the spawn failure surfaces in the first stage that needs it.
pub(crate) fn detect_interpreter(snapshot: &EnvSnapshot) -> String {
    if let Some(explicit) = snapshot
        .var(PYTHON_ENV)
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return explicit.to_string();
    }

    for candidate in ["python3", "python"] {
        if let Ok(path) = which::which(candidate) {
            if let Some(path) = path.to_str() {
                debug!(interpreter = %path, "detected python interpreter");
                return path.to_string();
            }
        }
    }

    debug!("no python interpreter on PATH; falling back to `{FALLBACK_INTERPRETER}`");
    FALLBACK_INTERPRETER.to_string()
}
