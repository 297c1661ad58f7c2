//! Captured execution of external tools.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};

const CAPTURE_LIMIT_ENV: &str = "PYSHIP_MAX_CAPTURE_BYTES";
const DEFAULT_CAPTURE_LIMIT: usize = 1024 * 1024;
const TRUNCATION_MARKER: &str = "\n[...truncated...]\n";

fn capture_limit() -> usize {
    std::env::var(CAPTURE_LIMIT_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .filter(|limit: &usize| *limit > 0)
        .unwrap_or(DEFAULT_CAPTURE_LIMIT)
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Where the child's stdin comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    Null,
    /// Lets the tool prompt on the user's terminal.
    Inherit,
}

/// Runs `program` with `args` in `cwd` and waits for it, capturing both
/// output streams.
///
/// A signal-terminated child reports exit code `-1`.
///
/// # Errors
/// Returns an error when the program cannot be started or its output cannot
/// be read.
pub fn run_command(
    program: &str,
    args: &[String],
    cwd: &Path,
    stdin: StdinMode,
) -> Result<RunOutput> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(match stdin {
            StdinMode::Null => Stdio::null(),
            StdinMode::Inherit => Stdio::inherit(),
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    // Both pipes are drained concurrently so a chatty stderr cannot block
    // the child while stdout is being read.
    let limit = capture_limit();
    let stdout = collect(child.stdout.take(), "stdout", limit)?;
    let stderr = collect(child.stderr.take(), "stderr", limit)?;

    let status = child
        .wait()
        .with_context(|| format!("waiting for {program}"))?;
    Ok(RunOutput {
        code: status.code().unwrap_or(-1),
        stdout: finish(stdout, "stdout")?,
        stderr: finish(stderr, "stderr")?,
    })
}

type Collector = JoinHandle<io::Result<String>>;

fn collect<R>(stream: Option<R>, name: &'static str, limit: usize) -> Result<Collector>
where
    R: Read + Send + 'static,
{
    let stream = stream.ok_or_else(|| anyhow!("{name} was not piped"))?;
    Ok(thread::spawn(move || drain(stream, limit)))
}

fn finish(collector: Collector, name: &str) -> Result<String> {
    collector
        .join()
        .map_err(|_| anyhow!("{name} reader panicked"))?
        .with_context(|| format!("reading {name}"))
}

fn drain(mut reader: impl Read, limit: usize) -> io::Result<String> {
    let mut tail = Tail::new(limit);
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => tail.push(&chunk[..read]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(tail.into_text())
}

/// The last `limit` bytes of a stream. Build tools put the useful part of a
/// failure at the end.
#[derive(Debug)]
struct Tail {
    limit: usize,
    bytes: Vec<u8>,
    truncated: bool,
}

impl Tail {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            bytes: Vec::new(),
            truncated: false,
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
        if self.bytes.len() > self.limit {
            let excess = self.bytes.len() - self.limit;
            self.bytes.drain(..excess);
            self.truncated = true;
        }
    }

    fn into_text(self) -> String {
        let mut text = String::from_utf8_lossy(&self.bytes).into_owned();
        if self.truncated {
            text.push_str(TRUNCATION_MARKER);
        }
        text
    }
}
