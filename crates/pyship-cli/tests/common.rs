#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use assert_cmd::{assert::Assert, cargo::cargo_bin_cmd, Command};
use tempfile::TempDir;

pub const MANIFEST: &str = "[project]\nname = \"demo-pkg\"\nversion = \"0.1.0\"\n";

// Logs argv, fails when PYSHIP_FAKE_FAIL is a substring of it, and drops two
// archives into dist/ for `-m build`.
const FAKE_PYTHON: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$PYSHIP_FAKE_LOG"
if [ -n "$PYSHIP_FAKE_FAIL" ]; then
  case "$*" in
    *"$PYSHIP_FAKE_FAIL"*)
      echo "fake failure for $*"
      echo "fake stderr" >&2
      exit 1
      ;;
  esac
fi
if [ "$1" = "-m" ] && [ "$2" = "build" ]; then
  mkdir -p dist
  : > dist/demo_pkg-0.1.0.tar.gz
  : > dist/demo_pkg-0.1.0-py3-none-any.whl
fi
echo "fake python $*"
"#;

static FAKE_PYTHON_DIR: OnceLock<TempDir> = OnceLock::new();

/// Path to the fake interpreter, written once per test binary so no test
/// spawns it while another still holds it open for writing.
pub fn fake_python() -> PathBuf {
    let dir = FAKE_PYTHON_DIR.get_or_init(|| {
        let dir = tempfile::Builder::new()
            .prefix("pyship-fake-python")
            .tempdir()
            .expect("tempdir");
        let script = dir.path().join("python");
        fs::write(&script, FAKE_PYTHON).expect("write fake python");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
                .expect("chmod fake python");
        }
        dir
    });
    dir.path().join("python")
}

pub struct Project {
    pub temp: TempDir,
}

impl Project {
    pub fn new(with_manifest: bool) -> Self {
        let temp = tempfile::Builder::new()
            .prefix("pyship-project")
            .tempdir()
            .expect("tempdir");
        if with_manifest {
            fs::write(temp.path().join("pyproject.toml"), MANIFEST).expect("write manifest");
        }
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.temp.path().join("fake-python.log")
    }

    /// argv lines the fake interpreter saw, in order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(ToOwned::to_owned).collect())
            .unwrap_or_default()
    }

    pub fn pyship(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pyship");
        cmd.current_dir(self.root())
            .env("PYSHIP_PYTHON", fake_python())
            .env("PYSHIP_FAKE_LOG", self.log_path())
            .env("NO_COLOR", "1")
            .env_remove("PYSHIP_FAKE_FAIL")
            .env_remove("PYSHIP_SKIP_INSTALL")
            .env_remove("PYSHIP_TEST_REPOSITORY")
            .env_remove("PYSHIP_MAX_CAPTURE_BYTES");
        cmd
    }
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stderr.clone()).expect("utf8 stderr")
}
