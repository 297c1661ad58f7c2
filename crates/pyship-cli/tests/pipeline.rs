#![cfg(unix)]

use std::fs;

mod common;

use common::{stderr, stdout, Project};

fn uploads(invocations: &[String]) -> Vec<&String> {
    invocations
        .iter()
        .filter(|line| line.starts_with("-m twine upload"))
        .collect()
}

#[test]
fn missing_manifest_exits_one_without_running_tools() {
    let project = Project::new(false);
    fs::create_dir(project.root().join("dist")).expect("dist");

    let assert = project.pyship().arg("--upload").assert().code(1);

    let err = stderr(&assert);
    assert!(
        err.contains("Error: pyproject.toml not found. Please run this script from the project root."),
        "missing manifest message: {err}"
    );
    assert!(project.invocations().is_empty());
    assert!(project.root().join("dist").exists(), "clean must not run");
}

#[test]
fn build_only_run_succeeds_without_uploading() {
    let project = Project::new(true);

    let assert = project.pyship().assert().success();

    let out = stdout(&assert);
    assert!(out.contains("demo-pkg Package Builder"), "header: {out}");
    assert!(out.contains("Package built successfully!"), "banner: {out}");
    assert!(out.contains("Next steps:"), "next steps: {out}");
    assert!(out.contains("Running: "), "command echo: {out}");
    assert_eq!(
        project.invocations(),
        vec![
            "-m pip install build twine".to_string(),
            "-m build".to_string(),
            "-m twine check dist/demo_pkg-0.1.0-py3-none-any.whl dist/demo_pkg-0.1.0.tar.gz"
                .to_string(),
        ]
    );
}

#[test]
fn test_flag_uploads_to_testpypi_once() {
    let project = Project::new(true);

    let assert = project.pyship().arg("--test").assert().success();

    let invocations = project.invocations();
    let uploads = uploads(&invocations);
    assert_eq!(uploads.len(), 1, "uploads: {invocations:?}");
    assert!(uploads[0].starts_with("-m twine upload --repository testpypi dist/"));
    assert!(stdout(&assert).contains("You'll need to enter your TestPyPI credentials."));
}

#[test]
fn upload_flag_uploads_to_pypi_once() {
    let project = Project::new(true);

    project.pyship().arg("--upload").assert().success();

    let invocations = project.invocations();
    let uploads = uploads(&invocations);
    assert_eq!(uploads.len(), 1, "uploads: {invocations:?}");
    assert!(!uploads[0].contains("--repository"));
}

#[test]
fn build_failure_skips_validation() {
    let project = Project::new(true);

    let assert = project
        .pyship()
        .arg("--test")
        .env("PYSHIP_FAKE_FAIL", "-m build")
        .assert()
        .code(1);

    let err = stderr(&assert);
    assert!(err.contains("Failed to build package"), "stderr: {err}");
    assert!(err.contains("STDERR: fake stderr"), "captured stderr: {err}");
    assert_eq!(
        project.invocations(),
        vec!["-m pip install build twine".to_string(), "-m build".to_string()]
    );
    assert!(!project
        .invocations()
        .iter()
        .any(|line| line.starts_with("-m twine")));
}

#[test]
fn install_failure_exits_one() {
    let project = Project::new(true);

    let assert = project
        .pyship()
        .env("PYSHIP_FAKE_FAIL", "pip install")
        .assert()
        .code(1);

    assert!(stderr(&assert).contains("Failed to install build dependencies"));
    assert_eq!(project.invocations().len(), 1);
}

#[test]
fn check_failure_blocks_upload() {
    let project = Project::new(true);

    let assert = project
        .pyship()
        .arg("--upload")
        .env("PYSHIP_FAKE_FAIL", "twine check")
        .assert()
        .code(1);

    assert!(stderr(&assert).contains("Package check failed"));
    assert!(uploads(&project.invocations()).is_empty());
}

#[test]
fn upload_failure_exits_one() {
    let project = Project::new(true);

    let assert = project
        .pyship()
        .arg("--upload")
        .env("PYSHIP_FAKE_FAIL", "twine upload")
        .assert()
        .code(1);

    assert!(stdout(&assert).contains("Package built successfully!"));
    assert!(stderr(&assert).contains("Upload to PyPI failed"));
}

#[test]
fn stale_build_output_is_removed() {
    let project = Project::new(true);
    let root = project.root();
    fs::create_dir_all(root.join("build").join("lib")).expect("build");
    fs::create_dir_all(root.join("dist")).expect("dist");
    fs::write(root.join("dist").join("old-0.0.1.tar.gz"), b"old").expect("old archive");
    fs::create_dir(root.join("demo_pkg.egg-info")).expect("egg-info");

    let assert = project.pyship().assert().success();

    let out = stdout(&assert);
    assert!(out.contains("Removed: build"), "stdout: {out}");
    assert!(out.contains("Removed: demo_pkg.egg-info"), "stdout: {out}");
    assert!(!root.join("build").exists());
    assert!(!root.join("demo_pkg.egg-info").exists());
    assert!(!root.join("dist").join("old-0.0.1.tar.gz").exists());
}

#[test]
fn help_flag_prints_usage_after_the_build() {
    let project = Project::new(true);

    let assert = project.pyship().arg("--help").assert().success();

    let out = stdout(&assert);
    let banner = out.find("Package built successfully!").expect("banner");
    let usage = out.find("pyship --upload # Build and upload to PyPI").expect("usage");
    assert!(usage > banner);
    assert_eq!(project.invocations().len(), 3);
}

#[test]
fn skip_install_env_skips_pip() {
    let project = Project::new(true);

    project
        .pyship()
        .env("PYSHIP_SKIP_INSTALL", "1")
        .assert()
        .success();

    let invocations = project.invocations();
    assert!(!invocations.iter().any(|line| line.contains("pip install")));
    assert_eq!(invocations.len(), 2);
}

#[test]
fn json_flag_emits_an_envelope() {
    let project = Project::new(true);

    let assert = project.pyship().args(["--json", "--test"]).assert().success();

    let payload: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["details"]["project"], "demo-pkg");
    assert_eq!(payload["details"]["upload"], "test_pypi");
    let stages: Vec<_> = payload["details"]["stages"]
        .as_array()
        .expect("stages")
        .iter()
        .map(|stage| stage["stage"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        stages,
        vec!["check_manifest", "install_deps", "clean", "build", "validate", "upload"]
    );
}

#[test]
fn json_flag_reports_missing_manifest() {
    let project = Project::new(false);

    let assert = project.pyship().arg("--json").assert().code(1);

    let payload: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["details"]["reason"], "missing_manifest");
}

#[test]
fn unknown_words_do_not_trigger_uploads() {
    let project = Project::new(true);

    project.pyship().arg("release").assert().success();

    assert!(uploads(&project.invocations()).is_empty());
}

#[test]
fn unknown_flags_still_build_and_check() {
    for flag in ["--dry-run", "-x"] {
        let project = Project::new(true);

        let assert = project.pyship().arg(flag).assert().success();

        assert!(stdout(&assert).contains("Package built successfully!"));
        let invocations = project.invocations();
        assert_eq!(invocations.len(), 3, "{flag}: {invocations:?}");
        assert!(invocations[2].starts_with("-m twine check"));
        assert!(uploads(&invocations).is_empty());
    }
}
