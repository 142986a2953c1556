//! Helpers for running the `pyticket` binary against an isolated workspace.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch project directory plus a private `PYTICKET_HOME`.
pub struct PtWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
    pub home: PathBuf,
}

impl PtWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().join("project");
        let home = temp.path().join("home");
        std::fs::create_dir(&root).expect("create project dir");
        Self {
            _temp: temp,
            root,
            home,
        }
    }

    /// Workspace with an initialized repository and a no-op editor.
    pub fn initialized() -> Self {
        let workspace = Self::new();
        run_ok(&workspace, ["init"], "init");
        run_ok(&workspace, ["configure", "editor", "true"], "configure");
        workspace
    }

    pub fn repository(&self) -> PathBuf {
        self.root.join(".pyticket")
    }

    pub fn content(&self, name: &str) -> PathBuf {
        self.repository().join("contents").join(name)
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("pyticket").expect("pyticket binary");
        cmd.current_dir(&self.root)
            .env("PYTICKET_HOME", &self.home)
            .env("EDITOR", "true")
            .env_remove("VISUAL")
            .env_remove("PYTICKET_LOG")
            .env_remove("PYTICKET_LOG_FILE");
        cmd
    }
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn finish(label: &str, output: &std::process::Output) -> RunOutput {
    let out = RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !out.status.success() {
        eprintln!("[{label}] exit {:?}\n{}", out.status.code(), out.stderr);
    }
    out
}

pub fn run_pyticket<I, S>(workspace: &PtWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = workspace
        .command()
        .args(args)
        .output()
        .expect("run pyticket");
    finish(label, &output)
}

pub fn run_pyticket_with_input<I, S>(
    workspace: &PtWorkspace,
    args: I,
    input: &str,
    label: &str,
) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = workspace
        .command()
        .args(args)
        .write_stdin(input)
        .output()
        .expect("run pyticket");
    finish(label, &output)
}

/// Run and assert success, returning stdout.
pub fn run_ok<I, S>(workspace: &PtWorkspace, args: I, label: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_pyticket(workspace, args, label);
    assert!(output.status.success(), "{label} failed: {}", output.stderr);
    output.stdout
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
