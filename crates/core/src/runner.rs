//! Container execution port used by pre-flight checks.
//!
//! Pipelines never talk to a container runtime directly. They describe what
//! to run with an [`ExecRequest`] and hand it to a [`ContainerRunner`]; the
//! production implementation lives in `gha-dagger`, tests use fakes.

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A host directory mounted into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    /// Directory on the host
    pub source: PathBuf,
    /// Absolute path inside the container
    pub target: String,
}

/// A single command to run in a fresh, isolated container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Packages installed in the base image before running
    pub packages: Vec<String>,
    /// Directories mounted read-write
    pub mounts: Vec<Mount>,
    /// Working directory inside the container
    pub workdir: String,
    /// Argument vector, `args[0]` is the program
    pub args: Vec<String>,
    /// Give the command access to the calling engine (needed to nest `dagger call`)
    pub privileged_nesting: bool,
}

impl ExecRequest {
    /// Run `script` with `bash -c`
    #[must_use]
    pub fn bash(script: impl Into<String>) -> Self {
        Self {
            packages: vec!["bash".to_string()],
            mounts: Vec::new(),
            workdir: "/".to_string(),
            args: vec!["bash".to_string(), "-c".to_string(), script.into()],
            privileged_nesting: false,
        }
    }

    /// Install an additional package
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.packages.push(package.into());
        self
    }

    /// Mount a host directory at `target`
    #[must_use]
    pub fn with_mount(mut self, source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        self.mounts.push(Mount {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<String>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Enable privileged nesting
    #[must_use]
    pub const fn with_privileged_nesting(mut self) -> Self {
        self.privileged_nesting = true;
        self
    }

    /// The script passed to `bash -c`, if this is a bash request
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        match self.args.as_slice() {
            [shell, flag, script] if shell == "bash" && flag == "-c" => Some(script),
            _ => None,
        }
    }
}

/// Result of a finished container command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Process exit code
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExecOutcome {
    /// Whether the command exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs commands in isolated containers
#[async_trait]
pub trait ContainerRunner: Send + Sync {
    /// Run `request` to completion and report its exit status.
    ///
    /// A non-zero exit is reported through [`ExecOutcome::exit_code`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the command could not be run at all.
    async fn run(&self, request: &ExecRequest) -> Result<ExecOutcome>;

    /// Name of this runner, for logs
    fn name(&self) -> &'static str;
}
