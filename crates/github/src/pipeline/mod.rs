//! Dagger pipelines and their compilation to workflows.
//!
//! A [`Pipeline`] is immutable once built. It can be checked against a
//! repository ([`Pipeline::check`]) and compiled into a [`Workflow`] with an
//! empty `on:` section ([`Pipeline::as_workflow`]).

mod steps;

pub use steps::{CLOUD_TOKEN_ENV, CLOUD_TOKEN_LEGACY_ENV, SPARSE_CHECKOUT_DISCOVERY_PATHS};

use crate::workflow::{Job, Workflow, WorkflowTriggers};
use gha_core::secrets::validate_secret_names;
use gha_core::{ContainerRunner, EmbeddedScripts, Error, ExecRequest, Result, ScriptSource, Settings};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Name of the single job in every generated workflow
pub const JOB_NAME: &str = "dagger";

/// Where the repository is mounted during pre-flight checks
pub const CHECK_MOUNT_PATH: &str = "/src";

/// User-facing description of a pipeline, before settings are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineSpec {
    /// The Dagger command to execute, e.g. `build --source=.`
    pub command: String,
    /// Module to call, empty for the module at the repository root
    pub module: Option<String>,
    /// Runner label overriding the default runner
    pub runner: Option<String>,
    /// Github secrets to expose to the pipeline as environment variables
    pub secrets: Vec<String>,
    /// Paths to check out; `None` checks out the whole repository
    pub sparse_checkout: Option<Vec<String>>,
}

impl PipelineSpec {
    /// Describe a pipeline running `command`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Call a specific module
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Run on a specific runner
    #[must_use]
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runner = Some(runner.into());
        self
    }

    /// Expose a Github secret
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secrets.push(secret.into());
        self
    }

    /// Only check out these paths
    #[must_use]
    pub fn with_sparse_checkout<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sparse_checkout = Some(paths.into_iter().map(Into::into).collect());
        self
    }
}

/// A Dagger pipeline to be called from a GitHub Actions workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    command: String,
    module: Option<String>,
    secrets: Vec<String>,
    sparse_checkout: Option<Vec<String>>,
    settings: Settings,
}

impl Pipeline {
    /// Build a pipeline from its description and the global settings.
    ///
    /// The settings are copied; a non-empty `spec.runner` overrides the
    /// default runner for this pipeline only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCommand`] if the command is blank.
    pub fn new(spec: PipelineSpec, settings: &Settings) -> Result<Self> {
        if spec.command.trim().is_empty() {
            return Err(Error::EmptyCommand);
        }
        let settings = settings.for_runner(spec.runner.as_deref());
        Ok(Self {
            command: spec.command,
            module: spec.module.filter(|m| !m.is_empty()),
            secrets: spec.secrets,
            sparse_checkout: spec.sparse_checkout,
            settings,
        })
    }

    /// First word of the command, e.g. `build` for `build --source=.`
    #[must_use]
    pub fn name(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or_default()
    }

    /// Full Dagger command
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Module to call, `None` for the default module
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Settings in effect for this pipeline
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Script run by the pre-flight check: the compiled call with `--help`
    #[must_use]
    pub fn check_script(&self) -> String {
        let mut script = String::from("dagger call ");
        if let Some(module) = &self.module {
            script.push_str("-m ");
            script.push_str(&shell_quote(module));
            script.push(' ');
        }
        script.push_str(&self.command);
        script.push_str(" --help");
        script
    }

    /// Check that the pipeline is valid, in a best effort way.
    ///
    /// Secret names are validated first, then the command is run with
    /// `--help` in an ephemeral container with `repo` mounted at `/src`.
    /// A command that passes this check can still fail for real.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSecretName`] for a malformed secret name
    /// - [`Error::PipelineInvalid`] if the dry run fails
    /// - [`Error::Cancelled`] if `cancel` fires first
    #[tracing::instrument(
        name = "pipeline_check",
        fields(pipeline = %self.name(), runner = runner.name()),
        skip(self, repo, runner, cancel)
    )]
    pub async fn check(
        &self,
        repo: &Path,
        runner: &dyn ContainerRunner,
        cancel: &CancellationToken,
    ) -> Result<()> {
        validate_secret_names(&self.secrets)?;

        let request = ExecRequest::bash(self.check_script())
            .with_package("dagger")
            .with_mount(repo, CHECK_MOUNT_PATH)
            .with_workdir(CHECK_MOUNT_PATH)
            .with_privileged_nesting();
        tracing::debug!(script = ?request.script(), "Running pre-flight check");

        let outcome = tokio::select! {
            () = cancel.cancelled() => return Err(Error::Cancelled),
            outcome = runner.run(&request) => outcome,
        };

        match outcome {
            Ok(outcome) if outcome.success() => {
                tracing::info!(pipeline = %self.command, "Pipeline check passed");
                Ok(())
            }
            Ok(outcome) => {
                let stderr = outcome.stderr.trim();
                let reason = if stderr.is_empty() {
                    format!("exit code {}", outcome.exit_code)
                } else {
                    format!("exit code {}: {stderr}", outcome.exit_code)
                };
                Err(Error::pipeline_invalid(&self.command, reason))
            }
            Err(err @ (Error::Cancelled | Error::Timeout { .. })) => Err(err),
            Err(err) => Err(Error::pipeline_invalid(&self.command, err.to_string())),
        }
    }

    /// Generate a workflow with the embedded scripts.
    ///
    /// The workflow has no triggers; they are filled in by the owning trigger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSecretName`] for a malformed secret name.
    pub fn as_workflow(&self) -> Result<Workflow> {
        self.as_workflow_with(&EmbeddedScripts)
    }

    /// Generate a workflow, reading step scripts from `scripts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSecretName`] for a malformed secret name and
    /// [`Error::ScriptUnavailable`] if `scripts` lacks a required script.
    pub fn as_workflow_with(&self, scripts: &dyn ScriptSource) -> Result<Workflow> {
        validate_secret_names(&self.secrets)?;

        let mut steps = vec![
            self.checkout_step(),
            self.install_dagger_step(scripts)?,
            self.warm_engine_step(scripts)?,
            self.call_dagger_step(scripts)?,
        ];
        if self.settings.stop_engine {
            steps.push(self.stop_engine_step(scripts)?);
        }
        tracing::debug!(pipeline = %self.name(), steps = steps.len(), "Compiled pipeline");

        let outputs = BTreeMap::from([
            (
                "stdout".to_string(),
                "${{ steps.exec.outputs.stdout }}".to_string(),
            ),
            (
                "stderr".to_string(),
                "${{ steps.exec.outputs.stderr }}".to_string(),
            ),
        ]);

        let mut jobs = IndexMap::new();
        jobs.insert(
            JOB_NAME.to_string(),
            Job {
                runs_on: self.settings.runner.clone(),
                steps,
                outputs,
            },
        );

        Ok(Workflow {
            name: self.command.clone(),
            on: WorkflowTriggers::default(),
            jobs,
        })
    }
}

/// Quote a value for `bash -c`
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
