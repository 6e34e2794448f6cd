//! Command-line surface: argument parsing, error categories and exit codes.

use crate::logging::{LogLevel, TracingFormat};
use crate::manifest::DEFAULT_MANIFEST;
use clap::{Args, Parser, Subcommand};
use gha_core::Settings;
use gha_dagger::DEFAULT_BASE_IMAGE;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Invalid manifest, pipeline or secret (exit code 2)
pub const EXIT_CLI: i32 = 2;
/// Runner, IO or other unexpected failure (exit code 3)
pub const EXIT_RUNTIME: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Something the user declared is wrong (exit code 2)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(gha_core::Error),
    /// The environment failed us (exit code 3)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Runtime(gha_core::Error),
}

impl From<gha_core::Error> for CliError {
    fn from(err: gha_core::Error) -> Self {
        if err.is_user_error() {
            Self::Config(err)
        } else {
            Self::Runtime(err)
        }
    }
}

impl CliError {
    /// The underlying library error
    #[must_use]
    pub const fn inner(&self) -> &gha_core::Error {
        match self {
            Self::Config(err) | Self::Runtime(err) => err,
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config(_) => EXIT_CLI,
        CliError::Runtime(_) => EXIT_RUNTIME,
    }
}

/// Generate GitHub Actions workflows that run Dagger pipelines.
#[derive(Parser, Debug)]
#[command(name = "gha")]
#[command(about = "Generate GitHub Actions workflows that run Dagger pipelines")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Trigger manifest to load.
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "GHA_MANIFEST",
        default_value = DEFAULT_MANIFEST,
        help = "Path to the trigger manifest"
    )]
    pub manifest: PathBuf,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,

    /// Raw `EnvFilter` directive, e.g. `gha_github=trace,gha_dagger=debug`.
    #[arg(long, global = true, help = "Log filter directive overriding --level and RUST_LOG")]
    pub log_filter: Option<String>,

    /// Settings applied to every generated workflow.
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Flags mapped onto [`Settings`]
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Dagger Cloud public token
    #[arg(long, global = true, env = "DAGGER_PUBLIC_TOKEN", hide_env_values = true)]
    pub public_token: Option<String>,

    /// Dagger version to install in the CI runner
    #[arg(long, global = true, env = "GHA_DAGGER_VERSION")]
    pub dagger_version: Option<String>,

    /// Disable sending traces to Dagger Cloud
    #[arg(long, global = true)]
    pub no_traces: bool,

    /// Explicitly stop the Dagger Engine after completing the workflow
    #[arg(long, global = true)]
    pub stop_engine: bool,

    /// Encode workflow files as JSON instead of YAML
    #[arg(long, global = true)]
    pub as_json: bool,

    /// Default runner label for all workflows
    #[arg(long, global = true, env = "GHA_RUNNER")]
    pub runner: Option<String>,
}

impl SettingsArgs {
    /// Resolve into settings; missing or empty values fall back to defaults
    #[must_use]
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new();
        if let Some(token) = &self.public_token {
            settings = settings.with_public_token(token.clone());
        }
        if let Some(version) = &self.dagger_version {
            settings = settings.with_dagger_version(version.clone());
        }
        if let Some(runner) = &self.runner {
            settings = settings.with_runner(runner.clone());
        }
        if self.no_traces {
            settings = settings.without_traces();
        }
        if self.stop_engine {
            settings = settings.with_stop_engine();
        }
        if self.as_json {
            settings = settings.with_json();
        }
        settings
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one workflow file per declared trigger.
    #[command(about = "Generate workflow files from the manifest")]
    Generate {
        /// Prepended to every workflow filename
        #[arg(long, default_value = "")]
        prefix: String,

        /// Repository root; files land under .github/workflows
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,

        /// Print workflows to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Dry-run every pipeline against a local checkout.
    #[command(about = "Check that every pipeline resolves against the repository")]
    Check {
        /// Repository to mount into the check container
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Number of pipelines checked at once
        #[arg(long, short = 'j', default_value_t = 1)]
        concurrency: usize,

        /// Abort all checks after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Container image the checks start from (must provide apk)
        #[arg(long, default_value = DEFAULT_BASE_IMAGE)]
        base_image: String,
    },
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
