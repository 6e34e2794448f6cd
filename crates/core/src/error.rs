//! Error types shared by all gha crates.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for gha operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A declared secret name cannot be referenced from a workflow
    #[error("invalid secret name: '{name}' must contain only alphanumeric characters and underscores")]
    #[diagnostic(
        code(gha::secrets::invalid_name),
        help("GitHub secret names are restricted to [A-Za-z0-9_]")
    )]
    InvalidSecretName {
        /// The offending secret name, verbatim
        name: String,
    },

    /// The pre-flight dry run of a pipeline failed
    #[error("pipeline '{pipeline}' is invalid: {reason}")]
    #[diagnostic(
        code(gha::pipeline::invalid),
        help("Run the same 'dagger call ... --help' locally to reproduce")
    )]
    PipelineInvalid {
        /// Command of the failing pipeline
        pipeline: String,
        /// Underlying exit status or execution error
        reason: String,
    },

    /// A script bundled with gha could not be found
    #[error("embedded script '{name}' is unavailable")]
    #[diagnostic(
        code(gha::scripts::unavailable),
        help("This is a packaging defect, please report it")
    )]
    ScriptUnavailable {
        /// Logical script name
        name: String,
    },

    /// A pipeline was declared without a command
    #[error("pipeline command must not be empty")]
    #[diagnostic(code(gha::pipeline::empty_command))]
    EmptyCommand,

    /// Two rendered workflows resolved to the same path
    #[error("duplicate workflow file: {}", path.display())]
    #[diagnostic(code(gha::config::duplicate_file))]
    DuplicateFile {
        /// Path of the colliding file
        path: Box<Path>,
    },

    /// YAML/JSON serialization failed
    #[error("serialization failed: {0}")]
    #[diagnostic(code(gha::config::serialization))]
    Serialization(String),

    /// The trigger manifest could not be loaded
    #[error("invalid manifest {}: {message}", path.display())]
    #[diagnostic(code(gha::manifest::invalid))]
    Manifest {
        /// Manifest location
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The container runner itself failed (connection, image build)
    #[error("container runner failed: {0}")]
    #[diagnostic(code(gha::runner::failed))]
    Runner(String),

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    #[diagnostic(code(gha::cancelled))]
    Cancelled,

    /// The operation exceeded its time budget
    #[error("timeout after {seconds} seconds")]
    #[diagnostic(code(gha::timeout))]
    Timeout {
        /// Configured budget
        seconds: u64,
    },

    /// Filesystem error
    #[error("IO error: {0}")]
    #[diagnostic(code(gha::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid secret name error
    pub fn invalid_secret_name(name: impl Into<String>) -> Self {
        Self::InvalidSecretName { name: name.into() }
    }

    /// Create a pipeline validation error
    pub fn pipeline_invalid(pipeline: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PipelineInvalid {
            pipeline: pipeline.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing script error
    pub fn script_unavailable(name: impl Into<String>) -> Self {
        Self::ScriptUnavailable { name: name.into() }
    }

    /// Create a duplicate file error
    pub fn duplicate_file(path: &Path) -> Self {
        Self::DuplicateFile { path: path.into() }
    }

    /// Create a serialization error
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Create a manifest error
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a runner error
    pub fn runner(msg: impl Into<String>) -> Self {
        Self::Runner(msg.into())
    }

    /// Whether the error is caused by user configuration rather than the environment
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSecretName { .. }
                | Self::PipelineInvalid { .. }
                | Self::EmptyCommand
                | Self::DuplicateFile { .. }
                | Self::Manifest { .. }
        )
    }
}

/// Result type alias for gha operations
pub type Result<T> = std::result::Result<T, Error>;
