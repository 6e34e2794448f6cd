//! Compile Dagger pipelines into GitHub Actions workflows.
//!
//! A [`Pipeline`] is one `dagger call` invocation plus the secrets, module
//! and runner it needs. Triggers ([`triggers`]) pair a pipeline with the
//! event that starts it, and [`Gha`] collects triggers and renders them all
//! into a [`WorkflowTree`] ready to be overlaid on the repository root.
//!
//! # Example
//!
//! ```ignore
//! use gha_core::Settings;
//! use gha_github::{Gha, PipelineSpec, PushTrigger};
//!
//! let gha = Gha::new(Settings::default()).on_push(
//!     PipelineSpec::new("build --source=.").with_secret("DOCKER_TOKEN"),
//!     PushTrigger { branches: vec!["main".to_string()], ..Default::default() },
//! )?;
//!
//! let tree = gha.config("")?;
//! tree.write_to(".")?;
//! ```

#![warn(missing_docs)]

pub mod gha;
pub mod pipeline;
pub mod tree;
pub mod triggers;
pub mod workflow;

pub use gha::{CheckOptions, Gha};
pub use pipeline::{Pipeline, PipelineSpec};
pub use tree::{WorkflowFile, WorkflowTree};
pub use triggers::{OnDispatch, OnIssueComment, OnPullRequest, OnPush, Trigger, TriggerKind};
pub use workflow::{
    IssueCommentTrigger, Job, JobStep, OutputFormat, PullRequestTrigger, PushTrigger, StepAction,
    Workflow, WorkflowDispatchTrigger, WorkflowInput, WorkflowTriggers,
};
