//! The trigger registry and its fan-out operations.

use crate::pipeline::{Pipeline, PipelineSpec};
use crate::tree::WorkflowTree;
use crate::triggers::{OnDispatch, OnIssueComment, OnPullRequest, OnPush, Trigger, TriggerKind};
use crate::workflow::{
    IssueCommentTrigger, OutputFormat, PullRequestTrigger, PushTrigger, WorkflowDispatchTrigger,
};
use futures::{StreamExt, TryStreamExt, stream};
use gha_core::{ContainerRunner, Result, Settings};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Options for [`Gha::check`]
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Maximum number of pipelines checked at once (at least 1)
    pub concurrency: usize,
    /// Aborts in-flight checks when cancelled
    pub cancel: CancellationToken,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            cancel: CancellationToken::new(),
        }
    }
}

/// Manage GitHub Actions configurations with Dagger.
///
/// Triggers are kept per kind in registration order; that order decides the
/// numeric suffix of every generated filename, so it never changes once a
/// trigger is added.
#[derive(Debug, Clone, Default)]
pub struct Gha {
    push: Vec<OnPush>,
    pull_request: Vec<OnPullRequest>,
    dispatch: Vec<OnDispatch>,
    issue_comment: Vec<OnIssueComment>,
    settings: Settings,
}

/// A registered trigger and its position within its kind
#[derive(Clone, Copy)]
pub struct Registered<'a> {
    /// 1-based position within the trigger's kind
    pub index: usize,
    /// The trigger
    pub trigger: &'a dyn Trigger,
}

impl Gha {
    /// Create an empty registry with the given settings.
    ///
    /// Empty runner or Dagger version fields fall back to their defaults.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: settings.normalized(),
            ..Default::default()
        }
    }

    /// Global settings
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    fn pipeline(&self, spec: PipelineSpec) -> Result<Pipeline> {
        Pipeline::new(spec, &self.settings)
    }

    /// Add a pipeline triggered by push events
    ///
    /// # Errors
    ///
    /// Returns [`gha_core::Error::EmptyCommand`] if the command is blank.
    pub fn on_push(mut self, spec: PipelineSpec, trigger: PushTrigger) -> Result<Self> {
        let pipeline = self.pipeline(spec)?;
        self.push.push(OnPush { pipeline, trigger });
        Ok(self)
    }

    /// Add a pipeline triggered by pull request events
    ///
    /// # Errors
    ///
    /// Returns [`gha_core::Error::EmptyCommand`] if the command is blank.
    pub fn on_pull_request(mut self, spec: PipelineSpec, trigger: PullRequestTrigger) -> Result<Self> {
        let pipeline = self.pipeline(spec)?;
        self.pull_request.push(OnPullRequest { pipeline, trigger });
        Ok(self)
    }

    /// Add a manually dispatched pipeline
    ///
    /// # Errors
    ///
    /// Returns [`gha_core::Error::EmptyCommand`] if the command is blank.
    pub fn on_dispatch(mut self, spec: PipelineSpec, trigger: WorkflowDispatchTrigger) -> Result<Self> {
        let pipeline = self.pipeline(spec)?;
        self.dispatch.push(OnDispatch { pipeline, trigger });
        Ok(self)
    }

    /// Add a pipeline triggered by issue comments
    ///
    /// # Errors
    ///
    /// Returns [`gha_core::Error::EmptyCommand`] if the command is blank.
    pub fn on_issue_comment(
        mut self,
        spec: PipelineSpec,
        trigger: IssueCommentTrigger,
    ) -> Result<Self> {
        let pipeline = self.pipeline(spec)?;
        self.issue_comment.push(OnIssueComment { pipeline, trigger });
        Ok(self)
    }

    /// Registered triggers of one kind
    #[must_use]
    pub fn triggers_of(&self, kind: TriggerKind) -> Vec<&dyn Trigger> {
        fn erase<T: Trigger>(triggers: &[T]) -> Vec<&dyn Trigger> {
            triggers.iter().map(|t| t as &dyn Trigger).collect()
        }
        match kind {
            TriggerKind::Push => erase(&self.push),
            TriggerKind::PullRequest => erase(&self.pull_request),
            TriggerKind::Dispatch => erase(&self.dispatch),
            TriggerKind::IssueComment => erase(&self.issue_comment),
        }
    }

    /// All triggers: push, pull request, dispatch, then issue comment,
    /// each kind in registration order
    pub fn triggers(&self) -> impl Iterator<Item = Registered<'_>> {
        TriggerKind::ALL.into_iter().flat_map(move |kind| {
            self.triggers_of(kind)
                .into_iter()
                .enumerate()
                .map(|(i, trigger)| Registered {
                    index: i + 1,
                    trigger,
                })
        })
    }

    /// Total number of registered triggers
    #[must_use]
    pub fn len(&self) -> usize {
        self.push.len() + self.pull_request.len() + self.dispatch.len() + self.issue_comment.len()
    }

    /// Whether no trigger is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every pipeline against `repo`.
    ///
    /// Checks run `options.concurrency` at a time; the error returned is
    /// always the one of the first failing trigger in [`Gha::triggers`]
    /// order, unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first failing pipeline's error.
    #[tracing::instrument(
        name = "gha_check",
        fields(triggers = self.len(), concurrency = options.concurrency),
        skip(self, repo, runner, options)
    )]
    pub async fn check(
        &self,
        repo: &Path,
        runner: &dyn ContainerRunner,
        options: &CheckOptions,
    ) -> Result<()> {
        let cancel = &options.cancel;
        let checks = self.triggers().map(|registered| async move {
            let pipeline = registered.trigger.pipeline();
            tracing::info!(
                kind = %registered.trigger.kind(),
                index = registered.index,
                pipeline = %pipeline.command(),
                "Checking pipeline"
            );
            pipeline.check(repo, runner, cancel).await
        });

        stream::iter(checks)
            .buffered(options.concurrency.max(1))
            .try_for_each(|()| async { Ok(()) })
            .await
    }

    /// Generate a github config directory, usable as an overlay on the
    /// repository root.
    ///
    /// Files are named `<prefix><kind>-<index>.<yml|json>`.
    ///
    /// # Errors
    ///
    /// Returns compilation or serialization errors, and
    /// [`gha_core::Error::DuplicateFile`] if two triggers map to one file.
    pub fn config(&self, prefix: &str) -> Result<WorkflowTree> {
        let format = OutputFormat::from_settings(&self.settings);
        let mut tree = WorkflowTree::new();
        for registered in self.triggers() {
            let filename = registered
                .trigger
                .kind()
                .filename(prefix, registered.index, format);
            tree.insert(registered.trigger.config(&filename, format)?)?;
        }
        tracing::debug!(files = tree.len(), "Generated workflow tree");
        Ok(tree)
    }
}
