//! Events that start a pipeline.
//!
//! Each trigger owns one [`Pipeline`] and the conditions of its event. The
//! pipeline compiles the steps; the trigger supplies the `on:` section and
//! decides where the rendered file goes.

use crate::pipeline::Pipeline;
use crate::tree::WorkflowFile;
use crate::workflow::{
    IssueCommentTrigger, OutputFormat, PullRequestTrigger, PushTrigger, Workflow,
    WorkflowDispatchTrigger, WorkflowTriggers,
};
use gha_core::Result;
use std::fmt;
use std::path::PathBuf;

/// Directory generated workflows are written to, relative to the repository root
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// The kind of event a trigger reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriggerKind {
    /// `on: push`
    Push,
    /// `on: pull_request`
    PullRequest,
    /// `on: workflow_dispatch`
    Dispatch,
    /// `on: issue_comment`
    IssueComment,
}

impl TriggerKind {
    /// All kinds, in the order workflows are generated and checked
    pub const ALL: [Self; 4] = [
        Self::Push,
        Self::PullRequest,
        Self::Dispatch,
        Self::IssueComment,
    ];

    /// Discriminator used in generated filenames
    #[must_use]
    pub const fn discriminator(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pr",
            Self::Dispatch => "dispatch",
            Self::IssueComment => "issue-comment",
        }
    }

    /// Filename of the `index`-th (1-based) workflow of this kind
    #[must_use]
    pub fn filename(self, prefix: &str, index: usize, format: OutputFormat) -> String {
        format!(
            "{prefix}{}-{index}.{}",
            self.discriminator(),
            format.extension()
        )
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// A pipeline paired with the event that starts it
pub trait Trigger: Send + Sync {
    /// Kind of event
    fn kind(&self) -> TriggerKind;

    /// The pipeline this trigger runs
    fn pipeline(&self) -> &Pipeline;

    /// The `on:` section for this trigger
    fn on(&self) -> WorkflowTriggers;

    /// The complete workflow: compiled pipeline plus this trigger's `on:`
    ///
    /// # Errors
    ///
    /// Propagates compilation errors from [`Pipeline::as_workflow`].
    fn workflow(&self) -> Result<Workflow> {
        let mut workflow = self.pipeline().as_workflow()?;
        workflow.on = self.on();
        Ok(workflow)
    }

    /// Render this trigger's workflow into `.github/workflows/<filename>`
    ///
    /// # Errors
    ///
    /// Propagates compilation and serialization errors.
    fn config(&self, filename: &str, format: OutputFormat) -> Result<WorkflowFile> {
        let contents = format.render(&self.workflow()?)?;
        let path = PathBuf::from(WORKFLOWS_DIR).join(filename);
        tracing::debug!(kind = %self.kind(), path = %path.display(), "Rendered workflow");
        Ok(WorkflowFile { path, contents })
    }
}

/// Run a pipeline on push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnPush {
    /// Pipeline to run
    pub pipeline: Pipeline,
    /// Branch, tag and path filters
    pub trigger: PushTrigger,
}

impl Trigger for OnPush {
    fn kind(&self) -> TriggerKind {
        TriggerKind::Push
    }

    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn on(&self) -> WorkflowTriggers {
        WorkflowTriggers {
            push: Some(self.trigger.clone()),
            ..Default::default()
        }
    }
}

/// Run a pipeline on pull request activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnPullRequest {
    /// Pipeline to run
    pub pipeline: Pipeline,
    /// Branch, activity type and path filters
    pub trigger: PullRequestTrigger,
}

impl Trigger for OnPullRequest {
    fn kind(&self) -> TriggerKind {
        TriggerKind::PullRequest
    }

    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn on(&self) -> WorkflowTriggers {
        WorkflowTriggers {
            pull_request: Some(self.trigger.clone()),
            ..Default::default()
        }
    }
}

/// Run a pipeline manually
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDispatch {
    /// Pipeline to run
    pub pipeline: Pipeline,
    /// Dispatch inputs
    pub trigger: WorkflowDispatchTrigger,
}

impl Trigger for OnDispatch {
    fn kind(&self) -> TriggerKind {
        TriggerKind::Dispatch
    }

    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn on(&self) -> WorkflowTriggers {
        WorkflowTriggers {
            workflow_dispatch: Some(self.trigger.clone()),
            ..Default::default()
        }
    }
}

/// Run a pipeline when an issue or pull request is commented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnIssueComment {
    /// Pipeline to run
    pub pipeline: Pipeline,
    /// Comment activity types
    pub trigger: IssueCommentTrigger,
}

impl Trigger for OnIssueComment {
    fn kind(&self) -> TriggerKind {
        TriggerKind::IssueComment
    }

    fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn on(&self) -> WorkflowTriggers {
        WorkflowTriggers {
            issue_comment: Some(self.trigger.clone()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineSpec;
    use gha_core::Settings;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineSpec::new("build --source=."), &Settings::default()).unwrap()
    }

    #[test]
    fn test_filenames() {
        assert_eq!(TriggerKind::Push.filename("", 1, OutputFormat::Yaml), "push-1.yml");
        assert_eq!(TriggerKind::PullRequest.filename("ci-", 2, OutputFormat::Yaml), "ci-pr-2.yml");
        assert_eq!(
            TriggerKind::Dispatch.filename("", 3, OutputFormat::Json),
            "dispatch-3.json"
        );
        assert_eq!(
            TriggerKind::IssueComment.filename("x", 1, OutputFormat::Yaml),
            "xissue-comment-1.yml"
        );
    }

    #[test]
    fn test_push_workflow_has_push_trigger() {
        let trigger = OnPush {
            pipeline: pipeline(),
            trigger: PushTrigger {
                branches: vec!["main".to_string()],
                ..Default::default()
            },
        };
        let workflow = trigger.workflow().unwrap();
        assert_eq!(workflow.on.push, Some(trigger.trigger.clone()));
        assert!(workflow.on.pull_request.is_none());
        assert_eq!(workflow.jobs.len(), 1);
    }

    #[test]
    fn test_config_path_and_contents() {
        let trigger = OnIssueComment {
            pipeline: pipeline(),
            trigger: IssueCommentTrigger {
                types: vec!["created".to_string()],
            },
        };
        let file = trigger.config("issue-comment-1.yml", OutputFormat::Yaml).unwrap();
        assert_eq!(file.path, PathBuf::from(".github/workflows/issue-comment-1.yml"));

        let value: serde_yaml::Value = serde_yaml::from_str(&file.contents).unwrap();
        assert_eq!(value["on"]["issue_comment"]["types"][0], serde_yaml::Value::from("created"));
        assert_eq!(value["jobs"]["dagger"]["runs-on"], serde_yaml::Value::from("ubuntu-latest"));
    }

    #[test]
    fn test_dispatch_json() {
        let trigger = OnDispatch {
            pipeline: pipeline(),
            trigger: WorkflowDispatchTrigger::default(),
        };
        let file = trigger.config("dispatch-1.json", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(value["on"]["workflow_dispatch"], serde_json::json!({}));
        assert_eq!(value["name"], "build --source=.");
    }
}
