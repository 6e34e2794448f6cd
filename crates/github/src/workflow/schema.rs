//! GitHub Actions Workflow Schema Types
//!
//! Defines the data structures for GitHub Actions workflow generation.
//! See: <https://docs.github.com/en/actions/using-workflows/workflow-syntax-for-github-actions>
//!
//! Every mapping is a `BTreeMap` (or an `IndexMap` for jobs) so that the same
//! workflow always serializes to the same bytes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A GitHub Actions workflow definition.
///
/// Represents the complete structure of a workflow file that can be committed
/// to `.github/workflows/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workflow {
    /// Workflow name displayed in GitHub UI
    pub name: String,

    /// Trigger configuration
    #[serde(rename = "on")]
    pub on: WorkflowTriggers,

    /// Job definitions (order preserved via `IndexMap`)
    pub jobs: IndexMap<String, Job>,
}

/// Workflow trigger configuration.
///
/// Defines when the workflow should run. A compiled pipeline leaves this
/// empty; the trigger that owns the pipeline fills in its own event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowTriggers {
    /// Trigger on push events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push: Option<PushTrigger>,

    /// Trigger on pull request events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestTrigger>,

    /// Manual trigger with optional inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_dispatch: Option<WorkflowDispatchTrigger>,

    /// Trigger on issue and pull request comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_comment: Option<IssueCommentTrigger>,
}

impl WorkflowTriggers {
    /// Whether no event is configured
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.push.is_none()
            && self.pull_request.is_none()
            && self.workflow_dispatch.is_none()
            && self.issue_comment.is_none()
    }
}

/// Push event trigger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PushTrigger {
    /// Branch patterns to trigger on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    /// Tag patterns to trigger on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Path patterns that must be matched to trigger
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

/// Pull request event trigger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PullRequestTrigger {
    /// Branch patterns to trigger on (target branches)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    /// Activity types to trigger on (e.g., "opened", "synchronize")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Path patterns that must be matched to trigger
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

/// Manual workflow dispatch trigger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowDispatchTrigger {
    /// Input parameters for manual trigger
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, WorkflowInput>,
}

/// Input definition for `workflow_dispatch` triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInput {
    /// Human-readable description of the input
    pub description: String,

    /// Whether the input is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Default value for the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Input type (string, boolean, choice, environment)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

/// Issue comment event trigger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCommentTrigger {
    /// Activity types to trigger on ("created", "edited", "deleted")
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// A job in a GitHub Actions workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    /// Runner label specifying where to run
    pub runs_on: String,

    /// Job steps (executed sequentially)
    pub steps: Vec<JobStep>,

    /// Job outputs, usually bound to step outputs
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

/// A step in a job.
///
/// What the step does is a [`StepAction`]: either an action reference or an
/// inline script, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStep {
    /// Step display name (shown in GitHub UI)
    pub name: String,

    /// Unique identifier for referencing step outputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Action reference or inline script
    #[serde(flatten)]
    pub action: StepAction,

    /// Step environment variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// What a step runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StepAction {
    /// A reusable action, e.g. `actions/checkout@v4`
    Uses {
        /// Action reference
        uses: String,
        /// Action inputs
        #[serde(rename = "with", skip_serializing_if = "BTreeMap::is_empty")]
        with: BTreeMap<String, String>,
    },
    /// An inline script
    Run {
        /// Shell used to run the script (e.g., "bash")
        shell: String,
        /// Script body
        run: String,
    },
}

impl JobStep {
    /// Create a step that uses an action
    pub fn uses(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            action: StepAction::Uses {
                uses: action.into(),
                with: BTreeMap::new(),
            },
            env: BTreeMap::new(),
        }
    }

    /// Create a step that runs a script with the given shell
    pub fn run(name: impl Into<String>, shell: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            action: StepAction::Run {
                shell: shell.into(),
                run: script.into(),
            },
            env: BTreeMap::new(),
        }
    }

    /// Set the step ID
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add an action input. Ignored for script steps.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let StepAction::Uses { with, .. } = &mut self.action {
            with.insert(key.into(), value.into());
        }
        self
    }

    /// Replace the step environment
    #[must_use]
    pub fn with_env_map(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Action inputs, empty for script steps
    #[must_use]
    pub fn inputs(&self) -> Option<&BTreeMap<String, String>> {
        match &self.action {
            StepAction::Uses { with, .. } => Some(with),
            StepAction::Run { .. } => None,
        }
    }

    /// Script body, `None` for action steps
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        match &self.action {
            StepAction::Run { run, .. } => Some(run),
            StepAction::Uses { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_builder() {
        let step = JobStep::uses("Checkout", "actions/checkout@v4")
            .with_input("fetch-depth", "2");

        assert_eq!(step.name, "Checkout");
        assert_eq!(
            step.action,
            StepAction::Uses {
                uses: "actions/checkout@v4".to_string(),
                with: BTreeMap::from([("fetch-depth".to_string(), "2".to_string())]),
            }
        );
        assert!(step.script().is_none());
    }

    #[test]
    fn test_with_input_ignored_on_script_step() {
        let step = JobStep::run("hello", "bash", "echo hi").with_input("ignored", "x");
        assert!(step.inputs().is_none());
        assert_eq!(step.script(), Some("echo hi"));
    }

    #[test]
    fn test_uses_step_serialization() {
        let step = JobStep::uses("Checkout", "actions/checkout@v4");
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert_eq!(yaml, "name: Checkout\nuses: actions/checkout@v4\n");
    }

    #[test]
    fn test_run_step_serialization() {
        let step = JobStep::run("scripts/exec.sh", "bash", "echo hi")
            .with_id("exec")
            .with_env_map(BTreeMap::from([("A".to_string(), "1".to_string())]));
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert_eq!(
            yaml,
            "name: scripts/exec.sh\nid: exec\nshell: bash\nrun: echo hi\nenv:\n  A: '1'\n"
        );
    }

    #[test]
    fn test_workflow_serialization() {
        let mut jobs = IndexMap::new();
        jobs.insert(
            "dagger".to_string(),
            Job {
                runs_on: "ubuntu-latest".to_string(),
                steps: vec![JobStep::uses("Checkout", "actions/checkout@v4")],
                outputs: BTreeMap::new(),
            },
        );
        let workflow = Workflow {
            name: "CI".to_string(),
            on: WorkflowTriggers {
                push: Some(PushTrigger {
                    branches: vec!["main".to_string()],
                    ..Default::default()
                }),
                ..Default::default()
            },
            jobs,
        };

        let yaml = serde_yaml::to_string(&workflow).unwrap();
        assert!(yaml.contains("name: CI"));
        assert!(yaml.contains("push:"));
        assert!(yaml.contains("- main"));
        assert!(yaml.contains("runs-on: ubuntu-latest"));
        assert!(!yaml.contains("outputs"));
    }

    #[test]
    fn test_empty_triggers() {
        let triggers = WorkflowTriggers::default();
        assert!(triggers.is_empty());
        assert_eq!(serde_yaml::to_string(&triggers).unwrap(), "{}\n");
    }

    #[test]
    fn test_dispatch_without_inputs_serializes_as_empty_map() {
        let triggers = WorkflowTriggers {
            workflow_dispatch: Some(WorkflowDispatchTrigger::default()),
            ..Default::default()
        };
        assert_eq!(
            serde_yaml::to_string(&triggers).unwrap(),
            "workflow_dispatch: {}\n"
        );
    }

    #[test]
    fn test_trigger_conditions_deserialize_with_defaults() {
        let push: PushTrigger = serde_yaml::from_str("branches: [main]").unwrap();
        assert_eq!(push.branches, vec!["main"]);
        assert!(push.tags.is_empty());

        let comment: IssueCommentTrigger = serde_yaml::from_str("{}").unwrap();
        assert!(comment.types.is_empty());
    }
}
