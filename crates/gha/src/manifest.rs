//! Trigger manifest: the YAML file listing which pipelines run on which events.
//!
//! ```yaml
//! push:
//!   - command: build --source=.
//!     branches: [main]
//!     secrets: [DOCKER_TOKEN]
//! pull_request:
//!   - command: test
//!     types: [opened, synchronize]
//!     sparse-checkout: [src]
//! dispatch:
//!   - command: deploy
//!     runner: self-hosted
//! issue_comment:
//!   - command: review
//!     types: [created]
//! ```

use gha_core::{Error, Result, Settings};
use gha_github::{
    Gha, IssueCommentTrigger, PipelineSpec, PullRequestTrigger, PushTrigger,
    WorkflowDispatchTrigger,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Default manifest location, relative to the working directory
pub const DEFAULT_MANIFEST: &str = "gha.yaml";

/// A pipeline and the conditions of its event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry<T> {
    /// The pipeline
    #[serde(flatten)]
    pub pipeline: PipelineSpec,
    /// Event conditions
    #[serde(flatten)]
    pub on: T,
    /// Keys claimed by neither of the above; must stay empty
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
}

fn reject_unknown_keys<T>(path: &Path, section: &str, entries: &[Entry<T>]) -> Result<()> {
    for (position, entry) in entries.iter().enumerate() {
        if let Some(key) = entry.unknown.keys().next() {
            return Err(Error::manifest(
                path,
                format!("{section}[{position}]: unknown key `{key}`"),
            ));
        }
    }
    Ok(())
}

/// All triggers declared in a manifest, per kind, in file order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Pipelines run on push
    pub push: Vec<Entry<PushTrigger>>,
    /// Pipelines run on pull request activity
    pub pull_request: Vec<Entry<PullRequestTrigger>>,
    /// Manually dispatched pipelines
    pub dispatch: Vec<Entry<WorkflowDispatchTrigger>>,
    /// Pipelines run on issue comments
    pub issue_comment: Vec<Entry<IssueCommentTrigger>>,
}

impl Manifest {
    /// Parse a manifest from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the text is not a valid manifest or
    /// an entry carries a key no pipeline or trigger understands.
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let manifest: Self =
            serde_yaml::from_str(contents).map_err(|e| Error::manifest(path, e.to_string()))?;
        reject_unknown_keys(path, "push", &manifest.push)?;
        reject_unknown_keys(path, "pull_request", &manifest.pull_request)?;
        reject_unknown_keys(path, "dispatch", &manifest.dispatch)?;
        reject_unknown_keys(path, "issue_comment", &manifest.issue_comment)?;
        Ok(manifest)
    }

    /// Read and parse the manifest at `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::manifest(path, format!("cannot read file: {e}")))?;
        let manifest = Self::parse(path, &contents)?;
        tracing::debug!(
            path = %path.display(),
            triggers = manifest.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Number of declared triggers
    #[must_use]
    pub fn len(&self) -> usize {
        self.push.len() + self.pull_request.len() + self.dispatch.len() + self.issue_comment.len()
    }

    /// Whether the manifest declares no trigger
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every trigger, in manifest order
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCommand`] if an entry has no command.
    pub fn into_gha(self, settings: Settings) -> Result<Gha> {
        let mut gha = Gha::new(settings);
        for entry in self.push {
            gha = gha.on_push(entry.pipeline, entry.on)?;
        }
        for entry in self.pull_request {
            gha = gha.on_pull_request(entry.pipeline, entry.on)?;
        }
        for entry in self.dispatch {
            gha = gha.on_dispatch(entry.pipeline, entry.on)?;
        }
        for entry in self.issue_comment {
            gha = gha.on_issue_comment(entry.pipeline, entry.on)?;
        }
        Ok(gha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gha_github::TriggerKind;

    const EXAMPLE: &str = r"
push:
  - command: build --source=.
    branches: [main]
    secrets: [DOCKER_TOKEN]
  - command: test
    tags: ['v*']
pull_request:
  - command: lint
    types: [opened, synchronize]
    sparse-checkout: [src]
dispatch:
  - command: deploy
    runner: self-hosted
    module: ./ci
    inputs:
      environment:
        description: Target environment
        required: true
issue_comment:
  - command: review
    types: [created]
";

    fn parse(contents: &str) -> Result<Manifest> {
        Manifest::parse(Path::new("gha.yaml"), contents)
    }

    #[test]
    fn test_parse_example() {
        let manifest = parse(EXAMPLE).unwrap();
        assert_eq!(manifest.len(), 5);

        let build = &manifest.push[0];
        assert_eq!(build.pipeline.command, "build --source=.");
        assert_eq!(build.pipeline.secrets, vec!["DOCKER_TOKEN"]);
        assert_eq!(build.on.branches, vec!["main"]);
        assert_eq!(manifest.push[1].on.tags, vec!["v*"]);

        let lint = &manifest.pull_request[0];
        assert_eq!(lint.pipeline.sparse_checkout, Some(vec!["src".to_string()]));
        assert_eq!(lint.on.types, vec!["opened", "synchronize"]);

        let deploy = &manifest.dispatch[0];
        assert_eq!(deploy.pipeline.runner.as_deref(), Some("self-hosted"));
        assert_eq!(deploy.pipeline.module.as_deref(), Some("./ci"));
        assert_eq!(deploy.on.inputs["environment"].required, Some(true));

        assert_eq!(manifest.issue_comment[0].on.types, vec!["created"]);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = parse("{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse("schedule: []").unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }

    #[test]
    fn test_misspelt_key_rejected() {
        let err = parse("push:\n  - command: build\n    secret: [TOKEN]\n").unwrap_err();
        match err {
            Error::Manifest { message, .. } => {
                assert_eq!(message, "push[0]: unknown key `secret`");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_key_of_other_trigger_kind_rejected() {
        // `tags` is a push condition, not an issue comment one
        let err = parse("issue_comment:\n  - command: review\n    tags: [v1]\n").unwrap_err();
        assert!(matches!(err, Error::Manifest { message, .. } if message.contains("`tags`")));
    }

    #[test]
    fn test_empty_sparse_checkout_is_kept() {
        let manifest = parse("push:\n  - command: build\n    sparse-checkout: []\n").unwrap();
        assert_eq!(manifest.push[0].pipeline.sparse_checkout, Some(vec![]));
    }

    #[test]
    fn test_into_gha_keeps_order() {
        let gha = parse(EXAMPLE)
            .unwrap()
            .into_gha(Settings::default())
            .unwrap();
        let kinds: Vec<_> = gha.triggers().map(|r| (r.trigger.kind(), r.index)).collect();
        assert_eq!(
            kinds,
            vec![
                (TriggerKind::Push, 1),
                (TriggerKind::Push, 2),
                (TriggerKind::PullRequest, 1),
                (TriggerKind::Dispatch, 1),
                (TriggerKind::IssueComment, 1),
            ]
        );
    }

    #[test]
    fn test_missing_command_rejected() {
        let err = parse("push:\n  - branches: [main]\n")
            .unwrap()
            .into_gha(Settings::default())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCommand));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/gha.yaml")).unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }
}
