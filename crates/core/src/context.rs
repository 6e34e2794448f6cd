//! GitHub context keys mirrored into plain environment variables.
//!
//! Every key is available in a workflow as `${{ github.KEY }}`. The execute
//! step exports each one as `GITHUB_<KEY>` so scripts never need GitHub's
//! expression syntax.
//! See <https://docs.github.com/en/actions/writing-workflows/choosing-what-your-workflow-does/contexts#github-context>

/// A key of the `github` context and what it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextKey {
    /// Key as written in `${{ github.<key> }}`
    pub key: &'static str,
    /// Short description from the GitHub documentation
    pub description: &'static str,
}

impl ContextKey {
    /// Environment variable name the key is exported as (`GITHUB_<KEY>`)
    #[must_use]
    pub fn env_name(&self) -> String {
        format!("GITHUB_{}", self.key.to_uppercase())
    }

    /// Expression resolving to the key's value at runtime
    #[must_use]
    pub fn expression(&self) -> String {
        format!("${{{{ github.{} }}}}", self.key)
    }
}

const fn key(key: &'static str, description: &'static str) -> ContextKey {
    ContextKey { key, description }
}

/// All keys of the `github` context, in documentation order
pub const GITHUB_CONTEXT_KEYS: &[ContextKey] = &[
    key("action", "Name of the running action, or the id of a step"),
    key("action_path", "Path where an action is located (composite actions only)"),
    key("action_ref", "Ref of the action being executed"),
    key("action_repository", "Owner and repository name of the action being executed"),
    key("action_status", "Current result of the composite action"),
    key("actor", "User that triggered the initial workflow run"),
    key("actor_id", "Account ID of the user that triggered the initial run"),
    key("api_url", "URL of the GitHub REST API"),
    key("base_ref", "Target branch of the pull request"),
    key("env", "Path of the file that sets environment variables from workflow commands"),
    key("event_name", "Name of the event that triggered the workflow run"),
    key("event_path", "Path of the file holding the full event webhook payload"),
    key("graphql_url", "URL of the GitHub GraphQL API"),
    key("head_ref", "Source branch of the pull request"),
    key("job", "job_id of the current job"),
    key("path", "Path of the file that sets system PATH variables from workflow commands"),
    key("ref", "Fully-formed ref of the branch or tag that triggered the run"),
    key("ref_name", "Short ref name of the branch or tag that triggered the run"),
    key("ref_protected", "Whether branch protections are configured for the ref"),
    key("ref_type", "Type of ref that triggered the run: branch or tag"),
    key("repository", "Owner and repository name"),
    key("repository_id", "ID of the repository"),
    key("repository_owner", "Repository owner's username"),
    key("repository_owner_id", "Repository owner's account ID"),
    key("repositoryUrl", "Git URL of the repository"),
    key("retention_days", "Days workflow run logs and artifacts are kept"),
    key("run_id", "Unique number of each workflow run within a repository"),
    key("run_number", "Unique number of each run of a particular workflow"),
    key("run_attempt", "Unique number of each attempt of a particular workflow run"),
    key("secret_source", "Source of a secret used in a workflow"),
    key("server_url", "URL of the GitHub server"),
    key("sha", "Commit SHA that triggered the workflow"),
    key("token", "Token to authenticate on behalf of the installed GitHub App"),
    key("triggering_actor", "User that initiated the workflow run"),
    key("workflow", "Name of the workflow"),
    key("workflow_ref", "Ref path to the workflow"),
    key("workflow_sha", "Commit SHA of the workflow file"),
    key("workspace", "Default working directory on the runner for steps"),
];
