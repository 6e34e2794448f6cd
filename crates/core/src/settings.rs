//! Process-wide settings applied to every generated workflow.

/// Runner label used when none is configured
pub const DEFAULT_RUNNER: &str = "ubuntu-latest";

/// Dagger version installed by generated workflows when none is configured
pub const DEFAULT_DAGGER_VERSION: &str = "latest";

/// Settings resolved once at startup.
///
/// Each pipeline receives its own copy; only `runner` may differ per pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Public Dagger Cloud token, safe to commit (never a private token)
    pub public_token: Option<String>,
    /// Dagger version to install in the CI runner
    pub dagger_version: String,
    /// Disable sending traces to Dagger Cloud
    pub no_traces: bool,
    /// Explicitly stop the Dagger Engine after the pipeline
    pub stop_engine: bool,
    /// Encode workflow files as JSON (which is also valid YAML)
    pub as_json: bool,
    /// Default runner label for all workflows
    pub runner: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public_token: None,
            dagger_version: DEFAULT_DAGGER_VERSION.to_string(),
            no_traces: false,
            stop_engine: false,
            as_json: false,
            runner: DEFAULT_RUNNER.to_string(),
        }
    }
}

impl Settings {
    /// Create default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the public Dagger Cloud token. An empty token means "none".
    #[must_use]
    pub fn with_public_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.public_token = (!token.is_empty()).then_some(token);
        self
    }

    /// Set the Dagger version. An empty version falls back to the default.
    #[must_use]
    pub fn with_dagger_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.dagger_version = if version.is_empty() {
            DEFAULT_DAGGER_VERSION.to_string()
        } else {
            version
        };
        self
    }

    /// Set the default runner. An empty label falls back to the default.
    #[must_use]
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        let runner = runner.into();
        self.runner = if runner.is_empty() {
            DEFAULT_RUNNER.to_string()
        } else {
            runner
        };
        self
    }

    /// Disable Dagger Cloud traces
    #[must_use]
    pub const fn without_traces(mut self) -> Self {
        self.no_traces = true;
        self
    }

    /// Stop the engine at the end of every workflow
    #[must_use]
    pub const fn with_stop_engine(mut self) -> Self {
        self.stop_engine = true;
        self
    }

    /// Render workflows as JSON instead of YAML
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.as_json = true;
        self
    }

    /// Replace empty fields set directly on the struct with their defaults
    #[must_use]
    pub fn normalized(self) -> Self {
        let token = self.public_token.clone().unwrap_or_default();
        let runner = self.runner.clone();
        let version = self.dagger_version.clone();
        self.with_runner(runner)
            .with_dagger_version(version)
            .with_public_token(token)
    }

    /// Copy of these settings with a per-pipeline runner override.
    ///
    /// `None` or an empty label keeps the current runner, which is never
    /// empty in the copy.
    #[must_use]
    pub fn for_runner(&self, runner: Option<&str>) -> Self {
        let mut settings = self.clone().normalized();
        if let Some(runner) = runner.filter(|r| !r.is_empty()) {
            settings.runner = runner.to_string();
        }
        settings
    }
}
