//! Dagger runner for gha pre-flight checks
//!
//! This crate provides the [`DaggerRunner`], a [`ContainerRunner`] that runs
//! each request in a fresh Wolfi container through the Dagger SDK.

use async_trait::async_trait;
use gha_core::{ContainerRunner, Error, ExecOutcome, ExecRequest, Result};
use dagger_sdk::{Config, ContainerWithExecOptsBuilder, ReturnType, connect_opts};
use std::sync::{Arc, Mutex};

type DaggerReport = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Base image used when none is configured
pub const DEFAULT_BASE_IMAGE: &str = "cgr.dev/chainguard/wolfi-base:latest";

/// Dagger runner - executes check commands inside containers using Dagger
#[derive(Debug, Clone)]
pub struct DaggerRunner {
    base_image: String,
}

impl Default for DaggerRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IMAGE)
    }
}

impl DaggerRunner {
    /// Create a runner building on `base_image`, which must provide `apk`
    pub fn new(base_image: impl Into<String>) -> Self {
        Self {
            base_image: base_image.into(),
        }
    }

    /// Base image every container starts from
    #[must_use]
    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    /// Command installing the request's packages, if any
    fn install_command(request: &ExecRequest) -> Option<Vec<String>> {
        if request.packages.is_empty() {
            return None;
        }
        let mut command = vec!["apk".to_string(), "add".to_string(), "--no-cache".to_string()];
        command.extend(request.packages.iter().cloned());
        Some(command)
    }
}

#[async_trait]
impl ContainerRunner for DaggerRunner {
    #[tracing::instrument(name = "dagger_run", skip(self, request), fields(image = %self.base_image))]
    async fn run(&self, request: &ExecRequest) -> Result<ExecOutcome> {
        if request.args.is_empty() {
            return Err(Error::runner("container command must not be empty"));
        }

        let image = self.base_image.clone();
        let install = Self::install_command(request);
        let mounts: Vec<(String, String)> = request
            .mounts
            .iter()
            .map(|m| (m.target.clone(), m.source.to_string_lossy().to_string()))
            .collect();
        let workdir = request.workdir.clone();
        let args = request.args.clone();
        let privileged_nesting = request.privileged_nesting;

        // Result store: (exit_code, stdout, stderr)
        type ResultType = (i32, String, String);
        let result_store: Arc<Mutex<Option<std::result::Result<ResultType, DaggerReport>>>> =
            Arc::new(Mutex::new(None));
        let result_store_clone = result_store.clone();

        let cfg = Config::default();

        connect_opts(cfg, move |client| {
            let result_store = result_store_clone.clone();

            async move {
                let mut container = client.container().from(image);

                if let Some(install) = install {
                    container = container.with_exec(install);
                }

                for (target, source) in &mounts {
                    let host_dir = client.host().directory(source.clone());
                    container = container.with_mounted_directory(target, host_dir);
                }

                container = container.with_workdir(workdir);

                let opts = ContainerWithExecOptsBuilder::default()
                    .experimental_privileged_nesting(privileged_nesting)
                    .expect(ReturnType::Any)
                    .build();
                let opts = match opts {
                    Ok(opts) => opts,
                    Err(e) => {
                        if let Ok(mut guard) = result_store.lock() {
                            *guard = Some(Err(e.into()));
                        }
                        return Ok(());
                    }
                };

                // Execute command
                let exec = container.with_exec_opts(args, opts);

                // Get results
                let stdout_res = exec.stdout().await;
                let stderr_res = exec.stderr().await;
                let exit_code_res = exec.exit_code().await;

                let res = match (stdout_res, stderr_res, exit_code_res) {
                    (Ok(stdout), Ok(stderr), Ok(exit_code)) => {
                        Ok((exit_code as i32, stdout, stderr))
                    }
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e.into()),
                };

                if let Ok(mut guard) = result_store.lock() {
                    *guard = Some(res);
                }
                Ok(())
            }
        })
        .await
        .map_err(|err| Error::runner(format!("Dagger session failed: {err}")))?;

        // Extract result
        let mut guard = result_store
            .lock()
            .map_err(|_| Error::runner("Failed to acquire lock on check result"))?;

        let inner_result = guard
            .take()
            .ok_or_else(|| Error::runner("Check completed but produced no result"))?;

        let (exit_code, stdout, stderr) = inner_result
            .map_err(|e: DaggerReport| Error::runner(format!("Dagger execution failed: {e}")))?;

        tracing::debug!(exit_code, "Container command finished");

        Ok(ExecOutcome {
            exit_code,
            stdout,
            stderr,
        })
    }

    fn name(&self) -> &'static str {
        "dagger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_image() {
        let runner = DaggerRunner::default();
        assert_eq!(runner.base_image(), DEFAULT_BASE_IMAGE);
    }

    #[test]
    fn test_custom_base_image() {
        let runner = DaggerRunner::new("registry.example.com/wolfi:1");
        assert_eq!(runner.base_image(), "registry.example.com/wolfi:1");
    }

    #[test]
    fn test_runner_name() {
        assert_eq!(DaggerRunner::default().name(), "dagger");
    }

    #[test]
    fn test_install_command() {
        let request = ExecRequest::bash("true").with_package("dagger");
        assert_eq!(
            DaggerRunner::install_command(&request),
            Some(vec![
                "apk".to_string(),
                "add".to_string(),
                "--no-cache".to_string(),
                "bash".to_string(),
                "dagger".to_string(),
            ])
        );
    }

    #[test]
    fn test_no_install_without_packages() {
        let mut request = ExecRequest::bash("true");
        request.packages.clear();
        assert_eq!(DaggerRunner::install_command(&request), None);
    }

    #[tokio::test]
    async fn test_empty_command_rejected_before_connecting() {
        let mut request = ExecRequest::bash("true");
        request.args.clear();
        let err = DaggerRunner::default().run(&request).await.unwrap_err();
        assert!(matches!(err, Error::Runner(_)));
    }
}
