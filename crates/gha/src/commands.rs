//! Subcommand implementations.

use crate::cli::CliError;
use crate::manifest::Manifest;
use gha_core::{ContainerRunner, Error, Settings};
use gha_github::{CheckOptions, Gha, WorkflowTree};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Load the manifest and register its triggers
///
/// # Errors
///
/// Returns a config error if the manifest is unreadable or declares an
/// empty pipeline.
pub fn load(manifest: &Path, settings: Settings) -> Result<Gha, CliError> {
    let gha = Manifest::load(manifest)?.into_gha(settings)?;
    if gha.is_empty() {
        tracing::warn!(manifest = %manifest.display(), "Manifest declares no triggers");
    }
    Ok(gha)
}

/// Render every workflow and write them below `output`
///
/// # Errors
///
/// Returns compilation, serialization or filesystem errors.
#[tracing::instrument(name = "gha_generate", skip(gha, output), fields(output = %output.display()))]
pub fn generate(gha: &Gha, prefix: &str, output: &Path) -> Result<Vec<PathBuf>, CliError> {
    let tree = gha.config(prefix)?;
    let written = tree.write_to(output)?;
    tracing::info!(files = written.len(), "Workflows written");
    Ok(written)
}

/// Render every workflow into `out`, each preceded by a path comment
///
/// # Errors
///
/// Returns compilation or serialization errors, or IO errors from `out`.
pub fn generate_to(gha: &Gha, prefix: &str, out: &mut impl Write) -> Result<(), CliError> {
    let tree = gha.config(prefix)?;
    write_tree(&tree, out).map_err(Error::from)?;
    Ok(())
}

fn write_tree(tree: &WorkflowTree, out: &mut impl Write) -> std::io::Result<()> {
    for (path, contents) in tree.iter() {
        writeln!(out, "# {}", path.display())?;
        out.write_all(contents.as_bytes())?;
    }
    out.flush()
}

/// Check every pipeline against `repo`, honouring Ctrl-C and an optional
/// time budget.
///
/// # Errors
///
/// Returns the first failing pipeline's error, [`Error::Cancelled`] on
/// interrupt or [`Error::Timeout`] once the budget is spent.
pub async fn check(
    gha: &Gha,
    repo: &Path,
    runner: &dyn ContainerRunner,
    concurrency: usize,
    timeout: Option<u64>,
) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let signals = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT, cancelling checks");
            interrupt.cancel();
        }
    });

    let options = CheckOptions {
        concurrency,
        cancel: cancel.clone(),
    };
    let result = run_check(gha, repo, runner, &options, timeout).await;
    signals.abort();
    result?;

    tracing::info!(pipelines = gha.len(), runner = runner.name(), "All pipelines passed");
    Ok(())
}

async fn run_check(
    gha: &Gha,
    repo: &Path,
    runner: &dyn ContainerRunner,
    options: &CheckOptions,
    timeout: Option<u64>,
) -> gha_core::Result<()> {
    let Some(seconds) = timeout else {
        return gha.check(repo, runner, options).await;
    };
    match tokio::time::timeout(Duration::from_secs(seconds), gha.check(repo, runner, options))
        .await
    {
        Ok(result) => result,
        Err(_) => {
            options.cancel.cancel();
            Err(Error::Timeout { seconds })
        }
    }
}
