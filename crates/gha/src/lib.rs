//! gha: generate GitHub Actions workflows that run Dagger pipelines.
//!
//! The binary reads a trigger manifest (see [`manifest`]), then either
//! writes one workflow per trigger (`gha generate`) or dry-runs every
//! pipeline in a container (`gha check`).

pub mod cli;
pub mod commands;
pub mod logging;
pub mod manifest;

pub use cli::{Cli, CliError, Commands};
pub use manifest::Manifest;

use gha_dagger::DaggerRunner;

/// Run a parsed command line to completion
///
/// # Errors
///
/// Returns the command's error, categorized for exit code mapping.
#[tracing::instrument(name = "gha_run", skip(cli))]
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = cli.settings.to_settings();
    let gha = commands::load(&cli.manifest, settings)?;

    match cli.command {
        Commands::Generate {
            prefix,
            output,
            stdout,
        } => {
            if stdout {
                let mut out = std::io::stdout().lock();
                commands::generate_to(&gha, &prefix, &mut out)
            } else {
                commands::generate(&gha, &prefix, &output).map(|_| ())
            }
        }
        Commands::Check {
            repo,
            concurrency,
            timeout,
            base_image,
        } => {
            let runner = DaggerRunner::new(base_image);
            commands::check(&gha, &repo, &runner, concurrency, timeout).await
        }
    }
}
