//! gha CLI entry point

// The entry point reports errors on stderr
#![allow(clippy::print_stderr)]

use gha::cli::{self, EXIT_OK, exit_code_for};
use gha::logging::{TracingConfig, init_tracing};
use miette::Report;

/// Exit code for SIGINT (128 + signal number 2)
const EXIT_SIGINT: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = cli::parse();

    let config = TracingConfig {
        format: cli.log_format,
        level: cli.level,
        filter: cli.log_filter.clone(),
    };
    if let Err(err) = init_tracing(config) {
        eprintln!("{err:?}");
        std::process::exit(cli::EXIT_RUNTIME);
    }

    let code = match gha::run(cli).await {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let code = if matches!(err.inner(), gha_core::Error::Cancelled) {
                EXIT_SIGINT
            } else {
                exit_code_for(&err)
            };
            eprintln!("{:?}", Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
