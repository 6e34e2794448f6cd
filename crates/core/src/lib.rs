//! Core types and utilities for gha.
//!
//! This crate holds everything the workflow compiler needs that is not
//! GitHub-specific:
//! - [`Error`] and [`Result`] shared by every gha crate
//! - [`Settings`], the process-wide configuration copied into each pipeline
//! - [`secrets`] secret name validation
//! - [`context`] the static table of GitHub context keys
//! - [`scripts`] the shell scripts embedded into generated steps
//! - [`runner`] the container execution port used by pre-flight checks

pub mod context;
pub mod error;
pub mod runner;
pub mod scripts;
pub mod secrets;
pub mod settings;

pub use error::{Error, Result};
pub use runner::{ContainerRunner, ExecOutcome, ExecRequest, Mount};
pub use scripts::{EmbeddedScripts, ScriptSource};
pub use settings::Settings;
