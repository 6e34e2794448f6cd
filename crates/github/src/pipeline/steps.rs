//! Step builders for compiled pipelines.

use super::Pipeline;
use crate::workflow::JobStep;
use gha_core::context::GITHUB_CONTEXT_KEYS;
use gha_core::{Result, ScriptSource, scripts};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Environment variable read by the dagger CLI for the Dagger Cloud token
pub const CLOUD_TOKEN_ENV: &str = "DAGGER_CLOUD_TOKEN";

/// Name older engines read the Dagger Cloud token from
pub const CLOUD_TOKEN_LEGACY_ENV: &str = "_EXPERIMENTAL_DAGGER_CLOUD_TOKEN";

/// Paths always added to a sparse checkout so local modules resolve.
///
/// FIXME: this is only a guess; the `source` field of `dagger.json` is the
/// real answer.
pub const SPARSE_CHECKOUT_DISCOVERY_PATHS: [&str; 4] = ["dagger.json", ".dagger", "dagger", "ci"];

impl Pipeline {
    pub(super) fn checkout_step(&self) -> JobStep {
        let step = JobStep::uses("Checkout", "actions/checkout@v4");
        match &self.sparse_checkout {
            Some(paths) => {
                let paths: Vec<&str> = paths
                    .iter()
                    .map(String::as_str)
                    .chain(SPARSE_CHECKOUT_DISCOVERY_PATHS)
                    .collect();
                step.with_input("sparse-checkout", paths.join("\n"))
            }
            None => step,
        }
    }

    pub(super) fn install_dagger_step(&self, scripts: &dyn ScriptSource) -> Result<JobStep> {
        let env = BTreeMap::from([(
            "DAGGER_VERSION".to_string(),
            self.settings.dagger_version.clone(),
        )]);
        bash_step(scripts, scripts::INSTALL_DAGGER, env)
    }

    pub(super) fn warm_engine_step(&self, scripts: &dyn ScriptSource) -> Result<JobStep> {
        bash_step(scripts, scripts::WARM_ENGINE, BTreeMap::new())
    }

    pub(super) fn call_dagger_step(&self, scripts: &dyn ScriptSource) -> Result<JobStep> {
        bash_step(scripts, scripts::EXEC, self.exec_env())
    }

    pub(super) fn stop_engine_step(&self, scripts: &dyn ScriptSource) -> Result<JobStep> {
        bash_step(scripts, scripts::STOP_ENGINE, BTreeMap::new())
    }

    /// Environment of the step running the dagger command
    pub(super) fn exec_env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        insert_env(&mut env, "COMMAND", format!("dagger call -q {}", self.command));

        for secret in &self.secrets {
            insert_env(&mut env, secret, format!("${{{{ secrets.{secret} }}}}"));
        }

        if let Some(module) = &self.module {
            insert_env(&mut env, "DAGGER_MODULE", module.clone());
        }

        if !self.settings.no_traces {
            let token = self.settings.public_token.clone().unwrap_or_else(|| {
                format!("${{{{ secrets.{CLOUD_TOKEN_ENV} }}}}")
            });
            insert_env(&mut env, CLOUD_TOKEN_ENV, token.clone());
            // For backwards compatibility with older engines
            insert_env(&mut env, CLOUD_TOKEN_LEGACY_ENV, token);
        }

        // github.ref becomes $GITHUB_REF, etc.
        for key in GITHUB_CONTEXT_KEYS {
            insert_env(&mut env, &key.env_name(), key.expression());
        }

        env
    }
}

/// Insert an environment variable unless the name is already taken.
///
/// The first value wins; a conflicting later value is dropped with a warning.
fn insert_env(env: &mut BTreeMap<String, String>, key: &str, value: String) {
    match env.entry(key.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(existing) => {
            if *existing.get() != value {
                tracing::warn!(
                    key = %existing.key(),
                    kept = %existing.get(),
                    dropped = %value,
                    "Environment variable already set, keeping the first value"
                );
            }
        }
    }
}

/// A step running the embedded script `scripts/<id>.sh` with bash
fn bash_step(
    scripts: &dyn ScriptSource,
    id: &str,
    env: BTreeMap<String, String>,
) -> Result<JobStep> {
    let script = scripts.script(id)?;
    Ok(JobStep::run(format!("scripts/{id}.sh"), "bash", script)
        .with_id(id)
        .with_env_map(env))
}
