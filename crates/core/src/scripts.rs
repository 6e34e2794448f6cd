//! Shell scripts run by generated workflow steps.
//!
//! The bodies are compiled into the binary, so a generated workflow never
//! depends on files outside `.github/workflows/`.

use crate::{Error, Result};

/// Installs the dagger CLI, honouring `DAGGER_VERSION`
pub const INSTALL_DAGGER: &str = "install-dagger";
/// Starts the engine ahead of the real call
pub const WARM_ENGINE: &str = "warm-engine";
/// Runs `$COMMAND` and captures its output
pub const EXEC: &str = "exec";
/// Stops the engine container
pub const STOP_ENGINE: &str = "stop-engine";

const EMBEDDED: &[(&str, &str)] = &[
    (INSTALL_DAGGER, include_str!("../scripts/install-dagger.sh")),
    (WARM_ENGINE, include_str!("../scripts/warm-engine.sh")),
    (EXEC, include_str!("../scripts/exec.sh")),
    (STOP_ENGINE, include_str!("../scripts/stop-engine.sh")),
];

/// Source of script bodies, looked up by logical name
pub trait ScriptSource: Send + Sync {
    /// Body of the script named `id`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptUnavailable`] if no script has that name.
    fn script(&self, id: &str) -> Result<String>;
}

/// Scripts bundled with gha at compile time
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedScripts;

impl EmbeddedScripts {
    /// Logical names of all bundled scripts
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }
}

impl ScriptSource for EmbeddedScripts {
    fn script(&self, id: &str) -> Result<String> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, body)| (*body).to_string())
            .ok_or_else(|| Error::script_unavailable(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_resolve() {
        for name in EmbeddedScripts::names() {
            let body = EmbeddedScripts.script(name).unwrap();
            assert!(body.starts_with("#!/usr/bin/env bash"), "{name} has no shebang");
        }
    }

    #[test]
    fn test_unknown_script() {
        let err = EmbeddedScripts.script("deploy").unwrap_err();
        assert!(matches!(err, Error::ScriptUnavailable { name } if name == "deploy"));
    }

    #[test]
    fn test_exec_script_uses_command() {
        let body = EmbeddedScripts.script(EXEC).unwrap();
        assert!(body.contains("$COMMAND"));
        assert!(body.contains("GITHUB_OUTPUT"));
    }
}
