//! Workflow serialization.

use super::schema::Workflow;
use gha_core::{Error, Result, Settings};

/// Encoding of generated workflow files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML (default)
    #[default]
    Yaml,
    /// JSON, which GitHub also accepts since JSON is valid YAML
    Json,
}

impl OutputFormat {
    /// Format selected by the settings' `as_json` flag
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        if settings.as_json { Self::Json } else { Self::Yaml }
    }

    /// File extension without the leading dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yml",
            Self::Json => "json",
        }
    }

    /// Serialize a workflow in this format
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the workflow cannot be encoded.
    pub fn render(self, workflow: &Workflow) -> Result<String> {
        match self {
            Self::Yaml => serde_yaml::to_string(workflow).map_err(Error::serialization),
            Self::Json => serde_json::to_string_pretty(workflow)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(Error::serialization),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::schema::WorkflowTriggers;
    use indexmap::IndexMap;

    fn empty_workflow() -> Workflow {
        Workflow {
            name: "build".to_string(),
            on: WorkflowTriggers::default(),
            jobs: IndexMap::new(),
        }
    }

    #[test]
    fn test_format_from_settings() {
        assert_eq!(OutputFormat::from_settings(&Settings::default()), OutputFormat::Yaml);
        assert_eq!(
            OutputFormat::from_settings(&Settings::default().with_json()),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(OutputFormat::Yaml.extension(), "yml");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_render_yaml() {
        let yaml = OutputFormat::Yaml.render(&empty_workflow()).unwrap();
        assert!(yaml.starts_with("name: build\n"));
        assert!(yaml.ends_with("jobs: {}\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert!(value.get("on").is_some());
    }

    #[test]
    fn test_render_json_is_valid_yaml() {
        let json = OutputFormat::Json.render(&empty_workflow()).unwrap();
        assert!(json.ends_with("}\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&json).unwrap();
        assert_eq!(value["name"], serde_yaml::Value::from("build"));
    }
}
