use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A project's build/task metadata, stored at `<root>/project.json`
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub targets: BTreeMap<String, TargetConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implicit_dependencies: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Application,
    Library,
}

/// A single named target: which executor runs it, with what options
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfiguration {
    pub executor: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<TargetDependency>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetDependency {
    pub target: String,
    /// Either a project name, or `self` for the target's own project
    pub projects: String,
}

impl TargetConfiguration {
    pub fn new(executor: impl Into<String>, options: serde_json::Value) -> Self {
        let options = match options {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            executor: executor.into(),
            options,
            outputs: Vec::new(),
            depends_on: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case_and_skips_empty_fields() {
        let config = ProjectConfiguration {
            name: Some("demo".into()),
            root: "apps/demo".into(),
            source_root: Some("apps/demo/src".into()),
            project_type: Some(ProjectType::Application),
            ..Default::default()
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "demo",
                "root": "apps/demo",
                "sourceRoot": "apps/demo/src",
                "projectType": "application",
            })
        );
    }

    #[test]
    fn target_dependency_round_trips() {
        let target = TargetConfiguration {
            executor: "rigger:run-commands".into(),
            depends_on: vec![TargetDependency {
                target: "build".into(),
                projects: "self".into(),
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&target).unwrap();
        assert_eq!(value["dependsOn"][0]["target"], "build");

        let back: TargetConfiguration = serde_json::from_value(value).unwrap();
        assert_eq!(back, target);
    }
}
