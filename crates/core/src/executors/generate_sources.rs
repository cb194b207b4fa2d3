//! Generates API client sources from an OpenAPI document
//!
//! Invokes the OpenAPI generator CLI with flags assembled from the target's
//! options, then formats the generated output. The options live in the
//! library's `generate-sources` target, written by the openapi-library
//! generator.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::execution::CommandRunner;
use crate::types::RiggerResult;

/// Options of a `rigger:generate-sources` target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSourcesOptions {
    pub output_path: String,
    /// Generator identifier understood by the OpenAPI generator CLI,
    /// e.g. `typescript-fetch`
    pub generator: String,
    pub spec_url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub global_properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_mappings: BTreeMap<String, serde_json::Value>,
}

/// Outcome reported back to the build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorResult {
    pub success: bool,
}

/// Render a property bag as the `key=value,key=value` form the CLI expects
pub fn parse_properties(properties: &BTreeMap<String, serde_json::Value>) -> String {
    properties
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn properties_flag(flag: &str, properties: &BTreeMap<String, serde_json::Value>) -> Vec<String> {
    if properties.is_empty() {
        return Vec::new();
    }
    vec![flag.to_string(), parse_properties(properties)]
}

/// The full argument list passed to the OpenAPI generator CLI
pub fn generator_args(options: &GenerateSourcesOptions) -> Vec<String> {
    let mut args = vec![
        "generate".to_string(),
        "-i".to_string(),
        options.spec_url.clone(),
        "-g".to_string(),
        options.generator.clone(),
        "-o".to_string(),
        options.output_path.clone(),
    ];
    args.extend(properties_flag(
        "--additional-properties",
        &options.additional_properties,
    ));
    args.extend(properties_flag("--type-mappings", &options.type_mappings));
    args.extend(properties_flag(
        "--global-property",
        &options.global_properties,
    ));
    args
}

fn run_generator(options: &GenerateSourcesOptions, workspace_root: &Path) -> RiggerResult<()> {
    let runner = CommandRunner::new(workspace_root);

    let mut args = vec!["openapi-generator-cli".to_string()];
    args.extend(generator_args(options));
    runner.run("npx", &args)?;

    runner.run(
        "npx",
        &[
            "prettier".to_string(),
            "--write".to_string(),
            options.output_path.clone(),
        ],
    )
}

/// Run source generation for a project. External command failures are caught
/// here and reported as an unsuccessful result, never an error.
pub async fn generate_sources_executor(
    options: &GenerateSourcesOptions,
    workspace_root: &Path,
    project_name: &str,
) -> ExecutorResult {
    match run_generator(options, workspace_root) {
        Ok(()) => ExecutorResult { success: true },
        Err(e) => {
            eprintln!(
                "{} generating sources for {}: {e}",
                "error".red().bold(),
                project_name.bold()
            );
            ExecutorResult { success: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn properties(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parse_properties_renders_scalars_unquoted() {
        let rendered = parse_properties(&properties(&[
            ("supportsES6", json!(true)),
            ("enumPropertyNaming", json!("original")),
            ("maxDepth", json!(3)),
        ]));
        assert_eq!(
            rendered,
            "enumPropertyNaming=original,maxDepth=3,supportsES6=true"
        );
    }

    #[test]
    fn generator_args_contains_required_flags() {
        let options = GenerateSourcesOptions {
            output_path: "libs/demo-client/src/lib/generated".into(),
            generator: "typescript-fetch".into(),
            spec_url: "http://localhost:3333/swagger-json".into(),
            additional_properties: properties(&[("withInterfaces", json!(true))]),
            ..Default::default()
        };

        let args = generator_args(&options);
        assert_eq!(args[0], "generate");
        assert!(args
            .windows(2)
            .any(|pair| pair[0] == "-i" && pair[1] == "http://localhost:3333/swagger-json"));
        assert!(args
            .windows(2)
            .any(|pair| pair[0] == "-g" && pair[1] == "typescript-fetch"));
        assert!(args.contains(&"--additional-properties".to_string()));
        assert!(args.contains(&"withInterfaces=true".to_string()));
        assert!(!args.contains(&"--type-mappings".to_string()));
    }

    #[tokio::test]
    async fn failing_command_reports_unsuccessful_result() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = GenerateSourcesOptions {
            output_path: "out".into(),
            // An executable that cannot exist makes the command fail fast
            generator: "noop".into(),
            spec_url: "http://localhost:1/spec.json".into(),
            ..Default::default()
        };

        // Point PATH at an empty directory so npx cannot be found
        let original_path = std::env::var_os("PATH");
        std::env::set_var("PATH", temp_dir.path());
        let result = generate_sources_executor(&options, temp_dir.path(), "demo-client").await;
        if let Some(path) = original_path {
            std::env::set_var("PATH", path);
        }

        assert_eq!(result, ExecutorResult { success: false });
    }
}
