//! Generates a blackbox (integration test) harness project for an existing
//! application.
//!
//! The harness is a project of its own: it carries the docker-compose file
//! that builds and runs the tested application, an env file with the port,
//! and `e2e`/`up`/`down` targets that drive the compose lifecycle. Mock
//! service generators later attach their services to this compose file.

use serde_json::json;

use crate::configs::project::ProjectConfiguration;
use crate::configs::workspace::workspace_layout;
use crate::documents::{self, Update};
use crate::generators::base::{node_application, NodeApplicationOptions};
use crate::generators::{parse_tags, project_location, GeneratorCallback};
use crate::registry::{
    ensure_project_exists, read_project_configuration, update_project_configuration,
};
use crate::templates::{common_template_vars, generate_files, TemplateFile};
use crate::tree::Tree;
use crate::types::RiggerResult;

const DEFAULT_PORT: u16 = 3333;

const BLACKBOX_FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "docker-compose.yaml__tmpl__",
        contents: include_str!("blackbox_project/files/docker-compose.yaml__tmpl__"),
    },
    TemplateFile {
        path: "blackbox.env__tmpl__",
        contents: include_str!("blackbox_project/files/blackbox.env__tmpl__"),
    },
    TemplateFile {
        path: "tests/blackbox.spec.ts__tmpl__",
        contents: include_str!("blackbox_project/files/tests/blackbox.spec.ts__tmpl__"),
    },
];

#[derive(Debug, Clone)]
pub struct BlackboxProjectOptions {
    /// Name of the tested project; must already exist
    pub project: String,
    /// Port the tested service is exposed on. Defaults to the conventional
    /// application port when not given.
    pub port: Option<u16>,
    pub name: Option<String>,
    pub directory: Option<String>,
    pub tags: Option<String>,
}

struct NormalizedOptions {
    project: String,
    project_name: String,
    project_root: String,
    port: u16,
    parsed_tags: Vec<String>,
}

fn normalize_options(
    tree: &Tree,
    options: &BlackboxProjectOptions,
) -> RiggerResult<NormalizedOptions> {
    let layout = workspace_layout(tree)?;
    let default_name = format!("{}-e2e", options.project);
    let name = options.name.as_deref().unwrap_or(&default_name);
    let location = project_location(&layout.apps_dir, name, options.directory.as_deref());

    Ok(NormalizedOptions {
        project: options.project.clone(),
        project_name: location.project_name,
        project_root: location.project_root,
        port: options.port.unwrap_or(DEFAULT_PORT),
        parsed_tags: parse_tags(options.tags.as_deref()),
    })
}

fn update_harness_project_config(
    tree: &mut Tree,
    normalized: &NormalizedOptions,
) -> RiggerResult<()> {
    let project_name = normalized.project_name.clone();
    let project_root = normalized.project_root.clone();
    let tested_project = normalized.project.clone();

    update_project_configuration(
        tree,
        &normalized.project_name,
        Update::modify(move |config: &mut ProjectConfiguration| {
            // The harness is never built or served on its own
            config.targets.remove("build");
            config.targets.remove("serve");

            config.implicit_dependencies = vec![tested_project];

            config.targets.insert(
                "e2e".to_string(),
                crate::configs::project::TargetConfiguration::new(
                    "rigger:run-commands",
                    json!({
                        "commands": [
                            format!("rigger run {project_name}:up"),
                            format!("rigger run {project_name}:test"),
                            format!("rigger run {project_name}:down"),
                        ],
                        "parallel": false,
                    }),
                ),
            );
            config.targets.insert(
                "up".to_string(),
                crate::configs::project::TargetConfiguration::new(
                    "rigger:run-commands",
                    json!({
                        "command": "docker-compose build && docker-compose up -d",
                        "cwd": project_root,
                    }),
                ),
            );
            config.targets.insert(
                "down".to_string(),
                crate::configs::project::TargetConfiguration::new(
                    "rigger:run-commands",
                    json!({
                        "command": "docker-compose down --remove-orphans",
                        "cwd": project_root,
                    }),
                ),
            );
        }),
    )?;
    Ok(())
}

fn add_files(tree: &mut Tree, normalized: &NormalizedOptions) -> RiggerResult<()> {
    let config = read_project_configuration(tree, &normalized.project_name)?;

    // The scaffolded application sources have no place in a harness project
    if let Some(source_root) = &config.source_root {
        tree.delete(source_root);
    }
    tree.delete(format!("{}/tsconfig.app.json", config.root));

    documents::update_json::<serde_json::Value>(
        tree,
        format!("{}/tsconfig.json", config.root),
        Update::modify(|tsconfig: &mut serde_json::Value| {
            if let Some(references) = tsconfig
                .get_mut("references")
                .and_then(serde_json::Value::as_array_mut)
            {
                references.retain(|reference| {
                    reference["path"]
                        .as_str()
                        .map_or(true, |path| !path.contains("tsconfig.app.json"))
                });
            }
        }),
    )?;

    let tested_config = read_project_configuration(tree, &normalized.project)?;

    let mut vars = common_template_vars(Some(&normalized.project_name), &config.root);
    vars.insert("project".to_string(), normalized.project.clone());
    vars.insert("testedProjectRoot".to_string(), tested_config.root);
    vars.insert("port".to_string(), normalized.port.to_string());

    generate_files(tree, BLACKBOX_FILES, &config.root, &vars)
}

pub async fn blackbox_project_generator(
    tree: &mut Tree,
    options: BlackboxProjectOptions,
) -> RiggerResult<GeneratorCallback> {
    ensure_project_exists(tree, &options.project)?;

    let normalized = normalize_options(tree, &options)?;

    let install_deps = node_application(
        tree,
        &NodeApplicationOptions {
            project_name: normalized.project_name.clone(),
            project_root: normalized.project_root.clone(),
            tags: normalized.parsed_tags.clone(),
        },
    )?;

    update_harness_project_config(tree, &normalized)?;
    add_files(tree, &normalized)?;

    Ok(install_deps)
}
