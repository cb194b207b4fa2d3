//! Generates a service application, wired for blackbox testing
//!
//! On top of the base node application scaffold this generator tags the
//! project as a service, turns on package.json generation and OpenAPI
//! introspection in the build, claims a free HTTP port, and by default also
//! generates the blackbox harness project and a publishable API client
//! library pointed at the service's OpenAPI document.

use serde_json::json;

use crate::configs::project::ProjectConfiguration;
use crate::configs::versions::DependencyVersions;
use crate::configs::workspace::workspace_layout;
use crate::documents::{append_lines, Update};
use crate::generators::base::{node_application, NodeApplicationOptions};
use crate::generators::blackbox_project::{blackbox_project_generator, BlackboxProjectOptions};
use crate::generators::openapi_library::{openapi_library_generator, OpenApiLibraryOptions};
use crate::generators::ports::set_next_available_port;
use crate::generators::{parse_tags, project_location, GeneratorCallback};
use crate::registry::{read_project_configuration, update_project_configuration};
use crate::templates::{common_template_vars, generate_files, TemplateFile};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

const APP_FILES: &[TemplateFile] = &[TemplateFile {
    path: "Dockerfile__tmpl__",
    contents: include_str!("application/files/app/Dockerfile__tmpl__"),
}];

const E2E_FILES: &[TemplateFile] = &[TemplateFile {
    path: "tests/open-api.e2e-spec.ts__tmpl__",
    contents: include_str!("application/files/e2e/tests/open-api.e2e-spec.ts__tmpl__"),
}];

const LINES_TO_REMOVE: [&str; 2] = [
    "const globalPrefix = 'api';",
    "app.setGlobalPrefix(globalPrefix);",
];

#[derive(Debug, Clone)]
pub struct ApplicationGeneratorOptions {
    pub name: String,
    pub directory: Option<String>,
    pub tags: Option<String>,
    /// Generate a blackbox harness project alongside the application.
    /// Defaults to true.
    pub blackbox_project: Option<bool>,
    /// Generate a publishable `<app>-client` OpenAPI client library
    pub openapi_client_library: bool,
}

struct NormalizedOptions {
    project_name: String,
    project_root: String,
    parsed_tags: Vec<String>,
    blackbox_project: bool,
    openapi_client_library: bool,
}

fn normalize_options(
    tree: &Tree,
    options: &ApplicationGeneratorOptions,
) -> RiggerResult<NormalizedOptions> {
    let layout = workspace_layout(tree)?;
    let location = project_location(&layout.apps_dir, &options.name, options.directory.as_deref());

    Ok(NormalizedOptions {
        project_name: location.project_name,
        project_root: location.project_root,
        parsed_tags: parse_tags(options.tags.as_deref()),
        blackbox_project: options.blackbox_project.unwrap_or(true),
        openapi_client_library: options.openapi_client_library,
    })
}

fn update_project_config(tree: &mut Tree, project_name: &str) -> RiggerResult<()> {
    update_project_configuration(
        tree,
        project_name,
        Update::modify(|config: &mut ProjectConfiguration| {
            config.tags.push("type:service".to_string());

            if let Some(build) = config.targets.get_mut("build") {
                build
                    .options
                    .insert("generatePackageJson".to_string(), json!(true));
                build.options.insert(
                    "tsPlugins".to_string(),
                    json!([{
                        "name": "@nestjs/swagger/plugin",
                        "options": { "introspectComments": true },
                    }]),
                );
            }
        }),
    )?;
    Ok(())
}

/// Rewrites the scaffolded entry point: the global `api` prefix is dropped in
/// favor of the OpenAPI document being the service's public face.
fn update_main_file(tree: &mut Tree, project_name: &str) -> RiggerResult<()> {
    let config = read_project_configuration(tree, project_name)?;
    let source_root = config.source_root.ok_or_else(|| {
        RiggerError::Validation(format!("project in '{}' has no source root", config.root))
    })?;

    let path = format!("{source_root}/main.ts");
    let content = tree.read_string(&path)?;
    let mut updated = content
        .lines()
        .filter(|line| {
            !LINES_TO_REMOVE
                .iter()
                .any(|removed| line.contains(removed))
        })
        .map(|line| line.replace("${port}/${globalPrefix}", "${port}/swagger"))
        .collect::<Vec<_>>()
        .join("\n");
    updated.push('\n');
    tree.write(path, updated);

    Ok(())
}

async fn generate_blackbox_project(
    tree: &mut Tree,
    normalized: &NormalizedOptions,
    port: u16,
) -> RiggerResult<GeneratorCallback> {
    let task = blackbox_project_generator(
        tree,
        BlackboxProjectOptions {
            project: normalized.project_name.clone(),
            port: Some(port),
            name: None,
            directory: None,
            tags: None,
        },
    )
    .await?;

    let harness_name = format!("{}-e2e", normalized.project_name);
    let harness_root = read_project_configuration(tree, &harness_name)?.root;

    let mut vars = common_template_vars(Some(&normalized.project_name), &harness_root);
    vars.insert("project".to_string(), normalized.project_name.clone());
    vars.insert("port".to_string(), port.to_string());
    generate_files(tree, E2E_FILES, &harness_root, &vars)?;

    Ok(task)
}

pub async fn application_generator(
    tree: &mut Tree,
    options: ApplicationGeneratorOptions,
    versions: &DependencyVersions,
) -> RiggerResult<Vec<GeneratorCallback>> {
    let normalized = normalize_options(tree, &options)?;
    let mut tasks: Vec<GeneratorCallback> = Vec::new();

    tasks.push(node_application(
        tree,
        &NodeApplicationOptions {
            project_name: normalized.project_name.clone(),
            project_root: normalized.project_root.clone(),
            tags: normalized.parsed_tags.clone(),
        },
    )?);

    update_project_config(tree, &normalized.project_name)?;

    let vars = common_template_vars(Some(&normalized.project_name), &normalized.project_root);
    generate_files(tree, APP_FILES, &normalized.project_root, &vars)?;

    append_lines(tree, ".dockerignore", &["node_modules"])?;
    append_lines(tree, ".gitignore", &[".npmrc", ".env"])?;

    let port = set_next_available_port(tree, &normalized.project_name)?;

    update_main_file(tree, &normalized.project_name)?;

    if normalized.blackbox_project {
        tasks.push(generate_blackbox_project(tree, &normalized, port).await?);
    }

    if normalized.openapi_client_library {
        let client_lib_name = format!("{}-client", normalized.project_name);
        tasks.extend(
            openapi_library_generator(
                tree,
                OpenApiLibraryOptions {
                    name: client_lib_name.clone(),
                    spec_url: format!("http://localhost:{port}/swagger-json"),
                    directory: None,
                    tags: Some("type:openapi-client".to_string()),
                    import_path: Some(format!("@riggerbuild/{client_lib_name}")),
                    publishable: true,
                },
                versions,
            )
            .await?,
        );
    }

    Ok(tasks)
}
