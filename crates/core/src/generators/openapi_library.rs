//! Generates a library that holds an API client generated from an OpenAPI
//! document.
//!
//! The library's sources are produced by its `generate-sources` target (see
//! the executor of the same name), not written at scaffold time; the generator
//! only wires that target up. When the library is publishable it also gets a
//! `publish` target that depends on its own build.

use serde_json::json;
use std::collections::BTreeMap;

use crate::configs::project::{ProjectConfiguration, TargetConfiguration, TargetDependency};
use crate::configs::versions::DependencyVersions;
use crate::configs::workspace::workspace_layout;
use crate::documents::{self, Update};
use crate::executors::generate_sources::GenerateSourcesOptions;
use crate::generators::base::{library, LibraryOptions};
use crate::generators::{add_dev_dependencies, parse_tags, project_location, GeneratorCallback};
use crate::registry::update_project_configuration;
use crate::templates::{generate_files, TemplateFile, TemplateVars};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

const OPENAPI_LIBRARY_FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "src/index.ts__tmpl__",
        contents: include_str!("openapi_library/files/src/index.ts__tmpl__"),
    },
    TemplateFile {
        path: ".openapi-generator-ignore__tmpl__",
        contents: include_str!("openapi_library/files/.openapi-generator-ignore__tmpl__"),
    },
];

#[derive(Debug, Clone)]
pub struct OpenApiLibraryOptions {
    pub name: String,
    /// URL of the OpenAPI document the client is generated from
    pub spec_url: String,
    pub directory: Option<String>,
    pub tags: Option<String>,
    pub import_path: Option<String>,
    pub publishable: bool,
}

fn default_generate_sources_options(
    source_root: &str,
    spec_url: &str,
) -> GenerateSourcesOptions {
    let additional_properties: BTreeMap<String, serde_json::Value> = [
        ("withInterfaces", json!(true)),
        ("supportsES6", json!(true)),
        ("typescriptThreePlus", json!(true)),
        ("useSingleRequestParameter", json!(true)),
        ("enumPropertyNaming", json!("original")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    GenerateSourcesOptions {
        output_path: format!("{source_root}/lib/generated"),
        generator: "typescript-fetch".to_string(),
        spec_url: spec_url.to_string(),
        additional_properties,
        global_properties: BTreeMap::new(),
        type_mappings: BTreeMap::new(),
    }
}

fn update_publishable_package_json(tree: &mut Tree, project_root: &str) -> RiggerResult<()> {
    let directory = project_root.to_string();
    documents::update_json::<serde_json::Value>(
        tree,
        format!("{project_root}/package.json"),
        Update::modify(move |package_json: &mut serde_json::Value| {
            package_json["repository"] = json!({
                "type": "git",
                "directory": directory,
            });
            package_json["publishConfig"] = json!({
                "access": "public",
                "registry": "https://registry.npmjs.org/",
            });
        }),
    )?;
    Ok(())
}

pub async fn openapi_library_generator(
    tree: &mut Tree,
    options: OpenApiLibraryOptions,
    versions: &DependencyVersions,
) -> RiggerResult<Vec<GeneratorCallback>> {
    let mut tasks: Vec<GeneratorCallback> = Vec::new();

    let layout = workspace_layout(tree)?;
    let location = project_location(&layout.libs_dir, &options.name, options.directory.as_deref());
    let import_path = options
        .import_path
        .clone()
        .unwrap_or_else(|| location.project_name.clone());

    tasks.push(library(
        tree,
        &LibraryOptions {
            project_name: location.project_name.clone(),
            project_root: location.project_root.clone(),
            import_path,
            tags: parse_tags(options.tags.as_deref()),
        },
    )?);

    let publishable = options.publishable;
    let spec_url = options.spec_url.clone();
    let config = update_project_configuration(
        tree,
        &location.project_name,
        Update::modify(move |config: &mut ProjectConfiguration| {
            let source_root = config
                .source_root
                .clone()
                .unwrap_or_else(|| format!("{}/src", config.root));

            if publishable {
                let output_path = config
                    .targets
                    .get("build")
                    .and_then(|build| build.options.get("outputPath"))
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                let mut publish = TargetConfiguration::new(
                    "rigger:run-commands",
                    json!({
                        "command": "npx -y can-npm-publish --verbose && npm publish",
                        "cwd": output_path,
                    }),
                );
                publish.depends_on = vec![TargetDependency {
                    target: "build".to_string(),
                    projects: "self".to_string(),
                }];
                config.targets.insert("publish".to_string(), publish);
            }

            let generate_options = default_generate_sources_options(&source_root, &spec_url);
            let mut generate_sources = TargetConfiguration::new(
                "rigger:generate-sources",
                serde_json::to_value(&generate_options).unwrap_or_default(),
            );
            generate_sources.outputs = vec!["{options.outputPath}".to_string()];
            config
                .targets
                .insert("generate-sources".to_string(), generate_sources);
        }),
    )?;

    if options.publishable {
        update_publishable_package_json(tree, &config.root)?;
    }

    tasks.push(add_dev_dependencies(
        tree,
        &[(
            "@openapitools/openapi-generator-cli",
            &versions.openapi_generator_cli,
        )],
    )?);

    // Replace the stub sources with an entry point for the generated client
    let source_root = config
        .source_root
        .ok_or_else(|| RiggerError::Validation(format!("project in '{}' has no source root", config.root)))?;
    tree.delete(source_root);
    generate_files(
        tree,
        OPENAPI_LIBRARY_FILES,
        &config.root,
        &TemplateVars::new(),
    )?;

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::read_project_configuration;

    fn options() -> OpenApiLibraryOptions {
        OpenApiLibraryOptions {
            name: "demo-client".to_string(),
            spec_url: "http://localhost:3333/swagger-json".to_string(),
            directory: None,
            tags: Some("type:openapi-client".to_string()),
            import_path: Some("@riggerbuild/demo-client".to_string()),
            publishable: true,
        }
    }

    #[tokio::test]
    async fn wires_up_the_generate_sources_target() {
        let mut tree = Tree::new("/virtual-workspace");
        openapi_library_generator(&mut tree, options(), &DependencyVersions::default())
            .await
            .unwrap();

        let config = read_project_configuration(&tree, "demo-client").unwrap();
        let target = &config.targets["generate-sources"];
        assert_eq!(target.executor, "rigger:generate-sources");
        assert_eq!(target.outputs, vec!["{options.outputPath}"]);
        assert_eq!(
            target.options["outputPath"],
            "libs/demo-client/src/lib/generated"
        );
        assert_eq!(target.options["generator"], "typescript-fetch");
        assert_eq!(
            target.options["specUrl"],
            "http://localhost:3333/swagger-json"
        );
        assert_eq!(
            target.options["additionalProperties"]["withInterfaces"],
            serde_json::json!(true)
        );
    }

    #[tokio::test]
    async fn publishable_library_gets_a_publish_target() {
        let mut tree = Tree::new("/virtual-workspace");
        openapi_library_generator(&mut tree, options(), &DependencyVersions::default())
            .await
            .unwrap();

        let config = read_project_configuration(&tree, "demo-client").unwrap();
        let publish = &config.targets["publish"];
        assert_eq!(publish.executor, "rigger:run-commands");
        assert_eq!(publish.options["cwd"], "dist/libs/demo-client");
        assert_eq!(publish.depends_on[0].target, "build");
        assert_eq!(publish.depends_on[0].projects, "self");
    }

    #[tokio::test]
    async fn non_publishable_library_has_no_publish_target() {
        let mut tree = Tree::new("/virtual-workspace");
        openapi_library_generator(
            &mut tree,
            OpenApiLibraryOptions {
                publishable: false,
                ..options()
            },
            &DependencyVersions::default(),
        )
        .await
        .unwrap();

        let config = read_project_configuration(&tree, "demo-client").unwrap();
        assert!(!config.targets.contains_key("publish"));
    }

    #[tokio::test]
    async fn package_json_is_prepared_for_publishing() {
        let mut tree = Tree::new("/virtual-workspace");
        openapi_library_generator(&mut tree, options(), &DependencyVersions::default())
            .await
            .unwrap();

        let package_json: serde_json::Value =
            documents::read_json(&tree, "libs/demo-client/package.json").unwrap();
        assert_eq!(package_json["name"], "@riggerbuild/demo-client");
        assert_eq!(package_json["publishConfig"]["access"], "public");
        assert_eq!(package_json["repository"]["directory"], "libs/demo-client");
    }

    #[tokio::test]
    async fn replaces_stub_sources_with_the_client_entry_point() {
        let mut tree = Tree::new("/virtual-workspace");
        openapi_library_generator(&mut tree, options(), &DependencyVersions::default())
            .await
            .unwrap();

        let index = tree.read_string("libs/demo-client/src/index.ts").unwrap();
        assert!(index.contains("./lib/generated"));

        let dev_deps: serde_json::Value = documents::read_json(&tree, "package.json").unwrap();
        assert_eq!(
            dev_deps["devDependencies"]["@openapitools/openapi-generator-cli"],
            DependencyVersions::default().openapi_generator_cli
        );
    }
}
