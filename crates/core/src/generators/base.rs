//! Base project scaffolding primitives
//!
//! The higher-level generators delegate here for the raw project structure:
//! a registered configuration plus the minimal file set of a node application
//! or a buildable library. Framework-specific patches are applied on top by
//! the callers.

use serde_json::json;

use crate::configs::project::{ProjectConfiguration, ProjectType, TargetConfiguration};
use crate::generators::{install_packages_callback, GeneratorCallback};
use crate::registry::add_project_configuration;
use crate::templates::{common_template_vars, generate_files, TemplateFile};
use crate::tree::Tree;
use crate::types::RiggerResult;

const NODE_APP_FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "src/main.ts__tmpl__",
        contents: include_str!("base/files/node/src/main.ts__tmpl__"),
    },
    TemplateFile {
        path: "src/app/app.module.ts__tmpl__",
        contents: include_str!("base/files/node/src/app/app.module.ts__tmpl__"),
    },
    TemplateFile {
        path: "tsconfig.json__tmpl__",
        contents: include_str!("base/files/node/tsconfig.json__tmpl__"),
    },
    TemplateFile {
        path: "tsconfig.app.json__tmpl__",
        contents: include_str!("base/files/node/tsconfig.app.json__tmpl__"),
    },
    TemplateFile {
        path: "tsconfig.spec.json__tmpl__",
        contents: include_str!("base/files/node/tsconfig.spec.json__tmpl__"),
    },
];

const LIBRARY_FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "src/index.ts__tmpl__",
        contents: include_str!("base/files/library/src/index.ts__tmpl__"),
    },
    TemplateFile {
        path: "package.json__tmpl__",
        contents: include_str!("base/files/library/package.json__tmpl__"),
    },
    TemplateFile {
        path: "tsconfig.json__tmpl__",
        contents: include_str!("base/files/library/tsconfig.json__tmpl__"),
    },
];

pub struct NodeApplicationOptions {
    pub project_name: String,
    pub project_root: String,
    pub tags: Vec<String>,
}

/// Scaffold a plain node application project and register it
pub fn node_application(
    tree: &mut Tree,
    options: &NodeApplicationOptions,
) -> RiggerResult<GeneratorCallback> {
    let root = &options.project_root;
    let source_root = format!("{root}/src");

    let mut config = ProjectConfiguration {
        name: Some(options.project_name.clone()),
        root: root.clone(),
        source_root: Some(source_root.clone()),
        project_type: Some(ProjectType::Application),
        tags: options.tags.clone(),
        ..Default::default()
    };

    config.targets.insert(
        "build".to_string(),
        TargetConfiguration::new(
            "rigger:node-build",
            json!({
                "outputPath": format!("dist/{root}"),
                "main": format!("{source_root}/main.ts"),
                "tsConfig": format!("{root}/tsconfig.app.json"),
            }),
        ),
    );
    config.targets.insert(
        "serve".to_string(),
        TargetConfiguration::new(
            "rigger:node-serve",
            json!({ "buildTarget": format!("{}:build", options.project_name) }),
        ),
    );
    config.targets.insert(
        "test".to_string(),
        TargetConfiguration::new(
            "rigger:jest",
            json!({ "passWithNoTests": true }),
        ),
    );

    add_project_configuration(tree, &options.project_name, &config)?;

    let vars = common_template_vars(Some(&options.project_name), root);
    generate_files(tree, NODE_APP_FILES, root, &vars)?;

    Ok(install_packages_callback())
}

pub struct LibraryOptions {
    pub project_name: String,
    pub project_root: String,
    pub import_path: String,
    pub tags: Vec<String>,
}

/// Scaffold a buildable library project and register it
pub fn library(tree: &mut Tree, options: &LibraryOptions) -> RiggerResult<GeneratorCallback> {
    let root = &options.project_root;
    let source_root = format!("{root}/src");

    let mut config = ProjectConfiguration {
        name: Some(options.project_name.clone()),
        root: root.clone(),
        source_root: Some(source_root),
        project_type: Some(ProjectType::Library),
        tags: options.tags.clone(),
        ..Default::default()
    };

    config.targets.insert(
        "build".to_string(),
        TargetConfiguration::new(
            "rigger:tsc",
            json!({
                "outputPath": format!("dist/{root}"),
                "main": format!("{root}/src/index.ts"),
                "tsConfig": format!("{root}/tsconfig.json"),
            }),
        ),
    );

    add_project_configuration(tree, &options.project_name, &config)?;

    let mut vars = common_template_vars(Some(&options.project_name), root);
    vars.insert("importPath".to_string(), options.import_path.clone());
    generate_files(tree, LIBRARY_FILES, root, &vars)?;

    Ok(install_packages_callback())
}
