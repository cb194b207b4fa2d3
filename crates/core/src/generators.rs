//! Generator orchestrators
//!
//! Each generator is a linear pipeline over the workspace [`Tree`]: validate
//! preconditions, scaffold files, patch project and compose configuration,
//! render templates. Generators return deferred [`GeneratorCallback`]s instead
//! of installing packages themselves; the caller collects the callbacks from a
//! whole batch of generators and runs them once after the tree is flushed, so
//! several generators in one invocation trigger a single install pass each
//! rather than re-installing mid-mutation.

use std::path::Path;

use crate::documents;
use crate::execution::CommandRunner;
use crate::names::names;
use crate::tree::Tree;
use crate::types::RiggerResult;

pub mod application;
pub mod base;
pub mod blackbox_project;
pub mod oidc_server_mock;
pub mod openapi_library;
pub mod ports;
pub mod wiremock;

/// A deferred finalize action, invoked with the workspace root after all
/// staged mutations have been flushed to disk
pub type GeneratorCallback = Box<dyn FnOnce(&Path) -> RiggerResult<()> + Send>;

/// Run a batch of finalize callbacks in order
pub fn run_callbacks(callbacks: Vec<GeneratorCallback>, workspace_root: &Path) -> RiggerResult<()> {
    for callback in callbacks {
        callback(workspace_root)?;
    }
    Ok(())
}

/// A callback that installs workspace packages with the package manager
pub fn install_packages_callback() -> GeneratorCallback {
    Box::new(|workspace_root| {
        CommandRunner::new(workspace_root).run("npm", &["install".to_string()])
    })
}

/// Register dev dependencies in the root `package.json` and return the
/// install callback that makes them available.
pub fn add_dev_dependencies(
    tree: &mut Tree,
    dependencies: &[(&str, &str)],
) -> RiggerResult<GeneratorCallback> {
    let mut package_json: serde_json::Value = if tree.exists("package.json") {
        documents::read_json(tree, "package.json")?
    } else {
        serde_json::json!({})
    };

    let dev_dependencies = package_json
        .as_object_mut()
        .map(|root| {
            root.entry("devDependencies")
                .or_insert_with(|| serde_json::json!({}))
        })
        .and_then(serde_json::Value::as_object_mut);

    if let Some(dev_dependencies) = dev_dependencies {
        for (name, version) in dependencies {
            dev_dependencies.insert((*name).to_string(), serde_json::json!(version));
        }
    }

    documents::write_json(tree, "package.json", &package_json)?;
    Ok(install_packages_callback())
}

/// Where a generated project lands, derived from its name and optional
/// directory the way all generators agree on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Normalized (kebab-case) name
    pub name: String,
    /// Registry name; nested directories are flattened with dashes
    pub project_name: String,
    /// Directory of the project relative to the workspace root
    pub project_root: String,
    pub project_directory: String,
}

pub(crate) fn project_location(
    base_dir: &str,
    name: &str,
    directory: Option<&str>,
) -> ProjectLocation {
    let name = names(name).file_name;
    let project_directory = match directory {
        Some(directory) => format!("{}/{name}", names(directory).file_name),
        None => name.clone(),
    };
    let project_name = project_directory.replace('/', "-");
    let project_root = format!("{base_dir}/{project_directory}");

    ProjectLocation {
        name,
        project_name,
        project_root,
        project_directory,
    }
}

pub(crate) fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|tags| {
        tags.split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
