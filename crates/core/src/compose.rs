//! Mutation operations over docker-compose descriptors
//!
//! The mock-service generators edit the compose file of a blackbox harness
//! project: they add their own service block and wire it as a dependency of
//! the tested project's service. Every operation here is idempotent, so
//! re-running a generator never produces duplicate dependency edges or
//! duplicate service blocks.
//!
//! The service that represents the tested project is identified by the
//! `APP_NAME` build argument convention; at most one service carries it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::documents;
use crate::registry::read_project_configuration;
use crate::templates::{render, TemplateVars};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

/// Build argument that marks the service of the tested project
pub const APP_NAME_BUILD_ARG: &str = "APP_NAME";

const COMPOSE_FILE_CANDIDATES: [&str; 2] = ["docker-compose.yaml", "docker-compose.yml"];

/// A parsed docker-compose document. Keys this tool does not model are kept
/// in `extra` so they survive a read-modify-write cycle.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ComposeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, ComposeService>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ComposeService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<ComposeBuild>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ComposeBuild {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, serde_yaml::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The tested project name a service declares, if any
pub fn tested_project_name(service: &ComposeService) -> Option<&str> {
    service
        .build
        .as_ref()?
        .args
        .get(APP_NAME_BUILD_ARG)?
        .as_str()
}

/// Find the service representing the tested project
pub fn tested_project_service(spec: &ComposeSpec) -> Option<(&String, &ComposeService)> {
    spec.services
        .iter()
        .find(|(_, service)| tested_project_name(service).is_some())
}

pub fn tested_project_service_mut(spec: &mut ComposeSpec) -> Option<&mut ComposeService> {
    spec.services
        .values_mut()
        .find(|service| tested_project_name(service).is_some())
}

/// Add a dependency edge to a service. A no-op when already present, so
/// `depends_on` never contains duplicates.
pub fn add_depends_on(service: &mut ComposeService, dependency_name: &str) {
    if !service
        .depends_on
        .iter()
        .any(|existing| existing == dependency_name)
    {
        service.depends_on.push(dependency_name.to_string());
    }
}

/// Insert a service under `service_name` unless one already exists
pub fn add_service(spec: &mut ComposeSpec, service_name: &str, service: ComposeService) {
    if !spec.services.contains_key(service_name) {
        spec.services.insert(service_name.to_string(), service);
    }
}

/// Render a templated YAML service definition and insert it.
///
/// A silent no-op when the service already exists; the template is not even
/// rendered in that case, so re-running a generator cannot fail on it.
pub fn add_service_from_template(
    spec: &mut ComposeSpec,
    service_name: &str,
    template: &str,
    template_vars: &TemplateVars,
) -> RiggerResult<()> {
    if spec.services.contains_key(service_name) {
        return Ok(());
    }

    let rendered = render(template, template_vars)?;
    let service: ComposeService =
        serde_yaml::from_str(&rendered).map_err(|e| RiggerError::Parse {
            path: format!("{service_name} service definition"),
            message: e.to_string(),
        })?;

    spec.services.insert(service_name.to_string(), service);
    Ok(())
}

/// Locate the compose file of a project root, trying `.yaml` then `.yml`
pub fn compose_file_path(tree: &Tree, project_root: &str) -> RiggerResult<String> {
    COMPOSE_FILE_CANDIDATES
        .iter()
        .map(|file_name| format!("{project_root}/{file_name}"))
        .find(|path| tree.exists(path))
        .ok_or_else(|| {
            RiggerError::NotFound(format!(
                "docker-compose file in '{project_root}' (tried {})",
                COMPOSE_FILE_CANDIDATES.join(", ")
            ))
        })
}

/// Read the compose descriptor of a project's harness
pub fn read_compose(tree: &Tree, project_name: &str) -> RiggerResult<ComposeSpec> {
    let config = read_project_configuration(tree, project_name)?;
    let path = compose_file_path(tree, &config.root)?;
    documents::read_yaml(tree, path)
}

/// Read-modify-write the compose descriptor of a project's harness.
///
/// The updater may fail (for example when the descriptor has no tested-project
/// service); nothing is written in that case.
pub fn update_compose(
    tree: &mut Tree,
    project_name: &str,
    updater: impl FnOnce(&mut ComposeSpec) -> RiggerResult<()>,
) -> RiggerResult<()> {
    let config = read_project_configuration(tree, project_name)?;
    let path = compose_file_path(tree, &config.root)?;
    let mut spec: ComposeSpec = documents::read_yaml(tree, &path)?;
    updater(&mut spec)?;
    documents::write_yaml(tree, &path, &spec)
}
