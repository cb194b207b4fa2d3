use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::documents;
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

/// Path of the project registry document at the workspace root
pub const WORKSPACE_FILE: &str = "workspace.json";

const DEFAULT_APPS_DIR: &str = "apps";
const DEFAULT_LIBS_DIR: &str = "libs";

fn default_version() -> u32 {
    2
}

/// The workspace-level registry: project name to project root directory
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfiguration {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub projects: BTreeMap<String, String>,
    /// Directory that application projects are generated under. Defaults to `apps`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps_dir: Option<String>,
    /// Directory that library projects are generated under. Defaults to `libs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libs_dir: Option<String>,
}

impl Default for WorkspaceConfiguration {
    fn default() -> Self {
        Self {
            version: default_version(),
            projects: BTreeMap::new(),
            apps_dir: None,
            libs_dir: None,
        }
    }
}

/// Where new application and library projects are placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub apps_dir: String,
    pub libs_dir: String,
}

/// Read the workspace registry, or an empty default when none exists yet
pub fn read_workspace_configuration(tree: &Tree) -> RiggerResult<WorkspaceConfiguration> {
    match documents::read_json(tree, WORKSPACE_FILE) {
        Ok(config) => Ok(config),
        Err(RiggerError::NotFound(_)) => Ok(WorkspaceConfiguration::default()),
        Err(e) => Err(e),
    }
}

pub fn workspace_layout(tree: &Tree) -> RiggerResult<WorkspaceLayout> {
    let config = read_workspace_configuration(tree)?;
    Ok(WorkspaceLayout {
        apps_dir: config
            .apps_dir
            .unwrap_or_else(|| DEFAULT_APPS_DIR.to_string()),
        libs_dir: config
            .libs_dir
            .unwrap_or_else(|| DEFAULT_LIBS_DIR.to_string()),
    })
}
