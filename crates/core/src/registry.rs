//! Project registry: read-modify-write access to project configurations
//!
//! Projects are registered by name in the root `workspace.json`; each entry
//! points at a project directory whose `project.json` holds the
//! [`ProjectConfiguration`]. Reading an unregistered name fails with
//! [`RiggerError::ProjectNotFound`] before anything is written.

use std::collections::BTreeMap;

use crate::configs::project::ProjectConfiguration;
use crate::configs::workspace::{read_workspace_configuration, WORKSPACE_FILE};
use crate::documents::{self, Update};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

const PROJECT_FILE: &str = "project.json";

fn project_file_path(root: &str) -> String {
    format!("{root}/{PROJECT_FILE}")
}

/// Read the configuration of a registered project
pub fn read_project_configuration(
    tree: &Tree,
    project_name: &str,
) -> RiggerResult<ProjectConfiguration> {
    let workspace = read_workspace_configuration(tree)?;
    let root = workspace
        .projects
        .get(project_name)
        .ok_or_else(|| RiggerError::ProjectNotFound(project_name.to_string()))?;

    let mut config: ProjectConfiguration =
        match documents::read_json(tree, project_file_path(root)) {
            Ok(config) => config,
            Err(RiggerError::NotFound(_)) => {
                return Err(RiggerError::ProjectNotFound(project_name.to_string()))
            }
            Err(e) => return Err(e),
        };

    config.name.get_or_insert_with(|| project_name.to_string());
    Ok(config)
}

/// Fail fast when a project referenced by name does not exist
pub fn ensure_project_exists(tree: &Tree, project_name: &str) -> RiggerResult<()> {
    read_project_configuration(tree, project_name).map(|_| ())
}

/// Register a new project and write its configuration
pub fn add_project_configuration(
    tree: &mut Tree,
    project_name: &str,
    config: &ProjectConfiguration,
) -> RiggerResult<()> {
    let mut workspace = read_workspace_configuration(tree)?;
    workspace
        .projects
        .insert(project_name.to_string(), config.root.clone());
    documents::write_json(tree, WORKSPACE_FILE, &workspace)?;
    documents::write_json(tree, project_file_path(&config.root), config)
}

/// Read-modify-write a project configuration, returning the final value
pub fn update_project_configuration(
    tree: &mut Tree,
    project_name: &str,
    update: Update<'_, ProjectConfiguration>,
) -> RiggerResult<ProjectConfiguration> {
    let mut config = read_project_configuration(tree, project_name)?;
    update.apply(&mut config);
    documents::write_json(tree, project_file_path(&config.root), &config)?;
    Ok(config)
}

/// All registered projects, by name
pub fn get_projects(tree: &Tree) -> RiggerResult<BTreeMap<String, ProjectConfiguration>> {
    let workspace = read_workspace_configuration(tree)?;
    let mut projects = BTreeMap::new();
    for name in workspace.projects.keys() {
        projects.insert(name.clone(), read_project_configuration(tree, name)?);
    }
    Ok(projects)
}

/// Read a file relative to a project's source root
pub fn read_file_from_source(
    tree: &Tree,
    config: &ProjectConfiguration,
    relative_path: &str,
) -> RiggerResult<String> {
    let source_root = config.source_root.as_ref().ok_or_else(|| {
        RiggerError::Validation(format!("project in '{}' has no source root", config.root))
    })?;
    tree.read_string(format!("{source_root}/{relative_path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::project::ProjectType;

    fn demo_config(root: &str) -> ProjectConfiguration {
        ProjectConfiguration {
            root: root.to_string(),
            source_root: Some(format!("{root}/src")),
            project_type: Some(ProjectType::Application),
            ..Default::default()
        }
    }

    #[test]
    fn reading_unknown_project_fails_with_project_not_found() {
        let tree = Tree::new("/virtual-workspace");
        let err = read_project_configuration(&tree, "ghost").unwrap_err();
        assert!(matches!(err, RiggerError::ProjectNotFound(name) if name == "ghost"));
    }

    #[test]
    fn updating_unknown_project_stages_no_write() {
        let mut tree = Tree::new("/virtual-workspace");
        let result = update_project_configuration(
            &mut tree,
            "ghost",
            Update::modify(|config: &mut ProjectConfiguration| config.tags.push("nope".into())),
        );

        assert!(result.is_err());
        assert_eq!(tree.changes().count(), 0);
    }

    #[test]
    fn add_then_read_round_trips() {
        let mut tree = Tree::new("/virtual-workspace");
        add_project_configuration(&mut tree, "demo", &demo_config("apps/demo")).unwrap();

        let config = read_project_configuration(&tree, "demo").unwrap();
        assert_eq!(config.name.as_deref(), Some("demo"));
        assert_eq!(config.root, "apps/demo");
    }

    #[test]
    fn update_returns_the_final_configuration() {
        let mut tree = Tree::new("/virtual-workspace");
        add_project_configuration(&mut tree, "demo", &demo_config("apps/demo")).unwrap();

        let updated = update_project_configuration(
            &mut tree,
            "demo",
            Update::modify(|config: &mut ProjectConfiguration| config.tags.push("type:service".into())),
        )
        .unwrap();

        assert_eq!(updated.tags, vec!["type:service"]);
        let reread = read_project_configuration(&tree, "demo").unwrap();
        assert_eq!(reread.tags, vec!["type:service"]);
    }

    #[test]
    fn get_projects_lists_all_registered_names() {
        let mut tree = Tree::new("/virtual-workspace");
        add_project_configuration(&mut tree, "a", &demo_config("apps/a")).unwrap();
        add_project_configuration(&mut tree, "b", &demo_config("apps/b")).unwrap();

        let projects = get_projects(&tree).unwrap();
        assert_eq!(projects.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn read_file_from_source_requires_a_source_root() {
        let mut tree = Tree::new("/virtual-workspace");
        let mut config = demo_config("apps/demo");
        config.source_root = None;

        let err = read_file_from_source(&tree, &config, "main.ts").unwrap_err();
        assert!(matches!(err, RiggerError::Validation(_)));

        config.source_root = Some("apps/demo/src".into());
        tree.write("apps/demo/src/main.ts", "contents");
        assert_eq!(
            read_file_from_source(&tree, &config, "main.ts").unwrap(),
            "contents"
        );
    }
}
