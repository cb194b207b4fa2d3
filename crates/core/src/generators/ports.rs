//! Port allocation for generated applications
//!
//! Each application declares its HTTP port on a single line of its entry
//! point, `const port = process.env.PORT || <number>;`. That line is both read
//! (to discover which ports are taken) and rewritten (to assign a free one) by
//! textual substitution rather than structural parsing. This is a known
//! fragile contract: renaming the variable or reformatting the line breaks
//! discovery.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::configs::project::{ProjectConfiguration, ProjectType};
use crate::registry::{get_projects, read_file_from_source};
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

const ENTRY_POINT: &str = "main.ts";

#[allow(clippy::expect_used)]
static PORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const port = process\.env\.PORT \|\| (\d+);").expect("port pattern is valid")
});

/// The port an application declares in its entry point, if it declares one
pub fn port_for_project(
    tree: &Tree,
    config: &ProjectConfiguration,
) -> RiggerResult<Option<u16>> {
    if config.source_root.is_none() {
        return Ok(None);
    }

    let content = match read_file_from_source(tree, config, ENTRY_POINT) {
        Ok(content) => content,
        Err(RiggerError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(PORT_PATTERN
        .captures(&content)
        .and_then(|captures| captures[1].parse().ok()))
}

/// Make sure a freshly generated project does not collide with the ports of
/// existing applications.
///
/// Test harness (`-e2e`) projects and the new project itself are ignored when
/// collecting used ports. On a collision the new project gets
/// `max(used ports) + 1` written back into its entry point; ports are strictly
/// increasing, gaps are never reused. Without a collision the declared port is
/// left untouched. Returns the port the project ends up with.
pub fn set_next_available_port(tree: &mut Tree, project_name: &str) -> RiggerResult<u16> {
    let projects = get_projects(tree)?;

    let mut used_ports = Vec::new();
    for (name, project) in &projects {
        if name == project_name || name.ends_with("-e2e") {
            continue;
        }
        if project.project_type != Some(ProjectType::Application) {
            continue;
        }
        if let Some(port) = port_for_project(tree, project)? {
            used_ports.push(port);
        }
    }

    let config = projects
        .get(project_name)
        .ok_or_else(|| RiggerError::ProjectNotFound(project_name.to_string()))?;

    let declared_port = port_for_project(tree, config)?.ok_or_else(|| {
        RiggerError::Validation(format!(
            "project '{project_name}' does not declare a port in {ENTRY_POINT}"
        ))
    })?;

    if !used_ports.contains(&declared_port) {
        return Ok(declared_port);
    }

    let highest = used_ports.iter().max().copied().unwrap_or(declared_port);
    let next_port = highest + 1;

    let source_root = config.source_root.as_ref().ok_or_else(|| {
        RiggerError::Validation(format!("project in '{}' has no source root", config.root))
    })?;
    let entry_point_path = format!("{source_root}/{ENTRY_POINT}");
    let content = tree.read_string(&entry_point_path)?;
    let rewritten = PORT_PATTERN
        .replace(&content, format!("const port = process.env.PORT || {next_port};"))
        .into_owned();
    tree.write(entry_point_path, rewritten);

    Ok(next_port)
}
