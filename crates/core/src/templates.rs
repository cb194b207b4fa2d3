//! Template rendering for scaffolded files
//!
//! Templates use `<%= variable %>` tokens in file contents and `__variable__`
//! tokens in path segments. Template file names carry a `__tmpl__` marker so
//! the stubs themselves are never picked up by type checkers or test runners;
//! the marker is stripped when files are generated into the tree.

use std::collections::BTreeMap;

use crate::names::names;
use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

pub type TemplateVars = BTreeMap<String, String>;

/// A template shipped with a generator, embedded at compile time
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    /// Path relative to the generation target directory, possibly containing
    /// `__variable__` tokens and the `__tmpl__` marker
    pub path: &'static str,
    pub contents: &'static str,
}

const TEMPLATE_MARKER: &str = "__tmpl__";
const TOKEN_OPEN: &str = "<%=";
const TOKEN_CLOSE: &str = "%>";

/// Substitute `<%= variable %>` tokens in template contents.
///
/// Referencing a variable that is not defined fails with a template error
/// naming the variable.
pub fn render(template: &str, vars: &TemplateVars) -> RiggerResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(TOKEN_OPEN) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + TOKEN_OPEN.len()..];
        let end = after_open.find(TOKEN_CLOSE).ok_or_else(|| {
            RiggerError::Template(format!("unterminated '{TOKEN_OPEN}' token"))
        })?;

        let variable = after_open[..end].trim();
        let value = vars.get(variable).ok_or_else(|| {
            RiggerError::Template(format!("undefined template variable '{variable}'"))
        })?;
        output.push_str(value);

        rest = &after_open[end + TOKEN_CLOSE.len()..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Substitute `__variable__` tokens in a path and strip the template marker
fn render_path(path: &str, vars: &TemplateVars) -> String {
    let mut output = path.replace(TEMPLATE_MARKER, "");
    for (variable, value) in vars {
        output = output.replace(&format!("__{variable}__"), value);
    }
    output
}

/// Render a set of template files into `target_dir` in the tree
pub fn generate_files(
    tree: &mut Tree,
    files: &[TemplateFile],
    target_dir: &str,
    vars: &TemplateVars,
) -> RiggerResult<()> {
    for file in files {
        let path = render_path(file.path, vars);
        let contents = render(file.contents, vars)?;
        tree.write(format!("{target_dir}/{path}"), contents);
    }
    Ok(())
}

/// The relative path from a project root back up to the workspace root
pub fn offset_from_root(project_root: &str) -> String {
    let depth = project_root
        .split('/')
        .filter(|segment| !segment.is_empty())
        .count();
    "../".repeat(depth)
}

/// Template variables shared by every generator: the casings of the project
/// name plus the offset back to the workspace root.
pub fn common_template_vars(name: Option<&str>, project_root: &str) -> TemplateVars {
    let mut vars = TemplateVars::new();
    if let Some(name) = name {
        let casings = names(name);
        vars.insert("name".to_string(), name.to_string());
        vars.insert("fileName".to_string(), casings.file_name);
        vars.insert("className".to_string(), casings.class_name);
        vars.insert("propertyName".to_string(), casings.property_name);
        vars.insert("constantName".to_string(), casings.constant_name);
    }
    vars.insert(
        "offsetFromRoot".to_string(),
        offset_from_root(project_root),
    );
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn render_substitutes_tokens() {
        let rendered = render(
            "image: <%= image %>\nports:\n  - '<%= port %>:80'\n",
            &vars(&[("image", "wiremock"), ("port", "9021")]),
        )
        .unwrap();
        assert_eq!(rendered, "image: wiremock\nports:\n  - '9021:80'\n");
    }

    #[test]
    fn render_leaves_shell_style_interpolation_alone() {
        let rendered = render("echo ${APP_NAME} <%= name %>", &vars(&[("name", "x")])).unwrap();
        assert_eq!(rendered, "echo ${APP_NAME} x");
    }

    #[test]
    fn undefined_variable_fails_naming_it() {
        let err = render("hello <%= missing %>", &TemplateVars::new()).unwrap_err();
        match err {
            RiggerError::Template(message) => assert!(message.contains("missing")),
            other => panic!("expected template error, got {other:?}"),
        }
    }

    #[test]
    fn generate_files_renders_paths_and_strips_marker() {
        let mut tree = Tree::new("/virtual-workspace");
        let files = [TemplateFile {
            path: "src/__fileName__.service.ts__tmpl__",
            contents: "export class <%= className %>Service {}\n",
        }];

        generate_files(
            &mut tree,
            &files,
            "apps/demo",
            &common_template_vars(Some("my-app"), "apps/demo"),
        )
        .unwrap();

        assert_eq!(
            tree.read_string("apps/demo/src/my-app.service.ts").unwrap(),
            "export class MyAppService {}\n"
        );
    }

    #[test]
    fn offset_from_root_counts_path_segments() {
        assert_eq!(offset_from_root("apps/demo"), "../../");
        assert_eq!(offset_from_root("apps/nested/demo-e2e"), "../../../");
    }
}
