//! Read, parse, mutate and write structured documents in the workspace tree
//!
//! Generators treat JSON and YAML files as typed values: a document is read
//! and parsed in full, mutated in memory, and written back in a single staged
//! write, so no partial update is ever observable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::tree::Tree;
use crate::types::{RiggerError, RiggerResult};

/// An update to apply to a parsed document: either a wholesale replacement or
/// an in-place mutation.
pub enum Update<'a, T> {
    Replace(T),
    Modify(Box<dyn FnOnce(&mut T) + 'a>),
}

impl<'a, T> Update<'a, T> {
    pub fn modify(updater: impl FnOnce(&mut T) + 'a) -> Self {
        Self::Modify(Box::new(updater))
    }

    pub(crate) fn apply(self, value: &mut T) {
        match self {
            Self::Replace(replacement) => *value = replacement,
            Self::Modify(updater) => updater(value),
        }
    }
}

fn parse_error(path: &Path, message: impl ToString) -> RiggerError {
    RiggerError::Parse {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

pub fn read_json<T: DeserializeOwned>(tree: &Tree, path: impl AsRef<Path>) -> RiggerResult<T> {
    let path = path.as_ref();
    let content = tree.read_string(path)?;
    serde_json::from_str(&content).map_err(|e| parse_error(path, e))
}

pub fn write_json<T: Serialize>(
    tree: &mut Tree,
    path: impl AsRef<Path>,
    value: &T,
) -> RiggerResult<()> {
    let path = path.as_ref();
    let mut content = serde_json::to_string_pretty(value).map_err(|e| parse_error(path, e))?;
    content.push('\n');
    tree.write(path, content);
    Ok(())
}

/// Read-modify-write a JSON document, returning the final value for chaining
pub fn update_json<T: Serialize + DeserializeOwned>(
    tree: &mut Tree,
    path: impl AsRef<Path>,
    update: Update<'_, T>,
) -> RiggerResult<T> {
    let path = path.as_ref();
    let mut value: T = read_json(tree, path)?;
    update.apply(&mut value);
    write_json(tree, path, &value)?;
    Ok(value)
}

pub fn read_yaml<T: DeserializeOwned>(tree: &Tree, path: impl AsRef<Path>) -> RiggerResult<T> {
    let path = path.as_ref();
    let content = tree.read_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))
}

pub fn write_yaml<T: Serialize>(
    tree: &mut Tree,
    path: impl AsRef<Path>,
    value: &T,
) -> RiggerResult<()> {
    let path = path.as_ref();
    let content = serde_yaml::to_string(value).map_err(|e| parse_error(path, e))?;
    tree.write(path, content);
    Ok(())
}

/// Read-modify-write a YAML document, returning the final value for chaining
pub fn update_yaml<T: Serialize + DeserializeOwned>(
    tree: &mut Tree,
    path: impl AsRef<Path>,
    update: Update<'_, T>,
) -> RiggerResult<T> {
    let path = path.as_ref();
    let mut value: T = read_yaml(tree, path)?;
    update.apply(&mut value);
    write_yaml(tree, path, &value)?;
    Ok(value)
}

/// Append lines to a plain text file, skipping lines that are already present
pub fn append_lines(tree: &mut Tree, path: impl AsRef<Path>, lines: &[&str]) -> RiggerResult<()> {
    let path = path.as_ref();
    let existing = match tree.read_string(path) {
        Ok(content) => content,
        Err(RiggerError::NotFound(_)) => String::new(),
        Err(e) => return Err(e),
    };

    let mut all_lines: Vec<String> = if existing.is_empty() {
        Vec::new()
    } else {
        existing.lines().map(str::to_string).collect()
    };

    for line in lines {
        if !all_lines.iter().any(|existing_line| existing_line == line) {
            all_lines.push((*line).to_string());
        }
    }

    let mut content = all_lines.join("\n");
    content.push('\n');
    tree.write(path, content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn empty_tree() -> Tree {
        Tree::new("/virtual-workspace")
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let mut tree = empty_tree();
        let values = [
            json!({"a": 1, "b": [true, null, "s"]}),
            json!([1, 2.5, "three"]),
            json!("plain string"),
            json!(false),
            json!(42),
            json!(null),
        ];

        for (i, value) in values.iter().enumerate() {
            let path = format!("doc-{i}.json");
            write_json(&mut tree, &path, value).unwrap();
            let read: Value = read_json(&tree, &path).unwrap();
            assert_eq!(&read, value);
        }
    }

    #[test]
    fn yaml_round_trip_preserves_values() {
        let mut tree = empty_tree();
        let value: serde_yaml::Value =
            serde_yaml::from_str("services:\n  app:\n    ports:\n      - '80:80'\n").unwrap();

        write_yaml(&mut tree, "compose.yaml", &value).unwrap();
        let read: serde_yaml::Value = read_yaml(&tree, "compose.yaml").unwrap();
        assert_eq!(read, value);
    }

    #[test]
    fn read_missing_document_is_not_found() {
        let tree = empty_tree();
        let err = read_json::<Value>(&tree, "missing.json").unwrap_err();
        assert!(matches!(err, RiggerError::NotFound(_)));
    }

    #[test]
    fn parse_error_names_the_file() {
        let mut tree = empty_tree();
        tree.write("broken.json", "{not json");

        let err = read_json::<Value>(&tree, "broken.json").unwrap_err();
        match err {
            RiggerError::Parse { path, .. } => assert_eq!(path, "broken.json"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn update_with_modify_and_replace() {
        let mut tree = empty_tree();
        write_json(&mut tree, "doc.json", &json!({"count": 1})).unwrap();

        let updated = update_json::<Value>(
            &mut tree,
            "doc.json",
            Update::modify(|value: &mut Value| {
                value["count"] = json!(2);
            }),
        )
        .unwrap();
        assert_eq!(updated, json!({"count": 2}));

        let replaced =
            update_json::<Value>(&mut tree, "doc.json", Update::Replace(json!({"fresh": true})))
                .unwrap();
        assert_eq!(replaced, json!({"fresh": true}));
        assert_eq!(read_json::<Value>(&tree, "doc.json").unwrap(), replaced);
    }

    #[test]
    fn update_of_missing_document_stages_no_write() {
        let mut tree = empty_tree();
        let result = update_json::<Value>(
            &mut tree,
            "missing.json",
            Update::modify(|value: &mut Value| {
                value["x"] = json!(1);
            }),
        );

        assert!(result.is_err());
        assert_eq!(tree.changes().count(), 0);
    }

    #[test]
    fn append_lines_is_idempotent() {
        let mut tree = empty_tree();

        append_lines(&mut tree, ".gitignore", &["node_modules", ".env"]).unwrap();
        assert_eq!(
            tree.read_string(".gitignore").unwrap(),
            "node_modules\n.env\n"
        );

        append_lines(&mut tree, ".gitignore", &["node_modules", "dist"]).unwrap();
        assert_eq!(
            tree.read_string(".gitignore").unwrap(),
            "node_modules\n.env\ndist\n"
        );
    }
}
