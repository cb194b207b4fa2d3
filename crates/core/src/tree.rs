//! In-memory staged view of the workspace file system
//!
//! All generator mutations go through a [`Tree`]: reads fall back to the files
//! on disk, while writes and deletes are staged in memory. Nothing touches the
//! disk until [`Tree::flush_changes`] is called, so a failed generator never
//! leaves a half-written workspace behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::{RiggerError, RiggerResult};

/// A single staged change to the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Write(Vec<u8>),
    Delete,
}

/// Staged view of all workspace files during a generation run
#[derive(Debug)]
pub struct Tree {
    root: PathBuf,
    changes: BTreeMap<PathBuf, FileChange>,
}

impl Tree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            changes: BTreeMap::new(),
        }
    }

    /// The workspace root on disk that this tree is layered over
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a workspace-relative file, preferring staged content over disk
    pub fn read(&self, path: impl AsRef<Path>) -> RiggerResult<Vec<u8>> {
        let path = path.as_ref();

        match self.changes.get(path) {
            Some(FileChange::Write(contents)) => return Ok(contents.clone()),
            Some(FileChange::Delete) => {
                return Err(RiggerError::NotFound(path.display().to_string()))
            }
            None => {}
        }

        if self.has_deleted_ancestor(path) {
            return Err(RiggerError::NotFound(path.display().to_string()));
        }

        std::fs::read(self.root.join(path)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RiggerError::NotFound(path.display().to_string())
            } else {
                RiggerError::Io(e)
            }
        })
    }

    pub fn read_string(&self, path: impl AsRef<Path>) -> RiggerResult<String> {
        let path = path.as_ref();
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| RiggerError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Stage a write, overwriting any previous staged content
    pub fn write(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.changes
            .insert(path.into(), FileChange::Write(contents.into()));
    }

    /// Stage a delete of a file or a whole directory.
    ///
    /// Any staged writes under the path are dropped. A later write below the
    /// deleted path takes effect again, matching read-your-writes semantics.
    pub fn delete(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.changes
            .retain(|staged, _| staged != path && !staged.starts_with(path));
        self.changes.insert(path.to_path_buf(), FileChange::Delete);
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();

        match self.changes.get(path) {
            Some(FileChange::Write(_)) => return true,
            Some(FileChange::Delete) => return false,
            None => {}
        }

        if self.has_deleted_ancestor(path) {
            return false;
        }

        self.root.join(path).exists()
    }

    /// Names of the entries directly under a directory, merging staged state
    /// with what is on disk
    pub fn children(&self, path: impl AsRef<Path>) -> Vec<String> {
        let path = path.as_ref();
        let mut entries = std::collections::BTreeSet::new();

        let dir_visible = !matches!(self.changes.get(path), Some(FileChange::Delete))
            && !self.has_deleted_ancestor(path);
        if dir_visible {
            if let Ok(read_dir) = std::fs::read_dir(self.root.join(path)) {
                for entry in read_dir.flatten() {
                    entries.insert(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }

        for (staged, change) in &self.changes {
            let Ok(rest) = staged.strip_prefix(path) else {
                continue;
            };
            let Some(first) = rest.components().next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            match change {
                FileChange::Write(_) => {
                    entries.insert(name);
                }
                FileChange::Delete => {
                    if rest.components().count() == 1 {
                        entries.remove(&name);
                    }
                }
            }
        }

        entries.into_iter().collect()
    }

    /// All currently staged changes, in path order
    pub fn changes(&self) -> impl Iterator<Item = (&Path, &FileChange)> {
        self.changes
            .iter()
            .map(|(path, change)| (path.as_path(), change))
    }

    /// Commit all staged changes to disk and clear the staging area.
    ///
    /// Deletes are applied before writes so a delete-then-recreate of the same
    /// path lands in the right final state.
    pub fn flush_changes(&mut self) -> RiggerResult<()> {
        for (path, change) in &self.changes {
            if *change != FileChange::Delete {
                continue;
            }
            let full_path = self.root.join(path);
            if full_path.is_dir() {
                std::fs::remove_dir_all(&full_path)?;
            } else if full_path.exists() {
                std::fs::remove_file(&full_path)?;
            }
        }

        for (path, change) in &self.changes {
            let FileChange::Write(contents) = change else {
                continue;
            };
            let full_path = self.root.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, contents)?;
        }

        self.changes.clear();
        Ok(())
    }

    fn has_deleted_ancestor(&self, path: &Path) -> bool {
        path.ancestors()
            .skip(1)
            .any(|ancestor| matches!(self.changes.get(ancestor), Some(FileChange::Delete)))
    }
}
