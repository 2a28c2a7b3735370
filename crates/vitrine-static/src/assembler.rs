//! Page assembly: merge a rendered page into the shell and persist it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::renderer::RenderedPage;
use crate::routes::Route;
use crate::shell::HtmlShell;

/// Errors that can occur while writing a document.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Destination for assembled documents.
pub trait PageWriter {
    /// Write `contents` at `relative` under the writer's root, replacing any
    /// existing document. Returns the path that was written.
    fn write(&self, relative: &Path, contents: &str) -> Result<PathBuf, WriteError>;
}

/// Writes documents below a directory on disk.
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PageWriter for FsWriter {
    fn write(&self, relative: &Path, contents: &str) -> Result<PathBuf, WriteError> {
        let path = self.root.join(relative);

        if let Some(parent) = path.parent() {
            // create_dir_all succeeds when the directory already exists
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, contents).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Keeps documents in memory, keyed by relative path.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    files: RefCell<BTreeMap<PathBuf, String>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents written at `relative`, if any.
    pub fn get(&self, relative: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(relative.as_ref()).cloned()
    }

    /// Every written path, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl PageWriter for MemoryWriter {
    fn write(&self, relative: &Path, contents: &str) -> Result<PathBuf, WriteError> {
        self.files
            .borrow_mut()
            .insert(relative.to_path_buf(), contents.to_string());
        Ok(relative.to_path_buf())
    }
}

/// Turns one rendered page into a persisted document.
pub struct PageAssembler;

impl PageAssembler {
    /// Substitute the page into the shell and write it at the route's output path.
    pub fn assemble(
        route: &Route,
        page: &RenderedPage,
        shell: &HtmlShell,
        writer: &impl PageWriter,
    ) -> Result<PathBuf, WriteError> {
        let document = shell.assemble(page);
        writer.write(&route.output_path(), &document)
    }
}
