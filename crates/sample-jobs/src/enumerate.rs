use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::JobError;

/// Files discovered for one run, in traversal order. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl Manifest {
    /// Canonical form of the root the files were found under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Case-insensitive extension check; `extension` is given without the dot.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Recursively collects regular files under `root` whose extension matches.
///
/// The root itself must be a readable directory; anything below it that
/// cannot be read is skipped with a warning. Entries are visited in file-name
/// order so repeated scans of an unchanged tree agree.
pub fn find_samples(root: &Path, extension: &str) -> Result<Manifest, JobError> {
    let root = fs::canonicalize(root).map_err(|source| JobError::DirectoryAccess {
        path: root.to_path_buf(),
        source,
    })?;
    // Fail on an unreadable root here instead of partway through the walk.
    fs::read_dir(&root).map_err(|source| JobError::DirectoryAccess {
        path: root.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {:?}: {e}", root);
                continue;
            }
        };
        // Links are not descended into, but a link to a regular file counts.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    Ok(Manifest { root, files })
}
