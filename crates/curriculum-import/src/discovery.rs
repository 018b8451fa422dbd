//! Curriculum file discovery
//!
//! Walks a base directory recursively and yields every file whose name ends
//! with [`CURRICULUM_FILE_SUFFIX`]. Only the file name is inspected, never the
//! content.
//!
//! Traversal order is whatever the file system returns unless
//! [`Discovery::sorted`] is enabled. Unreadable directories are reported as
//! [`ImportError::FileSystem`] instead of being skipped.

use crate::config::CURRICULUM_FILE_SUFFIX;
use crate::error::{ImportError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Recursive finder for `*_expanded.json` files
#[derive(Debug, Clone)]
pub struct Discovery {
    base_dir: PathBuf,
    sorted: bool,
}

impl Discovery {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sorted: false,
        }
    }

    /// Visit entries in file-name order at every directory level
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Lazily walk the tree, yielding matching file paths
    pub fn iter(&self) -> impl Iterator<Item = Result<PathBuf>> {
        let mut walker = WalkDir::new(&self.base_dir).follow_links(false);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        let base_dir = self.base_dir.clone();
        walker.into_iter().filter_map(move |entry| match entry {
            Ok(entry) if is_curriculum_file(&entry) => {
                trace!(path = %entry.path().display(), "Matched curriculum file");
                Some(Ok(entry.into_path()))
            },
            Ok(_) => None,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| base_dir.clone());
                Some(Err(ImportError::file_system(path, e)))
            },
        })
    }

    /// Walk the whole tree up front, failing on the first unreadable entry
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let files = self.iter().collect::<Result<Vec<_>>>()?;

        debug!(
            base_dir = %self.base_dir.display(),
            count = files.len(),
            sorted = self.sorted,
            "Discovered curriculum files"
        );

        Ok(files)
    }
}

/// Regular files (or symlinks to them) whose name carries the suffix
fn is_curriculum_file(entry: &DirEntry) -> bool {
    if !has_curriculum_suffix(entry.file_name().to_string_lossy().as_ref()) {
        return false;
    }

    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

pub fn has_curriculum_suffix(file_name: &str) -> bool {
    file_name.ends_with(CURRICULUM_FILE_SUFFIX)
}
