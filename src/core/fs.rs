use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::core::preview::{PreviewError, load_preview};
use crate::core::Entry;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("cannot list {}: {source}", path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read-only view of the filesystem used by the navigator.
///
/// Every path argument may carry a trailing separator.
pub trait Filesystem {
    fn list(&self, path: &Path) -> Result<Vec<Entry>, FsError>;

    fn is_directory(&self, path: &Path) -> bool;

    fn resolve(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Reads at most `max_lines` display lines of a regular file.
    fn excerpt(&self, path: &Path, max_lines: usize) -> Result<Vec<String>, PreviewError>;

    fn path_segments(&self, path: &Path) -> Vec<String> {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
    show_hidden: bool,
}

impl LocalFs {
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }
}

impl Filesystem for LocalFs {
    fn list(&self, path: &Path) -> Result<Vec<Entry>, FsError> {
        let wrap = |source| FsError::List {
            path: path.to_path_buf(),
            source,
        };
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(wrap)? {
            let entry = entry.map_err(wrap)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            // Symlinks to directories are listed as directories.
            let is_dir = match entry.file_type() {
                Ok(file_type) if file_type.is_symlink() => entry.path().is_dir(),
                Ok(file_type) => file_type.is_dir(),
                Err(_) => false,
            };
            entries.push(if is_dir {
                Entry::directory(&name)
            } else {
                Entry::new(name)
            });
        }
        entries.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(entries)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, FsError> {
        path.canonicalize().map_err(|source| FsError::Resolve {
            path: path.to_path_buf(),
            source,
        })
    }

    fn excerpt(&self, path: &Path, max_lines: usize) -> Result<Vec<String>, PreviewError> {
        load_preview(path, max_lines)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{Filesystem, FsError};
    use crate::core::Entry;
    use crate::core::preview::PreviewError;

    /// In-memory tree keyed by absolute directory path.
    #[derive(Debug, Default, Clone)]
    pub struct MemoryFs {
        pub dirs: BTreeMap<PathBuf, Vec<Entry>>,
        pub files: BTreeMap<PathBuf, Vec<String>>,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dir(mut self, path: &str, names: &[&str]) -> Self {
            self.dirs.insert(
                normalize(Path::new(path)),
                names.iter().map(|name| Entry::new(*name)).collect(),
            );
            self
        }

        pub fn with_file(mut self, path: &str, lines: &[&str]) -> Self {
            self.files.insert(
                normalize(Path::new(path)),
                lines.iter().map(|line| line.to_string()).collect(),
            );
            self
        }

        pub fn set_dir(&mut self, path: &str, names: &[&str]) {
            self.dirs.insert(
                normalize(Path::new(path)),
                names.iter().map(|name| Entry::new(*name)).collect(),
            );
        }
    }

    impl Filesystem for MemoryFs {
        fn list(&self, path: &Path) -> Result<Vec<Entry>, FsError> {
            self.dirs
                .get(&normalize(path))
                .cloned()
                .ok_or_else(|| FsError::List {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                })
        }

        fn is_directory(&self, path: &Path) -> bool {
            self.dirs.contains_key(&normalize(path))
        }

        fn resolve(&self, path: &Path) -> Result<PathBuf, FsError> {
            Ok(normalize(path))
        }

        fn excerpt(&self, path: &Path, max_lines: usize) -> Result<Vec<String>, PreviewError> {
            self.files
                .get(&normalize(path))
                .map(|lines| lines.iter().take(max_lines).cloned().collect())
                .ok_or_else(|| PreviewError::Io("not found".to_string()))
        }
    }

    fn normalize(path: &Path) -> PathBuf {
        path.components().collect()
    }
}
