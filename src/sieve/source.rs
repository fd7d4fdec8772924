use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::config;
use crate::error::{Result, SieveError};
use crate::sieve::banned::BannedDirs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, sockets, devices. Never descended into.
    Other,
}

/// One entry yielded by a directory listing or a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl SourceEntry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Directory-listing capability the sieve reads the repository through.
///
/// `FsSource` reads the real disk; `MemorySource` serves an in-memory tree so
/// traversal and parsing can be exercised without touching the filesystem.
pub trait FileSource {
    /// Kind of the entry at `path`, following a symlink at `path` itself.
    /// `None` if nothing is there.
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    /// Immediate children of `dir`, each with a path of the form `dir/<name>`.
    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Every entry at or below `root`, the root included.
    ///
    /// VCS metadata directories and everything `banned` excludes are pruned
    /// without being listed. Directories that fail to list contribute nothing.
    /// A `root` that is missing, not a directory, or itself banned yields an
    /// empty walk.
    fn walk(&self, root: &Path, banned: &BannedDirs) -> Vec<SourceEntry> {
        let mut found = Vec::new();
        if self.kind(root) != Some(EntryKind::Dir) || banned.excludes(root) {
            return found;
        }

        found.push(SourceEntry::new(root.to_path_buf(), EntryKind::Dir));
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match self.read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries {
                if entry.is_dir() && entry.name().is_some_and(config::is_vcs_dir) {
                    continue;
                }
                if banned.excludes(&entry.path) {
                    continue;
                }
                if entry.is_dir() {
                    pending.push(entry.path.clone());
                }
                found.push(entry);
            }
        }

        found
    }
}

/// The local filesystem. Symbolic links are reported but never followed
/// below the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FsSource {
    pub fn new() -> Self {
        FsSource
    }
}

fn kind_of(ft: fs::FileType) -> EntryKind {
    if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileSource for FsSource {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        fs::metadata(path).ok().map(|m| kind_of(m.file_type()))
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>> {
        // The handle is dropped on return, including early error returns.
        let reader = fs::read_dir(dir).map_err(|e| SieveError::io(dir, e))?;
        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| SieveError::io(dir, e))?;
            let kind = entry
                .file_type()
                .map(kind_of)
                .unwrap_or(EntryKind::Other);
            entries.push(SourceEntry::new(dir.join(entry.file_name()), kind));
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| SieveError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Walk backed by the `ignore` crate walker with every ignore-file filter
    /// turned off: exclusion here is decided by `banned` alone.
    fn walk(&self, root: &Path, banned: &BannedDirs) -> Vec<SourceEntry> {
        if self.kind(root) != Some(EntryKind::Dir) || banned.excludes(root) {
            return Vec::new();
        }

        let prune = banned.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if is_dir && entry.file_name().to_str().is_some_and(config::is_vcs_dir) {
                    return false;
                }
                !prune.excludes(entry.path())
            })
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let kind = entry.file_type().map(kind_of).unwrap_or(EntryKind::Other);
            found.push(SourceEntry::new(entry.into_path(), kind));
        }
        found
    }
}
