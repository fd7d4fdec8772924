use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SieveError};
use crate::sieve::banned::normalize;
use crate::sieve::source::{EntryKind, FileSource, SourceEntry};

/// An entry in the in-memory tree.
#[derive(Debug, Clone)]
pub enum MemoryEntry {
    Dir(BTreeMap<String, MemoryEntry>),
    File(String),
    /// A directory whose listing fails.
    UnreadableDir,
    /// A file whose read fails.
    UnreadableFile,
}

impl MemoryEntry {
    fn kind(&self) -> EntryKind {
        match self {
            MemoryEntry::Dir(_) | MemoryEntry::UnreadableDir => EntryKind::Dir,
            MemoryEntry::File(_) | MemoryEntry::UnreadableFile => EntryKind::File,
        }
    }
}

/// A read-only in-memory repository mounted at `root`.
///
/// ```
/// use cxx_sieve::sieve::MemorySource;
///
/// let source = MemorySource::new("/repo")
///     .with_file("main.cpp", "int main() {}")
///     .with_file(".gitignore", "build/\n")
///     .with_dir("build");
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    root: PathBuf,
    tree: MemoryEntry,
}

impl MemorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
            tree: MemoryEntry::Dir(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a file at `rel` (`/`-separated, relative to the root), creating
    /// parent directories as needed.
    pub fn with_file(mut self, rel: &str, contents: &str) -> Self {
        self.insert(rel, MemoryEntry::File(contents.to_string()));
        self
    }

    pub fn with_dir(mut self, rel: &str) -> Self {
        self.insert(rel, MemoryEntry::Dir(BTreeMap::new()));
        self
    }

    pub fn with_unreadable_dir(mut self, rel: &str) -> Self {
        self.insert(rel, MemoryEntry::UnreadableDir);
        self
    }

    pub fn with_unreadable_file(mut self, rel: &str) -> Self {
        self.insert(rel, MemoryEntry::UnreadableFile);
        self
    }

    fn insert(&mut self, rel: &str, entry: MemoryEntry) {
        let parts: Vec<&str> = rel.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, parents)) = parts.split_last() else {
            return;
        };

        let mut node = match &mut self.tree {
            MemoryEntry::Dir(children) => children,
            _ => return,
        };
        for part in parents {
            let child = node
                .entry(part.to_string())
                .or_insert_with(|| MemoryEntry::Dir(BTreeMap::new()));
            node = match child {
                MemoryEntry::Dir(children) => children,
                _ => return,
            };
        }

        // Re-adding an existing directory keeps its contents.
        if matches!(entry, MemoryEntry::Dir(_))
            && matches!(node.get(*last), Some(MemoryEntry::Dir(_)))
        {
            return;
        }
        node.insert(last.to_string(), entry);
    }

    fn lookup(&self, path: &Path) -> Option<&MemoryEntry> {
        let path = normalize(path);
        let rel = path.strip_prefix(&self.root).ok()?;

        let mut node = &self.tree;
        for component in rel.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            node = match node {
                MemoryEntry::Dir(children) => children.get(name.to_str()?)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

fn denied(path: &Path) -> SieveError {
    SieveError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
    }
}

impl FileSource for MemorySource {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        self.lookup(path).map(MemoryEntry::kind)
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<SourceEntry>> {
        match self.lookup(dir) {
            None => Err(SieveError::NotFound(dir.to_path_buf())),
            Some(MemoryEntry::Dir(children)) => Ok(children
                .iter()
                .map(|(name, entry)| SourceEntry::new(dir.join(name), entry.kind()))
                .collect()),
            Some(MemoryEntry::UnreadableDir) => Err(denied(dir)),
            Some(_) => Err(SieveError::NotADirectory(dir.to_path_buf())),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.lookup(path) {
            None => Err(SieveError::NotFound(path.to_path_buf())),
            Some(MemoryEntry::File(contents)) => Ok(contents.clone()),
            Some(MemoryEntry::UnreadableFile) => Err(denied(path)),
            Some(_) => Err(SieveError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MemorySource {
        MemorySource::new("/repo")
            .with_file("main.cpp", "int main() {}")
            .with_file("src/class.hpp", "class A {};")
            .with_dir("empty")
    }

    #[test]
    fn kinds() {
        let src = source();
        assert_eq!(src.kind(Path::new("/repo")), Some(EntryKind::Dir));
        assert_eq!(src.kind(Path::new("/repo/src")), Some(EntryKind::Dir));
        assert_eq!(src.kind(Path::new("/repo/main.cpp")), Some(EntryKind::File));
        assert_eq!(src.kind(Path::new("/repo/missing")), None);
        assert_eq!(src.kind(Path::new("/elsewhere")), None);
    }

    #[test]
    fn read_dir_lists_children() {
        let src = source();
        let mut names: Vec<String> = src
            .read_dir(Path::new("/repo"))
            .unwrap()
            .iter()
            .filter_map(|e| e.name().map(str::to_string))
            .collect();
        names.sort();
        assert_eq!(names, vec!["empty", "main.cpp", "src"]);
    }

    #[test]
    fn read_dir_errors() {
        let src = source().with_unreadable_dir("locked");
        assert!(matches!(
            src.read_dir(Path::new("/repo/nope")),
            Err(SieveError::NotFound(_))
        ));
        assert!(matches!(
            src.read_dir(Path::new("/repo/main.cpp")),
            Err(SieveError::NotADirectory(_))
        ));
        assert!(matches!(
            src.read_dir(Path::new("/repo/locked")),
            Err(SieveError::Io { .. })
        ));
    }

    #[test]
    fn read_file() {
        let src = source();
        assert_eq!(
            src.read_to_string(Path::new("/repo/src/class.hpp")).unwrap(),
            "class A {};"
        );
        assert!(src.read_to_string(Path::new("/repo/src")).is_err());
    }

    #[test]
    fn re_adding_dir_keeps_contents() {
        let src = source().with_dir("src");
        assert_eq!(
            src.kind(Path::new("/repo/src/class.hpp")),
            Some(EntryKind::File)
        );
    }

    #[test]
    fn default_walk_visits_everything() {
        let src = source();
        let mut paths: Vec<PathBuf> = src
            .walk(Path::new("/repo"), &Default::default())
            .into_iter()
            .map(|e| e.path)
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/repo"),
                PathBuf::from("/repo/empty"),
                PathBuf::from("/repo/main.cpp"),
                PathBuf::from("/repo/src"),
                PathBuf::from("/repo/src/class.hpp"),
            ]
        );
    }

    #[test]
    fn walk_skips_vcs_and_unreadable_dirs() {
        let src = source()
            .with_file(".git/config", "")
            .with_unreadable_dir("locked");
        let paths: Vec<PathBuf> = src
            .walk(Path::new("/repo"), &Default::default())
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert!(!paths.iter().any(|p| p.starts_with("/repo/.git")));
        // The unreadable directory itself is still reported; its contents are not.
        assert!(paths.contains(&PathBuf::from("/repo/locked")));
        assert!(paths.contains(&PathBuf::from("/repo/main.cpp")));
    }
}
