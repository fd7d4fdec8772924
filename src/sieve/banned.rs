use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components, let `..` cancel a
/// preceding normal component, and lose any trailing separator.
///
/// The filesystem is not consulted, so symlinks are not resolved. Paths that
/// should compare equal must share the same base (both absolute, or both
/// relative to the same directory).
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Set of directories excluded from a scan. A banned directory excludes
/// itself and everything beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedDirs {
    dirs: HashSet<PathBuf>,
}

impl BannedDirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory. Returns false if an equivalent path was already banned.
    pub fn insert(&mut self, dir: impl AsRef<Path>) -> bool {
        self.dirs.insert(normalize(dir.as_ref()))
    }

    /// Whether `path` is a banned directory or lies beneath one.
    ///
    /// Containment is checked component by component, so a ban on `docs`
    /// leaves `docs2` alone.
    pub fn excludes(&self, path: &Path) -> bool {
        if self.dirs.is_empty() {
            return false;
        }
        let path = normalize(path);
        self.dirs.iter().any(|dir| path.starts_with(dir))
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    /// Banned directories in lexical order, for display.
    pub fn sorted(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.iter().map(Path::to_path_buf).collect();
        dirs.sort();
        dirs
    }
}

impl<P: AsRef<Path>> Extend<P> for BannedDirs {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for dir in iter {
            self.insert(dir);
        }
    }
}

impl<P: AsRef<Path>> FromIterator<P> for BannedDirs {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut banned = BannedDirs::new();
        banned.extend(iter);
        banned
    }
}
