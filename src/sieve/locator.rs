use std::path::{Path, PathBuf};

use tracing::debug;

use crate::sieve::banned::BannedDirs;
use crate::sieve::source::FileSource;

/// Find every entry named exactly `name` at or below `root`, skipping
/// anything inside a banned directory.
///
/// Best effort: a missing root, or one that is not a directory, yields an
/// empty result. The order of the result carries no meaning.
pub fn locate_file<S: FileSource + ?Sized>(
    source: &S,
    root: &Path,
    name: &str,
    banned: &BannedDirs,
) -> Vec<PathBuf> {
    let found: Vec<PathBuf> = source
        .walk(root, banned)
        .into_iter()
        .filter(|entry| entry.name() == Some(name))
        .map(|entry| entry.path)
        .collect();

    debug!(
        "Located {} '{}' entries under {}",
        found.len(),
        name,
        root.display()
    );
    found
}

/// Find every file at or below `root` whose path satisfies `pred`, skipping
/// anything inside a banned directory. Directories never match.
pub fn locate_files_by<S, F>(source: &S, root: &Path, banned: &BannedDirs, pred: F) -> Vec<PathBuf>
where
    S: FileSource + ?Sized,
    F: Fn(&Path) -> bool,
{
    source
        .walk(root, banned)
        .into_iter()
        .filter(|entry| !entry.is_dir() && pred(&entry.path))
        .map(|entry| entry.path)
        .collect()
}
