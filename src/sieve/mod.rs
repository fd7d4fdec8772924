pub mod banned;
pub mod gitignore;
pub mod gitmodules;
pub mod locator;
pub mod memory;
pub mod source;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config;
use crate::error::{Result, SieveError};

pub use banned::BannedDirs;
pub use gitignore::ignored_dirs;
pub use gitmodules::submodule_dirs;
pub use locator::{locate_file, locate_files_by};
pub use memory::MemorySource;
pub use source::{EntryKind, FileSource, FsSource, SourceEntry};

/// Outcome of one sieve run.
#[derive(Debug, Clone, Serialize)]
pub struct SieveReport {
    pub root: PathBuf,
    /// Directories excluded by ignore and submodule declarations, sorted.
    pub banned: Vec<PathBuf>,
    /// C/C++ files outside every banned directory. Unordered.
    pub files: Vec<PathBuf>,
}

/// Finds the C/C++ files of a repository that belong to the repository
/// itself: not ignored by any `.gitignore`, not inside any submodule.
///
/// Every call re-reads the tree through its `FileSource`; nothing is cached.
pub struct Sieve<S: FileSource = FsSource> {
    source: S,
}

impl Default for Sieve<FsSource> {
    fn default() -> Self {
        Self::new(FsSource::new())
    }
}

impl<S: FileSource> Sieve<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Union of the directories declared by every ignore file and every
    /// submodule file under `root`. Declarations are found with nothing
    /// banned, so nested ignore files always count.
    pub fn banned_dirs(&self, root: &Path) -> BannedDirs {
        let unrestricted = BannedDirs::new();
        let ignore_files = locate_file(&self.source, root, config::IGNORE_FILE, &unrestricted);
        let modules_files = locate_file(&self.source, root, config::MODULES_FILE, &unrestricted);

        let mut banned = BannedDirs::new();
        for file in &ignore_files {
            banned.extend(ignored_dirs(&self.source, file));
        }
        for file in &modules_files {
            banned.extend(submodule_dirs(&self.source, file));
        }

        debug!(
            "{} ignore files and {} submodule files under {} ban {} dirs",
            ignore_files.len(),
            modules_files.len(),
            root.display(),
            banned.len()
        );
        banned
    }

    /// Sieve `root`, keeping the banned set alongside the result.
    ///
    /// A root that is missing or not a directory yields an empty report.
    /// Fails only when the root directory exists but cannot be listed.
    /// Trouble anywhere below the root is logged and skipped.
    pub fn report(&self, root: &Path) -> Result<SieveReport> {
        if self.source.kind(root) != Some(EntryKind::Dir) {
            debug!("Nothing to sieve at {}", root.display());
            return Ok(SieveReport {
                root: root.to_path_buf(),
                banned: Vec::new(),
                files: Vec::new(),
            });
        }
        // Surface permission trouble at the root instead of an empty result.
        self.source.read_dir(root)?;

        let banned = self.banned_dirs(root);
        let files = locate_files_by(&self.source, root, &banned, config::is_c_cxx_file);

        info!(
            "Sieved {} C/C++ files from {} ({} banned dirs)",
            files.len(),
            root.display(),
            banned.len()
        );

        Ok(SieveReport {
            root: root.to_path_buf(),
            banned: banned.sorted(),
            files,
        })
    }

    pub fn sieve(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.report(root).map(|report| report.files)
    }
}

/// Every C/C++ source and header file under `root` on disk that is neither
/// ignored nor part of a submodule.
///
/// `None` means "no repository" and passes straight through as `Ok(None)`.
/// Returned paths share the base of `root`.
pub fn sieve_c_cxx_files(root: Option<&Path>) -> Result<Option<Vec<PathBuf>>> {
    let Some(root) = root else {
        return Ok(None);
    };
    Sieve::<FsSource>::default().sieve(root).map(Some)
}
