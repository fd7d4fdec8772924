use std::path::Path;

/// File extensions recognized as C or C++ source and header content.
/// Compared case-insensitively, so `main.C` and `util.H` also qualify.
pub const C_CXX_EXTENSIONS: &[&str] = &[
    "c", "h", // C
    "cc", "cpp", "cxx", "c++", // C++ sources
    "hh", "hpp", "hxx", "h++", // C++ headers
    "ipp", "inl", "tpp", // inline / template implementation headers
];

/// Per-directory ignore declaration file.
pub const IGNORE_FILE: &str = ".gitignore";

/// Repository-level submodule declaration file.
pub const MODULES_FILE: &str = ".gitmodules";

/// VCS metadata directories. These are never descended into, whatever the
/// ignore files say.
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

pub fn is_vcs_dir(name: &str) -> bool {
    VCS_DIRS.iter().any(|&d| d == name)
}

pub fn is_c_cxx_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            C_CXX_EXTENSIONS.iter().any(|&known| known == lower)
        })
        .unwrap_or(false)
}
