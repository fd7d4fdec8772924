use std::path::{Path, PathBuf};

use tracing::debug;

use crate::sieve::source::FileSource;

/// Directories excluded by the ignore file at `ignore_file`, each resolved
/// against the directory that holds the file.
///
/// A missing or unreadable file contributes nothing.
pub fn ignored_dirs<S: FileSource + ?Sized>(source: &S, ignore_file: &Path) -> Vec<PathBuf> {
    let text = match source.read_to_string(ignore_file) {
        Ok(text) => text,
        Err(e) => {
            debug!("Skipping ignore file {}: {}", ignore_file.display(), e);
            return Vec::new();
        }
    };

    let base = ignore_file.parent().unwrap_or_else(|| Path::new(""));
    let dirs = parse_ignored_dirs(base, &text);
    debug!("{} declares {} ignored dirs", ignore_file.display(), dirs.len());
    dirs
}

/// Parse ignore-file text: one directory name per non-blank line.
///
/// Only literal names are honored. A trailing `/` is optional. Leading `/`s
/// are dropped, so every entry stays under `base`. Glob, negation and comment
/// syntax is not interpreted; such lines resolve verbatim and in practice
/// match nothing.
pub fn parse_ignored_dirs(base: &Path, text: &str) -> Vec<PathBuf> {
    text.lines()
        .filter_map(|line| {
            let name = line.trim_end();
            let name = name.trim_start_matches('/');
            let name = name.trim_end_matches('/');
            if name.trim().is_empty() {
                None
            } else {
                Some(base.join(name))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::memory::MemorySource;

    #[test]
    fn trailing_separator_is_optional() {
        let dirs = parse_ignored_dirs(Path::new("/repo"), "ignored_dir/\nother\n");
        assert_eq!(
            dirs,
            vec![PathBuf::from("/repo/ignored_dir"), PathBuf::from("/repo/other")]
        );
    }

    #[test]
    fn blank_lines_and_crlf() {
        let dirs = parse_ignored_dirs(Path::new("/repo"), "\r\n  \nbuild/\r\n\n");
        assert_eq!(dirs, vec![PathBuf::from("/repo/build")]);
    }

    #[test]
    fn leading_slash_anchors_to_base() {
        let dirs = parse_ignored_dirs(Path::new("/repo"), "/out\n/\n//\n//tmp\n///x/\n");
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/repo/out"),
                PathBuf::from("/repo/tmp"),
                PathBuf::from("/repo/x"),
            ]
        );
    }

    #[test]
    fn nested_path_entries() {
        let dirs = parse_ignored_dirs(Path::new("/repo"), "third_party/gen/\n");
        assert_eq!(dirs, vec![PathBuf::from("/repo/third_party/gen")]);
    }

    #[test]
    fn patterns_stay_literal() {
        let dirs = parse_ignored_dirs(Path::new("/repo"), "*.o\n!keep\n# note\n");
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/repo/*.o"),
                PathBuf::from("/repo/!keep"),
                PathBuf::from("/repo/# note"),
            ]
        );
    }

    #[test]
    fn resolves_against_nested_location() {
        let src = MemorySource::new("/repo").with_file("folder/.gitignore", "ignored_dir\n");
        let dirs = ignored_dirs(&src, Path::new("/repo/folder/.gitignore"));
        assert_eq!(dirs, vec![PathBuf::from("/repo/folder/ignored_dir")]);
    }

    #[test]
    fn missing_or_unreadable_file_is_empty() {
        let src = MemorySource::new("/repo").with_unreadable_file(".gitignore");
        assert!(ignored_dirs(&src, Path::new("/repo/.gitignore")).is_empty());
        assert!(ignored_dirs(&src, Path::new("/repo/nope/.gitignore")).is_empty());
    }
}
