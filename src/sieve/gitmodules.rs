use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::sieve::source::FileSource;

/// `[section]` or `[section "subsection"]`, optionally followed by a comment.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[\s*([^\s\]"]+)(?:\s+"((?:[^"\\]|\\.)*)")?\s*\]\s*(?:[#;].*)?$"#)
        .expect("section pattern is valid")
});

/// `key = value`
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9-]*)\s*=\s*(.*)$").expect("entry pattern is valid")
});

/// Submodule directories declared by the file at `modules_file`, each
/// resolved against the directory that holds the file.
///
/// A missing or unreadable file contributes nothing.
pub fn submodule_dirs<S: FileSource + ?Sized>(source: &S, modules_file: &Path) -> Vec<PathBuf> {
    let text = match source.read_to_string(modules_file) {
        Ok(text) => text,
        Err(e) => {
            debug!("Skipping submodule file {}: {}", modules_file.display(), e);
            return Vec::new();
        }
    };

    let base = modules_file.parent().unwrap_or_else(|| Path::new(""));
    let dirs = parse_submodule_dirs(base, &text);
    debug!("{} declares {} submodules", modules_file.display(), dirs.len());
    dirs
}

/// Parse git-config formatted submodule declarations and collect the `path`
/// of every `[submodule "..."]` block.
///
/// Lines that fit neither a section header nor a `key = value` entry are
/// skipped, as are `path` keys outside a submodule block and empty values.
pub fn parse_submodule_dirs(base: &Path, text: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let mut in_submodule = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            in_submodule = match SECTION_RE.captures(line) {
                Some(caps) => {
                    caps[1].eq_ignore_ascii_case("submodule") && caps.get(2).is_some()
                }
                None => {
                    warn!("Malformed section header on line {}: {}", idx + 1, line);
                    false
                }
            };
            continue;
        }

        if !in_submodule {
            continue;
        }

        let Some(caps) = ENTRY_RE.captures(line) else {
            debug!("Skipping unrecognized line {}: {}", idx + 1, line);
            continue;
        };
        if !caps[1].eq_ignore_ascii_case("path") {
            continue;
        }

        let value = clean_value(&caps[2]);
        let value = value.trim_end_matches('/');
        if value.is_empty() {
            debug!("Skipping empty submodule path on line {}", idx + 1);
            continue;
        }
        dirs.push(base.join(value));
    }

    dirs
}

/// Strip quotes and trailing comments from a raw config value.
fn clean_value(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('"') {
        let mut out = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => break,
                '\\' => match chars.next() {
                    Some('t') => out.push('\t'),
                    Some('n') => out.push('\n'),
                    Some(other) => out.push(other),
                    None => break,
                },
                _ => out.push(c),
            }
        }
        return out;
    }

    let end = raw.find(['#', ';']).unwrap_or(raw.len());
    raw[..end].trim_end().to_string()
}
