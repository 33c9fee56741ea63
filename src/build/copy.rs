//! File staging helpers

use anyhow::{Context, Result};
use globset::Glob;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::normalize_path;

/// Recursively copy the contents of `from` into `to`, returning the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed walking {}", from.display()))?;
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed creating {}", target.display()))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy one file, creating parent directories of `to` as needed.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed creating {}", parent.display()))?;
    }
    fs::copy(from, to)
        .with_context(|| format!("Failed copying {} to {}", from.display(), to.display()))?;
    Ok(())
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Leading directory of `pattern` that contains no glob syntax.
fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            if is_glob(&part.to_string_lossy()) {
                break;
            }
        }
        base.push(component);
    }
    base
}

/// Expand one `contents` entry into `(source, path relative to the destination)` pairs.
///
/// Plain paths land directly in the destination under their file name. Glob
/// patterns keep the part of each match below the pattern's literal prefix.
/// Relative entries resolve against `src_dir`; a plain path that does not exist is an
/// error, a glob matching nothing is not.
pub fn expand_content(src_dir: &Path, entry: &str) -> Result<Vec<(PathBuf, PathBuf)>> {
    let absolute = Path::new(entry).is_absolute();
    let full = if absolute { PathBuf::from(entry) } else { src_dir.join(entry) };

    if !is_glob(entry) {
        if !full.is_file() {
            anyhow::bail!("File not found: {}", full.display());
        }
        let name = full.file_name().map(PathBuf::from).unwrap_or_default();
        return Ok(vec![(full, name)]);
    }

    let base = glob_base(&normalize_path(&full.to_string_lossy()));
    let matcher = Glob::new(&normalize_path(&full.to_string_lossy()))
        .with_context(|| format!("Invalid contents pattern: {entry}"))?
        .compile_matcher();

    let mut matches = Vec::new();
    for entry in WalkDir::new(&base).sort_by_file_name().into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if matcher.is_match(normalize_path(&path.to_string_lossy())) {
            if let Ok(rel) = path.strip_prefix(&base) {
                matches.push((path.to_path_buf(), rel.to_path_buf()));
            }
        }
    }
    if matches.is_empty() {
        tracing::warn!("Contents pattern {} matched no files", entry);
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_tree_preserves_layout() {
        let tmp = TempDir::new().expect("tmp");
        let from = tmp.path().join("assets");
        fs::create_dir_all(from.join("img/icons")).expect("mkdir");
        fs::write(from.join("logo.svg"), "<svg/>").expect("write");
        fs::write(from.join("img/icons/a.png"), "png").expect("write");

        let to = tmp.path().join("dist/assets");
        let copied = copy_tree(&from, &to).expect("copy");
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(to.join("img/icons/a.png")).expect("read"), "png");
        assert!(to.join("logo.svg").is_file());
    }

    #[test]
    fn test_plain_content_lands_by_file_name() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("parts")).expect("mkdir");
        fs::write(tmp.path().join("parts/intro.md"), "# Hi").expect("write");

        let expanded = expand_content(tmp.path(), "parts/intro.md").expect("expand");
        assert_eq!(expanded, [(tmp.path().join("parts/intro.md"), PathBuf::from("intro.md"))]);
    }

    #[test]
    fn test_missing_plain_content_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = expand_content(tmp.path(), "nope.md").expect_err("missing");
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_glob_content_keeps_relative_layout() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("slides/extra")).expect("mkdir");
        fs::write(tmp.path().join("slides/a.md"), "a").expect("write");
        fs::write(tmp.path().join("slides/extra/b.md"), "b").expect("write");
        fs::write(tmp.path().join("slides/notes.txt"), "n").expect("write");

        let expanded = expand_content(tmp.path(), "slides/**/*.md").expect("expand");
        let rels: Vec<PathBuf> = expanded.into_iter().map(|(_, rel)| rel).collect();
        assert_eq!(rels, [PathBuf::from("a.md"), PathBuf::from("extra/b.md")]);
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("/p/slides/*.md"), PathBuf::from("/p/slides"));
        assert_eq!(glob_base("/p/**/x.md"), PathBuf::from("/p"));
    }
}
