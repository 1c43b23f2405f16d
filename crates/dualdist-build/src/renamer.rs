//! Module renaming for the first compiler pass
//!
//! Both module formats of the primary package are written to the same output
//! tree. After the first pass every compiled module is retagged with the
//! renamed extension so the second pass can write its own files alongside.

use crate::error::{BuildError, BuildResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Rename every file under `root` whose name ends with `from` so that it ends
/// with `to` instead. Returns the number of files renamed.
///
/// Candidates are collected before anything is renamed, so a renamed file is
/// never visited again. Directories and files with any other suffix are left
/// alone. `to` must not match `from` (neither equal nor ending with it),
/// which makes a second run over the same tree a no-op.
///
/// Symbolic links are followed: a link to a matching file is itself renamed
/// and linked directories are searched. A link cycle is reported as an I/O
/// error. File names that are not valid UTF-8 never match.
pub fn rename_modules(root: &Path, from: &str, to: &str) -> BuildResult<usize> {
    if from.is_empty() || to == from || to.ends_with(from) {
        return Err(BuildError::ExtensionCollision {
            compiled: from.to_string(),
            renamed: to.to_string(),
        });
    }

    let candidates = collect_candidates(root, from)?;

    for path in &candidates {
        let target = retag(path, from, to);
        fs::rename(path, &target).map_err(|e| BuildError::io(path, e))?;
    }

    tracing::debug!(
        "renamed {} module(s) under {} from {} to {}",
        candidates.len(),
        root.display(),
        from,
        to
    );
    Ok(candidates.len())
}

fn collect_candidates(root: &Path, from: &str) -> BuildResult<Vec<PathBuf>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(from));
        if matches {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}

/// Swap the `from` suffix of the file name for `to`, keeping the directory
fn retag(path: &Path, from: &str, to: &str) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = &name[..name.len() - from.len()];
    path.with_file_name(format!("{}{}", stem, to))
}

fn walk_error(root: &Path, error: walkdir::Error) -> BuildError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = error.to_string();
    let io_error = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    BuildError::io(path, io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retag_keeps_directory_and_stem() {
        assert_eq!(
            retag(Path::new("dist/util/index.js"), ".js", ".mjs"),
            PathBuf::from("dist/util/index.mjs")
        );
        assert_eq!(
            retag(Path::new("dist/a.b.js"), ".js", ".mjs"),
            PathBuf::from("dist/a.b.mjs")
        );
    }

    #[test]
    fn test_colliding_extensions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(rename_modules(dir.path(), ".js", ".js").is_err());
        assert!(rename_modules(dir.path(), ".js", ".esm.js").is_err());
        assert!(rename_modules(dir.path(), "", ".mjs").is_err());
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = rename_modules(&dir.path().join("absent"), ".js", ".mjs");
        assert!(matches!(result, Err(BuildError::IoError { .. })));
    }
}
