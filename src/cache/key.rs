//! Cache key sanitization and path containment

use std::path::{Component, Path, PathBuf};

use crate::error::CacheError;

/// Map an iteration ID onto a safe file stem.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `-`, so
/// `gid://gitlab/Iteration/123` becomes `gid---gitlab-Iteration-123`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// `dir` made absolute against the working directory, then normalized.
///
/// Leading `..` components of a relative path are only meaningful once the
/// working directory is prepended.
pub fn absolute_dir(dir: &Path) -> Result<PathBuf, CacheError> {
    Ok(normalize(&std::path::absolute(dir)?))
}

/// Path of the cache file for `key` under `base`.
///
/// Both paths are made absolute and normalized lexically, since the file may
/// not exist yet. The result must stay inside `base`.
pub fn resolve_within(base: &Path, key: &str) -> Result<PathBuf, CacheError> {
    let base = absolute_dir(base)?;
    let candidate = normalize(&base.join(format!("{}.json", sanitize_key(key))));

    if candidate.parent() != Some(base.as_path()) || !candidate.starts_with(&base) {
        return Err(CacheError::PathTraversal {
            key: key.to_string(),
        });
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_gitlab_gid() {
        assert_eq!(
            sanitize_key("gid://gitlab/Iteration/123"),
            "gid---gitlab-Iteration-123"
        );
    }

    #[test]
    fn test_sanitize_keeps_safe_chars() {
        assert_eq!(sanitize_key("sprint_42-a"), "sprint_42-a");
    }

    #[test]
    fn test_sanitize_neutralizes_traversal() {
        assert_eq!(sanitize_key("../../etc/passwd"), "------etc-passwd");
        assert_eq!(sanitize_key("a\\b c"), "a-b-c");
    }

    #[test]
    fn test_resolve_within_base() {
        let base = Path::new("/var/cache/sprintlens/iterations");
        let path = resolve_within(base, "gid://gitlab/Iteration/1").unwrap();
        assert_eq!(
            path,
            Path::new("/var/cache/sprintlens/iterations/gid---gitlab-Iteration-1.json")
        );
    }

    #[test]
    fn test_resolve_relative_base() {
        let cwd = std::env::current_dir().unwrap();
        let path = resolve_within(Path::new("./cache/iterations"), "42").unwrap();
        assert_eq!(path, cwd.join("cache/iterations/42.json"));
    }

    #[test]
    fn test_resolve_relative_base_keeps_leading_parent() {
        let cwd = std::env::current_dir().unwrap();
        let parent = cwd.parent().expect("tests run below the filesystem root");

        let path = resolve_within(Path::new("../shared/iterations"), "k").unwrap();

        assert_eq!(path, parent.join("shared/iterations/k.json"));
        assert_eq!(
            absolute_dir(Path::new("../shared/iterations")).unwrap(),
            parent.join("shared/iterations")
        );
    }

    #[test]
    fn test_absolute_dir_rejects_empty_path() {
        assert!(matches!(
            absolute_dir(Path::new("")),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn test_resolve_traversal_key_stays_inside() {
        let base = Path::new("/tmp/cache");
        let path = resolve_within(base, "../../etc/passwd").unwrap();
        assert!(path.starts_with(base));
    }

    #[test]
    fn test_normalize_parent_components() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), Path::new("/a/c/d"));
    }
}
