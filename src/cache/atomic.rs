//! Whole-file replacement via temp file and rename

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use tokio::fs;

/// Suffix of in-progress writes; leftovers are swept by `clear_all`.
pub const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique sibling path for staging a write to `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}-{}{}", name, std::process::id(), n, TEMP_SUFFIX))
}

/// Replace `path` with `contents` so readers see either the old file or the
/// new one, never a partial write.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, contents).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await
        {
            debug!("Could not restrict permissions on {}: {}", tmp_path.display(), e);
        }
    }

    if let Err(err) = fs::rename(&tmp_path, path).await {
        if let Err(e) = fs::remove_file(&tmp_path).await {
            debug!("Could not remove temp file {}: {}", tmp_path.display(), e);
        }
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_atomic_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.json");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_temp_paths_are_unique_siblings() {
        let path = Path::new("/tmp/cache/a.json");
        let first = temp_path_for(path);
        let second = temp_path_for(path);
        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
        assert!(first.to_string_lossy().ends_with(TEMP_SUFFIX));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entry.json");
        write_atomic(&path, b"{}").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_failed_rename_cleans_up_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = dir.path().join("entry.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(write_atomic(&path, b"{}").await.is_err());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }
}
