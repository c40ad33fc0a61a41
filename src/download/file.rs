use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Sibling `.part` path that `download_path` is staged under.
fn temp_download_path(download_path: &Path) -> PathBuf {
    let mut name = download_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    download_path.with_file_name(name)
}

/// Write `bytes` to `download_path` via a `.part` file renamed into place, so
/// a crash never leaves a truncated photo under its final name.
pub async fn write_file(download_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let part_path = temp_download_path(download_path);

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&part_path)
        .await?;
    if let Err(e) = file.write_all(bytes).await {
        drop(file);
        let _ = fs::remove_file(&part_path).await;
        return Err(e);
    }
    file.flush().await?;
    drop(file);

    fs::rename(&part_path, download_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_download_path() {
        assert_eq!(
            temp_download_path(Path::new("/tmp/photos/10.jpg")),
            PathBuf::from("/tmp/photos/10.jpg.part")
        );
    }

    #[tokio::test]
    async fn test_write_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("10.jpg");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        write_file(&path, b"new").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("10.jpg.part").exists());
    }

    #[tokio::test]
    async fn test_write_file_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("1.jpg");
        assert!(write_file(&path, b"x").await.is_err());
    }
}
