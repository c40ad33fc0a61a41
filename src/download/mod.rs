//! Local download: saves every named photo into one folder on disk, one file
//! per name, in the normalizer's order.

pub mod file;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::photos::Normalized;
use crate::vk::SourceClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Create a progress bar with a consistent template.
///
/// Returns `ProgressBar::hidden()` when the user passed `--no-progress-bar` or
/// stdout is not a TTY.
pub fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    match ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("=> ")),
        Err(e) => tracing::debug!("Invalid progress bar template: {}", e),
    }
    pb
}

/// Download each photo through `source` into `dir`, creating it if needed.
///
/// A failed photo is logged and skipped; only failing to create `dir` aborts.
pub async fn download_to_dir(
    source: &dyn SourceClient,
    photos: &Normalized,
    dir: &Path,
    pb: &ProgressBar,
) -> std::io::Result<DownloadReport> {
    tokio::fs::create_dir_all(dir).await?;

    let mut report = DownloadReport::default();
    for (counter, photo) in photos.entries().enumerate() {
        pb.set_message(photo.file_name.to_string());
        let path = dir.join(photo.file_name);

        let result = match source.download(photo.url).await {
            Ok(bytes) => file::write_file(&path, &bytes)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                pb.suspend(|| {
                    tracing::info!(
                        "Downloaded photo {} of {}: {}",
                        counter + 1,
                        photos.len(),
                        path.display()
                    )
                });
                report.saved.push(path);
            }
            Err(e) => {
                pb.suspend(|| tracing::error!("Download failed: {}: {}", path.display(), e));
                report.failed.push(photo.file_name.to_string());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(report)
}

pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::PhotoRecord;
    use crate::vk::SourceError;
    use indexmap::IndexMap;

    /// Serves bytes for URLs it knows, 404 for the rest.
    struct FakeCdn {
        files: IndexMap<String, Vec<u8>>,
    }

    #[async_trait::async_trait]
    impl SourceClient for FakeCdn {
        async fn resolve_handle(&self, handle: &str) -> Result<String, SourceError> {
            Ok(handle.to_string())
        }

        async fn fetch_page(
            &self,
            _owner_id: &str,
            _count: u32,
            _offset: u32,
        ) -> Result<Vec<PhotoRecord>, SourceError> {
            Ok(Vec::new())
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| SourceError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn normalized(pairs: &[(&str, &str)]) -> Normalized {
        Normalized {
            photos: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            log: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_download_creates_folder_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("backup");
        let cdn = FakeCdn {
            files: [
                ("https://cdn/a".to_string(), b"aaa".to_vec()),
                ("https://cdn/b".to_string(), b"bb".to_vec()),
            ]
            .into_iter()
            .collect(),
        };
        let photos = normalized(&[("10.jpg", "https://cdn/a"), ("10_4.7.2021.jpg", "https://cdn/b")]);

        let report = download_to_dir(&cdn, &photos, &target, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(std::fs::read(target.join("10.jpg")).unwrap(), b"aaa");
        assert_eq!(std::fs::read(target.join("10_4.7.2021.jpg")).unwrap(), b"bb");
    }

    #[tokio::test]
    async fn test_download_failure_does_not_stop_later_items() {
        let dir = tempfile::tempdir().unwrap();
        let cdn = FakeCdn {
            files: [("https://cdn/ok".to_string(), b"ok".to_vec())]
                .into_iter()
                .collect(),
        };
        let photos = normalized(&[("1.jpg", "https://cdn/missing"), ("2.jpg", "https://cdn/ok")]);

        let report = download_to_dir(&cdn, &photos, dir.path(), &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["1.jpg".to_string()]);
        assert_eq!(report.saved, vec![dir.path().join("2.jpg")]);
        assert!(!dir.path().join("1.jpg").exists());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 05s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05s");
    }

    #[test]
    fn test_hidden_progress_bar_when_disabled() {
        assert!(create_progress_bar(true, 10).is_hidden());
    }
}
