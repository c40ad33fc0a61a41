use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "vk-photo-backup",
    about = "Back up VK profile photos to Yandex Disk, a local folder and Google Drive"
)]
pub struct Cli {
    /// INI file with a [TOKENS] section (vk_token, token_ya, gdrive_token)
    #[arg(short = 'c', long, default_value = "settings.ini")]
    pub config: String,

    /// VK access token. Overrides vk_token from the config file.
    #[arg(long, env = "VK_TOKEN", hide_env_values = true)]
    pub vk_token: Option<String>,

    /// Yandex Disk OAuth token. Overrides token_ya from the config file.
    #[arg(long, env = "YANDEX_TOKEN", hide_env_values = true)]
    pub yandex_token: Option<String>,

    /// Google Drive OAuth access token. Overrides gdrive_token from the config file.
    #[arg(long, env = "GDRIVE_TOKEN", hide_env_values = true)]
    pub gdrive_token: Option<String>,

    /// VK screen name or numeric id (prompted for if omitted)
    #[arg(short = 'u', long)]
    pub handle: Option<String>,

    /// Name of the Yandex Disk folder, also the default local folder
    /// (prompted for if omitted)
    #[arg(short = 'f', long)]
    pub folder: Option<String>,

    /// Number of photos to back up (prompted for if omitted)
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Skip this many photos from the start of the profile album
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Local directory for downloads (default: the folder name)
    #[arg(short = 'd', long)]
    pub download_dir: Option<String>,

    /// JSON file listing the backed-up photos
    #[arg(long, default_value = crate::photo_log::DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Download the photos locally without asking
    #[arg(long)]
    pub yes_local: bool,

    /// Upload the local folder to Google Drive without asking
    #[arg(long)]
    pub yes_drive: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["vk-photo-backup"]).unwrap();
        assert_eq!(cli.config, "settings.ini");
        assert_eq!(cli.log_file, "photos.json");
        assert_eq!(cli.offset, 0);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(cli.handle.is_none());
        assert!(cli.count.is_none());
        assert!(!cli.yes_local);
        assert!(!cli.yes_drive);
        assert!(!cli.no_progress_bar);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "vk-photo-backup",
            "-c",
            "my.ini",
            "-u",
            "durov",
            "-f",
            "backup",
            "-n",
            "5",
            "--offset",
            "10",
            "-d",
            "/tmp/photos",
            "--log-file",
            "out.json",
            "--yes-local",
            "--yes-drive",
            "--log-level",
            "warn",
            "--no-progress-bar",
        ])
        .unwrap();
        assert_eq!(cli.config, "my.ini");
        assert_eq!(cli.handle.as_deref(), Some("durov"));
        assert_eq!(cli.folder.as_deref(), Some("backup"));
        assert_eq!(cli.count, Some(5));
        assert_eq!(cli.offset, 10);
        assert_eq!(cli.download_dir.as_deref(), Some("/tmp/photos"));
        assert_eq!(cli.log_file, "out.json");
        assert!(cli.yes_local && cli.yes_drive && cli.no_progress_bar);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_rejects_negative_count() {
        assert!(Cli::try_parse_from(["vk-photo-backup", "--count", "-3"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["vk-photo-backup", "--log-level", "trace"]).is_err());
    }

    #[test]
    fn test_log_level_filters() {
        assert_eq!(LogLevel::Debug.as_filter(), "debug");
        assert_eq!(LogLevel::Error.as_filter(), "error");
    }
}
