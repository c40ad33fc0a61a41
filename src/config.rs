use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

pub const TOKENS_SECTION: &str = "TOKENS";
pub const VK_TOKEN_KEY: &str = "vk_token";
pub const YANDEX_TOKEN_KEY: &str = "token_ya";
pub const GDRIVE_TOKEN_KEY: &str = "gdrive_token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read { path: String, source: ini::Error },

    #[error("Config file {path} has no [{section}] section")]
    MissingSection { path: String, section: &'static str },

    #[error("Missing '{key}' in the [{section}] section of {path}")]
    MissingKey {
        path: String,
        section: &'static str,
        key: &'static str,
    },

    #[error("Photo count must be a positive number")]
    ZeroCount,
}

/// Access tokens for the three services.
#[derive(Clone, PartialEq, Eq)]
pub struct Tokens {
    pub vk: String,
    pub yandex: String,
    pub gdrive: Option<String>,
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("vk", &"<redacted>")
            .field("yandex", &"<redacted>")
            .field("gdrive", &self.gdrive.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Values found in the `[TOKENS]` section; any may be absent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct FileTokens {
    vk: Option<String>,
    yandex: Option<String>,
    gdrive: Option<String>,
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub tokens: Tokens,
    pub handle: Option<String>,
    pub folder: Option<String>,
    pub count: Option<u32>,
    pub offset: u32,
    pub download_dir: Option<PathBuf>,
    pub log_file: PathBuf,

    pub yes_local: bool,
    pub yes_drive: bool,
    pub no_progress_bar: bool,
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Look up `key` in `section`, ignoring ASCII case on both names.
fn lookup<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.iter()
        .filter(|(name, _)| name.is_some_and(|n| n.eq_ignore_ascii_case(section)))
        .flat_map(|(_, props)| props.iter())
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn has_section(ini: &Ini, section: &str) -> bool {
    ini.sections()
        .any(|name| name.is_some_and(|n| n.eq_ignore_ascii_case(section)))
}

fn parse_tokens(ini: &Ini) -> FileTokens {
    FileTokens {
        vk: lookup(ini, TOKENS_SECTION, VK_TOKEN_KEY).map(str::to_string),
        yandex: lookup(ini, TOKENS_SECTION, YANDEX_TOKEN_KEY).map(str::to_string),
        gdrive: lookup(ini, TOKENS_SECTION, GDRIVE_TOKEN_KEY).map(str::to_string),
    }
}

/// Resolve the final tokens. Values given on the command line or through the
/// environment win; the config file is only read when something required is
/// still missing.
fn resolve_tokens(
    path: &Path,
    vk: Option<String>,
    yandex: Option<String>,
    gdrive: Option<String>,
) -> Result<Tokens, ConfigError> {
    let path_str = path.display().to_string();

    let file = if vk.is_some() && yandex.is_some() && !path.exists() {
        FileTokens::default()
    } else {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        if (vk.is_none() || yandex.is_none()) && !has_section(&ini, TOKENS_SECTION) {
            return Err(ConfigError::MissingSection {
                path: path_str,
                section: TOKENS_SECTION,
            });
        }
        parse_tokens(&ini)
    };

    let missing = |key| ConfigError::MissingKey {
        path: path_str.clone(),
        section: TOKENS_SECTION,
        key,
    };
    Ok(Tokens {
        vk: vk.or(file.vk).ok_or_else(|| missing(VK_TOKEN_KEY))?,
        yandex: yandex.or(file.yandex).ok_or_else(|| missing(YANDEX_TOKEN_KEY))?,
        gdrive: gdrive.or(file.gdrive),
    })
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> Result<Self, ConfigError> {
        if cli.count == Some(0) {
            return Err(ConfigError::ZeroCount);
        }

        let config_path = expand_tilde(&cli.config);
        let tokens = resolve_tokens(&config_path, cli.vk_token, cli.yandex_token, cli.gdrive_token)?;
        tracing::debug!(config = %config_path.display(), "Loaded tokens");

        Ok(Self {
            tokens,
            handle: cli.handle,
            folder: cli.folder,
            count: cli.count,
            offset: cli.offset,
            download_dir: cli.download_dir.map(|d| expand_tilde(&d)),
            log_file: expand_tilde(&cli.log_file),
            yes_local: cli.yes_local,
            yes_drive: cli.yes_drive,
            no_progress_bar: cli.no_progress_bar,
        })
    }
}
