use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Generated datasets with simulated latency
    #[default]
    Mock,
    /// `<dir>/<dataset>.json` files
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,
    pub dir: Option<String>,
    pub latency_ms: u64,
    /// Fail every n-th mock request; 0 disables
    pub fail_every: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Mock,
            dir: None,
            latency_ms: 600,
            fail_every: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Terminal rows per item
    pub row_height: u32,
    pub overscan: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            overscan: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub list: ListConfig,
}

/// Windowed list geometry after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub row_height: NonZeroU32,
    pub overscan: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self::from(&ListConfig::default())
    }
}

impl From<&ListConfig> for ListSettings {
    fn from(config: &ListConfig) -> Self {
        Self {
            row_height: NonZeroU32::new(config.row_height).unwrap_or(NonZeroU32::MIN),
            overscan: config.overscan,
        }
    }
}

impl DataConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn fail_every(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.fail_every)
    }

    pub fn dir_path(&self) -> Option<PathBuf> {
        self.dir.as_deref().and_then(expand_path)
    }
}

/// Load the config file, falling back to defaults when it is missing or
/// unreadable.
pub fn load(explicit: Option<&Path>) -> Config {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            if explicit.is_some() || err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    event = "config.read_failed",
                    path = %path.display(),
                    error = %err,
                );
            }
            return Config::default();
        }
    };
    parse(&content).unwrap_or_else(|err| {
        tracing::warn!(
            event = "config.parse_failed",
            path = %path.display(),
            error = %err,
        );
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TALENTBOARD_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("talentboard").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("talentboard").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "talentboard", "talentboard")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("talentboard"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("talentboard"));
    }
    directories::ProjectDirs::from("io", "talentboard", "talentboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_file_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("talentboard.log"))
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    Some(buf)
}
