use anyhow::{Context, Result};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_PATH_ENV: &str = "SUBTITLE_DOWNLOADER_CONFIG";
const API_KEY_ENV: &str = "OPENSUBTITLES_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_subtitles: Option<OpenSubtitlesConfig>,
    /// Keys written by other versions of the tool; carried through updates untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSubtitlesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Config {
    pub fn api_key(&self) -> Option<&str> {
        self.open_subtitles
            .as_ref()
            .and_then(|os| os.api_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    /// Shallow merge: every top-level key present in `patch` replaces ours.
    fn merge(&mut self, patch: Config) {
        if patch.open_subtitles.is_some() {
            self.open_subtitles = patch.open_subtitles;
        }
        self.extra.extend(patch.extra);
    }
}

/// Per-user config file. Starts uninitialized; the first `get` loads it from
/// disk and every later call returns the cached snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    snapshot: OnceCell<Config>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            snapshot: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<&Config> {
        self.snapshot.get_or_try_init(|| read_config(&self.path))
    }

    pub fn update(&mut self, patch: Config) -> Result<()> {
        let mut config = self.get()?.clone();
        config.merge(patch);
        write_config(&self.path, &config)?;
        self.snapshot = OnceCell::with_value(config);
        Ok(())
    }

    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Result<Option<String>> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(Some(key));
            }
        }
        Ok(self.get()?.api_key().map(str::to_string))
    }
}

fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("No config file at {}", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    match serde_json::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!("Ignoring malformed config file {}: {e}", path.display());
            Ok(Config::default())
        }
    }
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    log::debug!("Wrote config file {}", path.display());
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    get_config_dir_path().join("config.json")
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("subtitle-downloader"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}
