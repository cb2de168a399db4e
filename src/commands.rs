use anyhow::{anyhow, bail, Result};
use std::env;

use crate::cli::{ConfigArgs, DownloadArgs};
use crate::config::{Config, ConfigStore, OpenSubtitlesConfig};
use crate::domain::models::{IdType, MediaKind};
use crate::infra::opensubtitles::OpenSubtitlesClient;
use crate::media::scanner;
use crate::workflows::fetcher::{self, DownloadJob};

pub fn config(args: ConfigArgs, store: &mut ConfigStore) -> Result<()> {
    let Some(key) = args.key.filter(|key| !key.is_empty()) else {
        bail!("[--key] should be provided");
    };

    store.update(Config {
        open_subtitles: Some(OpenSubtitlesConfig { api_key: Some(key) }),
        ..Config::default()
    })?;
    println!("✅ config apiKey successfully");
    Ok(())
}

pub fn download(args: DownloadArgs, store: &ConfigStore) -> Result<()> {
    let job = build_job(&args)?;

    let Some(api_key) = store.api_key()? else {
        bail!("no apiKey found, please run config --key [api_key] to set your api key");
    };

    let root = match args.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let videos = scanner::collect_video_files(&root)?;

    let api = OpenSubtitlesClient::new(&args.api_url, api_key)?;
    fetcher::download_all(&api, &job, videos);
    Ok(())
}

/// Validate the download flags, falling back to imdb / tv with a notice.
fn build_job(args: &DownloadArgs) -> Result<DownloadJob> {
    let Some(raw_id) = args.id.as_deref() else {
        bail!("[--id] should be provided");
    };

    let id_type = match args.id_type.as_deref().and_then(IdType::parse) {
        Some(id_type) => id_type,
        None => {
            println!("no [--id-type=imdb|tmdb] provided, default is imdb");
            IdType::Imdb
        }
    };

    let kind = match args.media_type.as_deref().and_then(MediaKind::parse) {
        Some(kind) => kind,
        None => {
            println!("no [--type=movie|tv] provided, default is tv");
            MediaKind::Tv
        }
    };

    let external_id = parse_external_id(raw_id).ok_or_else(|| {
        anyhow!("provided id {raw_id} is invalid, which should be like tt0118375")
    })?;

    let languages: Vec<String> = args
        .languages
        .iter()
        .map(|language| language.trim().to_string())
        .filter(|language| !language.is_empty())
        .collect();
    if languages.is_empty() {
        bail!("[--languages] should list at least one language");
    }

    log::debug!("Looking up {kind} {id_type} id {external_id} in {languages:?}");
    Ok(DownloadJob {
        external_id,
        id_type,
        kind,
        languages,
    })
}

/// `tt0118375` and `118375` are the same id; zero is never valid.
fn parse_external_id(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("tt").unwrap_or(raw);
    digits.parse::<u64>().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::opensubtitles::OPENSUBTITLES_API_BASE;
    use std::fs;
    use tempfile::TempDir;

    fn args(id: Option<&str>) -> DownloadArgs {
        DownloadArgs {
            id: id.map(str::to_string),
            id_type: None,
            media_type: None,
            languages: vec!["en".to_string()],
            dir: None,
            api_url: OPENSUBTITLES_API_BASE.to_string(),
        }
    }

    #[test]
    fn test_parse_external_id() {
        assert_eq!(parse_external_id("tt0118375"), Some(118375));
        assert_eq!(parse_external_id("118375"), Some(118375));
        assert_eq!(parse_external_id("tt0"), None);
        assert_eq!(parse_external_id("0"), None);
        assert_eq!(parse_external_id("ttabc"), None);
        assert_eq!(parse_external_id(""), None);
        assert_eq!(parse_external_id("nm123"), None);
    }

    #[test]
    fn test_build_job_defaults() {
        let job = build_job(&args(Some("tt0118375"))).unwrap();
        assert_eq!(job.external_id, 118375);
        assert_eq!(job.id_type, IdType::Imdb);
        assert_eq!(job.kind, MediaKind::Tv);
    }

    #[test]
    fn test_build_job_invalid_values_fall_back() {
        let mut download = args(Some("42"));
        download.id_type = Some("tvdb".to_string());
        download.media_type = Some("series".to_string());
        let job = build_job(&download).unwrap();
        assert_eq!(job.id_type, IdType::Imdb);
        assert_eq!(job.kind, MediaKind::Tv);

        download.id_type = Some("tmdb".to_string());
        download.media_type = Some("movie".to_string());
        let job = build_job(&download).unwrap();
        assert_eq!(job.id_type, IdType::Tmdb);
        assert_eq!(job.kind, MediaKind::Movie);
    }

    #[test]
    fn test_build_job_usage_errors() {
        let err = build_job(&args(None)).unwrap_err();
        assert_eq!(err.to_string(), "[--id] should be provided");

        let err = build_job(&args(Some("ttxyz"))).unwrap_err();
        assert!(err.to_string().contains("provided id ttxyz is invalid"));

        let mut no_languages = args(Some("1"));
        no_languages.languages = vec![" ".to_string()];
        assert!(build_job(&no_languages).is_err());
    }

    #[test]
    fn test_config_requires_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut store = ConfigStore::new(path.clone());

        let err = config(ConfigArgs { key: None }, &mut store).unwrap_err();
        assert_eq!(err.to_string(), "[--key] should be provided");
        assert!(!path.exists());
    }

    #[test]
    fn test_config_rejects_empty_key_and_keeps_stored_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut store = ConfigStore::new(path.clone());
        config(
            ConfigArgs {
                key: Some("good".to_string()),
            },
            &mut store,
        )
        .unwrap();

        let err = config(
            ConfigArgs {
                key: Some(String::new()),
            },
            &mut store,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "[--key] should be provided");
        assert_eq!(store.get().unwrap().api_key(), Some("good"));
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["openSubtitles"]["apiKey"], "good");
    }

    #[test]
    fn test_config_stores_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut store = ConfigStore::new(path.clone());

        config(
            ConfigArgs {
                key: Some("abc123".to_string()),
            },
            &mut store,
        )
        .unwrap();

        assert_eq!(store.get().unwrap().api_key(), Some("abc123"));
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["openSubtitles"]["apiKey"], "abc123");
    }
}
