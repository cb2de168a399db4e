use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::{
    DownloadLink, IdType, MediaQuery, SearchCriteria, SubtitleCandidate, SubtitleFile,
};
use crate::infra::http::{HttpClient, HttpError};

pub const OPENSUBTITLES_API_BASE: &str = "https://api.opensubtitles.com";

const USER_AGENT: &str = concat!("subtitle-downloader v", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The resolve endpoint answered without a usable file name; carries the raw body.
    #[error("{0}")]
    MissingFileName(String),
}

/// The remote calls the download workflow needs.
pub trait SubtitleApi {
    fn search(&self, criteria: &SearchCriteria) -> Result<SearchResponse, ApiError>;

    /// Exchange a file id for a one-time link. Consumes download quota.
    fn resolve_download(&self, file_id: u64) -> Result<DownloadLink, ApiError>;

    fn fetch(&self, link: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Default, Serialize, PartialEq)]
struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    imdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_imdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    season_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    episode_number: Option<u32>,
    languages: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl SearchParams {
    fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut params = SearchParams {
            languages: canonical_languages(&criteria.languages),
            ..SearchParams::default()
        };
        let id = Some(criteria.external_id);

        match criteria.media {
            MediaQuery::Movie => {
                params.kind = "movie";
                match criteria.id_type {
                    IdType::Imdb => params.imdb_id = id,
                    IdType::Tmdb => params.tmdb_id = id,
                }
            }
            MediaQuery::Episode(number) => {
                params.kind = "episode";
                match criteria.id_type {
                    IdType::Imdb => params.parent_imdb_id = id,
                    IdType::Tmdb => params.parent_tmdb_id = id,
                }
                params.season_number = Some(number.season);
                params.episode_number = Some(number.episode);
            }
        }
        params
    }
}

/// Sorted and comma-joined, leaving the caller's priority order alone.
fn canonical_languages(languages: &[String]) -> String {
    let mut sorted = languages.to_vec();
    sorted.sort();
    sorted.join(",")
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub data: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub attributes: SearchAttributes,
}

// The API sends null for many of these on older uploads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchAttributes {
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub download_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub new_download_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub hd: bool,
    pub fps: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub from_trusted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ratings: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub votes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub files: Vec<SearchFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchFile {
    pub file_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchResponse {
    pub fn into_candidates(self) -> Vec<SubtitleCandidate> {
        self.data
            .into_iter()
            .map(|item| {
                let attributes = item.attributes;
                SubtitleCandidate {
                    id: item.id,
                    kind: item.kind,
                    language: attributes.language,
                    download_count: attributes.download_count,
                    new_download_count: attributes.new_download_count,
                    hd: attributes.hd,
                    fps: attributes.fps,
                    from_trusted: attributes.from_trusted,
                    url: attributes.url,
                    ratings: attributes.ratings,
                    votes: attributes.votes,
                    files: attributes
                        .files
                        .into_iter()
                        .map(|file| SubtitleFile {
                            file_id: file.file_id,
                            file_name: file.file_name,
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct DownloadRequest {
    file_id: u64,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    remaining: Option<i64>,
    #[serde(default)]
    rest_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenSubtitlesClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenSubtitlesClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl SubtitleApi for OpenSubtitlesClient {
    fn search(&self, criteria: &SearchCriteria) -> Result<SearchResponse, ApiError> {
        let params = SearchParams::from_criteria(criteria);
        log::debug!("Searching subtitles with {params:?}");

        let response: SearchResponse = self.http.get_json(
            &format!("{}/api/v1/subtitles", self.base_url),
            &params,
            &[("Api-Key", self.api_key.as_str()), ("User-Agent", USER_AGENT)],
        )?;
        log::debug!(
            "Search returned {} of {} results (page {}/{}, {} per page)",
            response.data.len(),
            response.total_count,
            response.page,
            response.total_pages,
            response.per_page
        );
        Ok(response)
    }

    fn resolve_download(&self, file_id: u64) -> Result<DownloadLink, ApiError> {
        let body = self.http.post_text(
            &format!("{}/api/v1/download", self.base_url),
            &DownloadRequest { file_id },
            &[
                ("Accept", "application/json"),
                ("Content-Type", "application/json"),
                ("Api-Key", self.api_key.as_str()),
                ("User-Agent", USER_AGENT),
            ],
        )?;
        parse_download_response(&body)
    }

    fn fetch(&self, link: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.http.get_bytes(link)?)
    }
}

fn parse_download_response(body: &str) -> Result<DownloadLink, ApiError> {
    let response: DownloadResponse = serde_json::from_str(body)
        .map_err(|source| HttpError::Json { method: "post", source })?;

    let file_name = response.file_name.filter(|name| !name.is_empty());
    let link = response.link.filter(|link| !link.is_empty());
    let (Some(file_name), Some(link)) = (file_name, link) else {
        return Err(ApiError::MissingFileName(body.to_string()));
    };

    Ok(DownloadLink {
        link,
        file_name,
        remaining: response.remaining,
        rest_time: response.rest_time,
    })
}
