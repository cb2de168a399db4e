use std::fmt;
use std::path::PathBuf;

/// A video discovered during the directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFileInfo {
    pub source_path: PathBuf,
    /// File name without its extension.
    pub file_name: String,
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Imdb,
    Tmdb,
}

impl IdType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "imdb" => Some(IdType::Imdb),
            "tmdb" => Some(IdType::Tmdb),
            _ => None,
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdType::Imdb => write!(f, "imdb"),
            IdType::Tmdb => write!(f, "tmdb"),
        }
    }
}

/// What kind of title the external id refers to, as chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Tv => write!(f, "tv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeNumber {
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaQuery {
    Movie,
    Episode(EpisodeNumber),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub external_id: u64,
    pub id_type: IdType,
    pub media: MediaQuery,
    /// Priority order; the wire form is sorted separately.
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleFile {
    pub file_id: u64,
    pub file_name: String,
}

/// One search result, flattened from the API's `{id, type, attributes}` shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCandidate {
    pub id: String,
    pub kind: String,
    pub language: String,
    pub download_count: u64,
    pub new_download_count: u64,
    pub hd: bool,
    pub fps: Option<f64>,
    pub from_trusted: bool,
    pub url: String,
    pub ratings: f64,
    pub votes: u64,
    pub files: Vec<SubtitleFile>,
}

/// Result of exchanging a file id for a direct link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub link: String,
    pub file_name: String,
    pub remaining: Option<i64>,
    pub rest_time: Option<String>,
}
