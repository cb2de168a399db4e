use std::path::PathBuf;
use thiserror::Error;

use crate::domain::models::{IdType, MediaKind, MediaQuery, SearchCriteria, VideoFileInfo};
use crate::infra::opensubtitles::{ApiError, SubtitleApi};
use crate::workflows::{episode, placement, ranking};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fail to parse season and episode info from file name")]
    NoEpisodeInfo,
    #[error("not found")]
    NotFound,
    #[error("subtitle {0} has no downloadable file")]
    NoFiles(String),
    #[error("subtitle already exists for {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Write(#[from] anyhow::Error),
}

/// What to look up, shared by every video of one run.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub external_id: u64,
    pub id_type: IdType,
    pub kind: MediaKind,
    /// Highest priority first.
    pub languages: Vec<String>,
}

impl DownloadJob {
    fn criteria_for(&self, video: &VideoFileInfo) -> Result<SearchCriteria, FetchError> {
        let media = match self.kind {
            MediaKind::Movie => MediaQuery::Movie,
            MediaKind::Tv => {
                let number =
                    episode::parse_sxxexx(&video.file_name).ok_or(FetchError::NoEpisodeInfo)?;
                println!(
                    "  🔹 extracted info: season={} episode={}",
                    number.season, number.episode
                );
                MediaQuery::Episode(number)
            }
        };

        Ok(SearchCriteria {
            external_id: self.external_id,
            id_type: self.id_type,
            media,
            languages: self.languages.clone(),
        })
    }
}

/// Search, rank and download the best subtitle for one video.
///
/// The destination is checked before the resolve call so an existing
/// subtitle never costs download quota.
pub fn fetch_subtitle<A: SubtitleApi + ?Sized>(
    api: &A,
    job: &DownloadJob,
    video: &VideoFileInfo,
) -> Result<PathBuf, FetchError> {
    let criteria = job.criteria_for(video)?;

    let mut candidates = api.search(&criteria)?.into_candidates();
    ranking::rank_candidates(&mut candidates, &job.languages);

    let (best, file) = ranking::select_best(&candidates).ok_or(FetchError::NotFound)?;
    let file = file.ok_or_else(|| FetchError::NoFiles(best.id.clone()))?;
    println!("  🔹 found [{}] from {}", file.file_name, best.url);
    log::debug!(
        "Picked {} {} ({}): rating {} from {} votes, {} downloads ({} new), hd={}, fps={:?}, trusted={}",
        best.kind,
        best.id,
        best.language,
        best.ratings,
        best.votes,
        best.download_count,
        best.new_download_count,
        best.hd,
        best.fps,
        best.from_trusted
    );

    let expected = placement::destination(
        video,
        &best.language,
        placement::subtitle_extension(&file.file_name),
    );
    if expected.exists() {
        return Err(FetchError::AlreadyExists(expected));
    }

    let resolved = api.resolve_download(file.file_id)?;
    if let Some(remaining) = resolved.remaining {
        log::info!(
            "{remaining} downloads remaining (resets in {})",
            resolved.rest_time.as_deref().unwrap_or("unknown")
        );
    }
    let target = placement::destination(
        video,
        &best.language,
        placement::subtitle_extension(&resolved.file_name),
    );
    if target != expected && target.exists() {
        return Err(FetchError::AlreadyExists(target));
    }

    let contents = api.fetch(&resolved.link)?;
    placement::write_subtitle(&target, &contents)?;
    log::debug!("Wrote {} bytes to {}", contents.len(), target.display());
    Ok(target)
}

/// Process every video in order. A failure on one never stops the rest.
pub fn download_all<A: SubtitleApi + ?Sized>(
    api: &A,
    job: &DownloadJob,
    videos: Vec<VideoFileInfo>,
) -> Vec<Result<PathBuf, FetchError>> {
    let total = videos.len();
    let mut outcomes = Vec::with_capacity(total);

    for video in videos {
        println!("{}", video.file_name);
        let result = fetch_subtitle(api, job, &video);
        match &result {
            Ok(_) => println!("  ✅ downloaded successfully"),
            Err(e) => eprintln!("  🔺 {e}"),
        }
        outcomes.push(result);
    }

    let downloaded = outcomes.iter().filter(|result| result.is_ok()).count();
    println!("\ndownload {downloaded} subtitles from {total} files");
    outcomes
}
