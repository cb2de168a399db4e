use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::domain::models::VideoFileInfo;

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "asf", "avi", "divx", "f4v", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg",
    "mts", "ogm", "ogv", "rm", "rmvb", "ts", "vob", "webm", "wmv",
];

/// Every regular file below `dir_path`, sorted by path.
///
/// Symlinked directories are followed with no cycle detection, so a link
/// pointing at one of its ancestors will recurse until the OS gives up.
pub fn collect_files(dir_path: &Path) -> Result<Vec<VideoFileInfo>> {
    let mut files = Vec::new();
    collect_files_helper(dir_path, &mut files)?;
    files.sort_by(|a, b| a.source_path.cmp(&b.source_path));
    Ok(files)
}

pub fn collect_video_files(dir_path: &Path) -> Result<Vec<VideoFileInfo>> {
    let videos: Vec<VideoFileInfo> = collect_files(dir_path)?
        .into_iter()
        .filter(is_video)
        .collect();
    log::debug!("Found {} video file(s) under {}", videos.len(), dir_path.display());
    Ok(videos)
}

fn is_video(file: &VideoFileInfo) -> bool {
    let extension = file.extension.to_lowercase();
    VIDEO_EXTENSIONS.contains(&extension.as_str())
}

fn collect_files_helper(dir_path: &Path, files: &mut Vec<VideoFileInfo>) -> Result<()> {
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_files_helper(&path, files)?;
        } else if path.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let (file_name, extension) = split_extension(&name);
            files.push(VideoFileInfo {
                source_path: path,
                file_name: file_name.to_string(),
                extension: extension.to_string(),
            });
        }
    }

    Ok(())
}

/// Split on the last `.`; names without one have an empty extension.
fn split_extension(name: &str) -> (&str, &str) {
    name.rsplit_once('.').unwrap_or((name, ""))
}
