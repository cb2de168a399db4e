use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::VideoFileInfo;

const DEFAULT_SUBTITLE_EXTENSION: &str = "srt";
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "vtt"];

/// `<video base name>.<language>.<extension>`
pub fn generate_filename(video_name: &str, language: &str, extension: &str) -> String {
    format!("{video_name}.{language}.{extension}")
}

/// Extension of a server-reported subtitle file name, or `srt` when the
/// name does not end in a known subtitle extension.
///
/// Search results often carry bare release names such as
/// `Show.S01E02.720p.WEB-DL.x264-GRP`, whose last dot segment is not an extension.
pub fn subtitle_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, extension))
            if SUBTITLE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension)) =>
        {
            extension
        }
        _ => DEFAULT_SUBTITLE_EXTENSION,
    }
}

/// Where the subtitle for `video` goes: next to the video itself.
pub fn destination(video: &VideoFileInfo, language: &str, extension: &str) -> PathBuf {
    let directory = video.source_path.parent().unwrap_or(Path::new("."));
    directory.join(generate_filename(&video.file_name, language, extension))
}

/// One whole-buffer write; an interrupted write leaves a truncated file behind.
pub fn write_subtitle(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write subtitle {}", path.display()))
}
