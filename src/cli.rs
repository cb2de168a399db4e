use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::infra::opensubtitles::OPENSUBTITLES_API_BASE;

#[derive(Parser)]
#[command(name = "subtitle-downloader")]
#[command(version)]
#[command(about = "Find and download subtitles for every video under a directory from OpenSubtitles")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Running without a subcommand downloads
    #[command(flatten)]
    pub download: DownloadArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store the OpenSubtitles API key
    Config(ConfigArgs),
    /// Download subtitles for every video under the directory
    Download(DownloadArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// OpenSubtitles API key
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Args, Clone)]
pub struct DownloadArgs {
    /// IMDb or TMDB id of the movie or series, e.g. tt0118375
    #[arg(long)]
    pub id: Option<String>,

    /// imdb or tmdb (default imdb)
    #[arg(long = "id-type")]
    pub id_type: Option<String>,

    /// movie or tv (default tv)
    #[arg(long = "type")]
    pub media_type: Option<String>,

    /// Preferred subtitle languages, most wanted first
    #[arg(long, value_delimiter = ',', default_value = "en")]
    pub languages: Vec<String>,

    /// Directory to scan for videos (default: current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[arg(long = "api-url", default_value = OPENSUBTITLES_API_BASE, hide = true)]
    pub api_url: String,
}
