pub mod episode;
pub mod fetcher;
pub mod placement;
pub mod ranking;
