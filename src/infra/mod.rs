pub mod http;
pub mod opensubtitles;
