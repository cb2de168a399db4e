use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::EpisodeNumber;

// Case-sensitive on purpose: lowercase "s01e02" names are not matched.
static SXXEXX: Lazy<Regex> = Lazy::new(|| Regex::new(r"S(\d\d)E(\d\d)").unwrap());

/// Pull `SxxEyy` out of a file name. Alternate spellings like `1x02` are not recognised.
pub fn parse_sxxexx(file_name: &str) -> Option<EpisodeNumber> {
    let caps = SXXEXX.captures(file_name)?;
    // `\d` also matches non-ASCII digits, which `parse` rejects.
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some(EpisodeNumber { season, episode })
}
