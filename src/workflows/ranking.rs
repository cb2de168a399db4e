use std::collections::HashMap;

use crate::domain::models::{SubtitleCandidate, SubtitleFile};

/// Position of `language` in the priority list, or -1 when it is not listed.
///
/// A missing language therefore outranks every listed one.
fn language_priority(priorities: &[String], language: &str) -> i64 {
    priorities
        .iter()
        .position(|p| p == language)
        .map_or(-1, |index| index as i64)
}

/// Stable sort: language priority, then ratings, then new downloads (both descending).
///
/// Unlisted languages all share priority -1; among those, a language keeps
/// the slot of its first appearance in `candidates`.
pub fn rank_candidates(candidates: &mut [SubtitleCandidate], priorities: &[String]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        first_seen.entry(candidate.language.clone()).or_insert(index);
    }

    candidates.sort_by(|a, b| {
        if a.language == b.language {
            return b
                .ratings
                .total_cmp(&a.ratings)
                .then(b.new_download_count.cmp(&a.new_download_count));
        }
        language_priority(priorities, &a.language)
            .cmp(&language_priority(priorities, &b.language))
            .then_with(|| first_seen[&a.language].cmp(&first_seen[&b.language]))
    });
}

/// The winning candidate and the first of its files.
pub fn select_best<'a>(
    candidates: &'a [SubtitleCandidate],
) -> Option<(&'a SubtitleCandidate, Option<&'a SubtitleFile>)> {
    candidates
        .first()
        .map(|candidate| (candidate, candidate.files.first()))
}
