//! Non-maximum suppression for labelled matches.

use crate::search::Match;
use std::cmp::Ordering;

fn match_cmp_desc(a: &Match, b: &Match) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.label.cmp(&b.label))
}

/// Collapses clusters of overlapping matches into their best member.
///
/// Matches are sorted by descending score and kept if no already kept match
/// with the same label lies within `radius` in Chebyshev distance. A zero
/// radius keeps everything (still sorted).
pub fn suppress_overlapping(matches: &[Match], radius: u64) -> Vec<Match> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(match_cmp_desc);
    if radius == 0 {
        return sorted;
    }

    let mut kept: Vec<Match> = Vec::new();
    'outer: for candidate in sorted {
        for existing in kept.iter().filter(|k| k.label == candidate.label) {
            let dist = candidate
                .x
                .abs_diff(existing.x)
                .max(candidate.y.abs_diff(existing.y));
            if dist <= radius {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }
    kept
}
