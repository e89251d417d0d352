//! Ranking of scored candidates.

use crate::score::CpeCandidate;

/// Sorts candidates by composite score, descending, and truncates to
/// `top_n`.
///
/// The sort is stable: candidates with equal scores keep their catalog
/// order, which is newest-first for most keyword queries and the order
/// security consumers want on ties.
pub fn rank(mut candidates: Vec<CpeCandidate>, top_n: usize) -> Vec<CpeCandidate> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(top_n);
    candidates
}
