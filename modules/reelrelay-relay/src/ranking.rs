use reelrelay_common::{Candidate, RankedSet};

// Relative engagement value of each counter. Placeholder weights carried
// over from the original heuristic; swap the formula, not the call sites.
const LIKE_WEIGHT: i64 = 5;
const COMMENT_WEIGHT: i64 = 10;

/// Engagement score: `views + 5×likes + 10×comments`, exact integer
/// arithmetic. No clamping: a provider returning negative counts yields a
/// negative score, which is observable rather than corrected.
pub fn engagement_score(candidate: &Candidate) -> i64 {
    candidate.view_count
        + LIKE_WEIGHT * candidate.like_count
        + COMMENT_WEIGHT * candidate.comment_count
}

/// Score all candidates, order by score descending and truncate to `limit`.
/// The sort is stable, so equal scores keep provider order. Empty input
/// yields an empty set.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> RankedSet {
    for c in &mut candidates {
        c.score = engagement_score(c);
    }
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(limit);
    candidates
}
