//! Trial scoring.
//!
//! A completed trial is scored on a linear scale derived from the trial
//! itself: with `max_rank` the highest preference rank observed across
//! all sessions, a rank-1 seat is worth `max_rank` points, rank 2 is
//! worth `max_rank - 1`, down to 1 point for the worst stated rank.
//! Unranked seats (rank 0) are worth nothing. Top choices therefore
//! dominate the total, and the simulation driver compares trials by this
//! number alone.

use crate::models::SessionAssignments;

/// Points a single seat contributes under a given scale.
#[inline]
pub fn scale_value(rank: usize, max_rank: usize) -> i64 {
    if rank == 0 || rank > max_rank {
        0
    } else {
        (max_rank - rank + 1) as i64
    }
}

/// Scores a full trial (all sessions).
///
/// The scale is recomputed from the records themselves, so trials over
/// the same roster are always compared on the same footing.
pub fn evaluate(sessions: &[SessionAssignments]) -> i64 {
    let max_rank = sessions
        .iter()
        .flat_map(|s| &s.assignments)
        .map(|a| a.preference)
        .max()
        .unwrap_or(0);

    sessions
        .iter()
        .flat_map(|s| &s.assignments)
        .map(|a| scale_value(a.preference, max_rank))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Assignment;

    fn session(ranks: &[usize]) -> SessionAssignments {
        let mut s = SessionAssignments::new(1);
        for (i, &rank) in ranks.iter().enumerate() {
            s.assignments
                .push(Assignment::new(format!("P{i}"), "Prog", rank));
        }
        s
    }

    #[test]
    fn test_scale_value() {
        assert_eq!(scale_value(1, 3), 3);
        assert_eq!(scale_value(2, 3), 2);
        assert_eq!(scale_value(3, 3), 1);
        assert_eq!(scale_value(0, 3), 0);
    }

    #[test]
    fn test_evaluate_linear_scale() {
        // max_rank = 3: ranks 1, 2, 3, 0 score 3 + 2 + 1 + 0.
        let sessions = vec![session(&[1, 2, 3, 0])];
        assert_eq!(evaluate(&sessions), 6);
    }

    #[test]
    fn test_evaluate_across_sessions() {
        let sessions = vec![session(&[1, 2]), session(&[2, 1])];
        // max_rank = 2: each rank-1 scores 2, each rank-2 scores 1.
        assert_eq!(evaluate(&sessions), 6);
    }

    #[test]
    fn test_all_unranked_scores_zero() {
        let sessions = vec![session(&[0, 0, 0])];
        assert_eq!(evaluate(&sessions), 0);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(evaluate(&[]), 0);
        assert_eq!(evaluate(&[session(&[])]), 0);
    }

    #[test]
    fn test_better_ranks_never_score_lower() {
        // Identical trials except one participant drops from their
        // first choice to their third: the score must not go up.
        let better = vec![session(&[1, 3])];
        let worse = vec![session(&[3, 3])];
        assert!(evaluate(&better) >= evaluate(&worse));
        assert_eq!(evaluate(&better), 4);
        assert_eq!(evaluate(&worse), 2);
    }
}
