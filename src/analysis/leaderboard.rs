//! Leaderboard ranking.

use serde::Serialize;

use crate::model::UserRecord;

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Contributor name
    pub username: String,
    /// Total persisted samples
    pub count: u64,
    /// 1-based rank by descending count
    pub rank: usize,
}

/// Ranks contributors by descending count.
///
/// The sort is stable, so ties keep the input enumeration order, and ranks
/// are consecutive (tied counts do not share a rank). Callers that want a
/// deterministic tie order must pass a deterministically ordered slice.
pub fn rank_leaderboard(users: &[(String, UserRecord)]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|(username, record)| LeaderboardEntry {
            username: username.clone(),
            count: record.contribution_count,
            rank: 0,
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(count: u64) -> UserRecord {
        UserRecord {
            contribution_count: count,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_descending_order_with_stable_ties() {
        let users = vec![
            ("a".to_string(), user(3)),
            ("b".to_string(), user(7)),
            ("c".to_string(), user(7)),
            ("d".to_string(), user(1)),
        ];

        let ranked = rank_leaderboard(&users);
        let order: Vec<(&str, u64, usize)> = ranked
            .iter()
            .map(|e| (e.username.as_str(), e.count, e.rank))
            .collect();
        assert_eq!(
            order,
            vec![("b", 7, 1), ("c", 7, 2), ("a", 3, 3), ("d", 1, 4)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_leaderboard(&[]).is_empty());
    }

    #[test]
    fn test_single_user_ranks_first() {
        let users = vec![("solo".to_string(), user(42))];
        let ranked = rank_leaderboard(&users);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].count, 42);
    }
}
