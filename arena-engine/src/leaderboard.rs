//! Persistent skill ratings via pairwise ELO
//!
//! A game's final standings fold into per-agent ratings: every unordered
//! pair is treated as a head-to-head the better-placed agent won, and
//! each pair's delta is scaled by 1/(N-1) so total rating movement stays
//! comparable across roster sizes.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use serde::Serialize;

use arena_core::types::Standing;

pub const DEFAULT_RATING: f64 = 1000.0;
pub const K_FACTOR: f64 = 32.0;

/// One agent's lifetime record. Created on first game, monotonically
/// updated, never deleted here (retention is an external policy).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub agent_id: String,
    pub elo_rating: i64,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_score: u64,
    pub last_played_at: u64,
}

/// Probability that a rating-A player beats a rating-B player.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

#[derive(Default)]
pub struct Leaderboard {
    entries: RwLock<FxHashMap<String, LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a game's final standings into the ratings. Standings must be
    /// ordered by placement; fewer than two entries is a no-op.
    pub fn update_from_game(&self, standings: &[Standing]) {
        if standings.len() < 2 {
            return;
        }

        let mut entries = self.entries.write().unwrap();

        let ratings: FxHashMap<&str, f64> = standings
            .iter()
            .map(|s| {
                let current = entries
                    .get(&s.agent_id)
                    .map(|e| e.elo_rating as f64)
                    .unwrap_or(DEFAULT_RATING);
                (s.agent_id.as_str(), current)
            })
            .collect();

        // Accumulate deltas from every unordered pair before applying
        let mut deltas: FxHashMap<&str, f64> = FxHashMap::default();
        let scale = (standings.len() - 1) as f64;
        for i in 0..standings.len() {
            for j in (i + 1)..standings.len() {
                let a = &standings[i];
                let b = &standings[j];
                let expected_a = expected_score(ratings[a.agent_id.as_str()], ratings[b.agent_id.as_str()]);
                let expected_b = 1.0 - expected_a;

                // a placed higher: actual 1 vs 0
                *deltas.entry(a.agent_id.as_str()).or_default() +=
                    K_FACTOR * (1.0 - expected_a) / scale;
                *deltas.entry(b.agent_id.as_str()).or_default() +=
                    K_FACTOR * (0.0 - expected_b) / scale;
            }
        }

        let now = unix_now();
        for standing in standings {
            let new_rating =
                (ratings[standing.agent_id.as_str()] + deltas[standing.agent_id.as_str()]).round();
            let won = standing.placement == 1;

            let entry = entries
                .entry(standing.agent_id.clone())
                .or_insert_with(|| LeaderboardEntry {
                    agent_id: standing.agent_id.clone(),
                    elo_rating: DEFAULT_RATING as i64,
                    total_games: 0,
                    total_wins: 0,
                    total_score: 0,
                    last_played_at: 0,
                });
            entry.elo_rating = new_rating as i64;
            entry.total_games += 1;
            if won {
                entry.total_wins += 1;
            }
            entry.total_score += standing.score as u64;
            entry.last_played_at = now;
        }
    }

    pub fn get(&self, agent_id: &str) -> Option<LeaderboardEntry> {
        self.entries.read().unwrap().get(agent_id).cloned()
    }

    /// Entries sorted by rating descending, paginated.
    pub fn top(&self, limit: usize, offset: usize) -> Vec<LeaderboardEntry> {
        let entries = self.entries.read().unwrap();
        let mut all: Vec<LeaderboardEntry> = entries.values().cloned().collect();
        all.sort_by(|a, b| b.elo_rating.cmp(&a.elo_rating).then(a.agent_id.cmp(&b.agent_id)));
        all.into_iter().skip(offset).take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(agent_id: &str, score: u32, placement: u32) -> Standing {
        Standing {
            agent_id: agent_id.to_string(),
            display_id: format!("display-{}", agent_id),
            name: agent_id.to_string(),
            score,
            placement,
            eliminated_round: None,
        }
    }

    #[test]
    fn test_expected_score_midpoint() {
        assert!((expected_score(1000.0, 1000.0) - 0.5).abs() < 1e-9);
        assert!(expected_score(1200.0, 1000.0) > 0.7);
        // Symmetry
        let e = expected_score(1100.0, 900.0);
        assert!((e + expected_score(900.0, 1100.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_agent_game_moves_ratings_symmetrically() {
        let board = Leaderboard::new();
        board.update_from_game(&[standing("a", 120, 1), standing("b", 80, 2)]);

        let a = board.get("a").unwrap();
        let b = board.get("b").unwrap();
        // Equal starting ratings: K * 0.5 / (N-1) = 16 each way
        assert_eq!(a.elo_rating, 1016);
        assert_eq!(b.elo_rating, 984);
        assert_eq!(a.total_wins, 1);
        assert_eq!(b.total_wins, 0);
        assert_eq!(a.total_games, 1);
        assert_eq!(a.total_score, 120);
    }

    #[test]
    fn test_single_entry_is_noop() {
        let board = Leaderboard::new();
        board.update_from_game(&[standing("a", 100, 1)]);
        assert!(board.is_empty());
    }

    #[test]
    fn test_larger_roster_does_not_swing_harder() {
        let two = Leaderboard::new();
        two.update_from_game(&[standing("a", 100, 1), standing("b", 50, 2)]);
        let two_delta = two.get("a").unwrap().elo_rating - 1000;

        let four = Leaderboard::new();
        four.update_from_game(&[
            standing("a", 100, 1),
            standing("b", 90, 2),
            standing("c", 80, 3),
            standing("d", 70, 4),
        ]);
        let four_delta = four.get("a").unwrap().elo_rating - 1000;

        // Winner of a 4-agent game gains the same as a 2-agent winner:
        // 3 pairwise wins, each scaled by 1/3
        assert_eq!(two_delta, four_delta);
    }

    #[test]
    fn test_ratings_accumulate_across_games() {
        let board = Leaderboard::new();
        board.update_from_game(&[standing("a", 100, 1), standing("b", 50, 2)]);
        board.update_from_game(&[standing("a", 100, 1), standing("b", 50, 2)]);

        let a = board.get("a").unwrap();
        assert_eq!(a.total_games, 2);
        assert_eq!(a.total_wins, 2);
        assert!(a.elo_rating > 1016);
        // Second win against a now-lower-rated opponent pays less
        assert!(a.elo_rating < 1032);
    }

    #[test]
    fn test_top_sorts_by_rating_descending() {
        let board = Leaderboard::new();
        board.update_from_game(&[
            standing("winner", 100, 1),
            standing("middle", 80, 2),
            standing("last", 60, 3),
        ]);

        let top = board.top(10, 0);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].agent_id, "winner");
        assert_eq!(top[2].agent_id, "last");

        let paged = board.top(1, 1);
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].agent_id, "middle");
    }
}
