//! Deterministic round pairing
//!
//! Pure function of (roster, round): the same alive set and round number
//! always produce the same partition, which is what makes replays
//! reconstructable. The shuffle is a fixed linear-congruential generator
//! seeded with the round number; an odd roster donates one bye whose slot
//! rotates with the round so no agent keeps drawing it.

use crate::types::{ActiveAgent, Matchup, MatchupKind};

// Numerical Recipes LCG constants
const LCG_MULT: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// Partition the non-eliminated agents of `agents` into matchups for
/// `round`. Returned matchups hold indices into `agents`. Fewer than two
/// alive agents yields an empty list (terminal condition upstream).
pub fn create_matchups(agents: &[ActiveAgent], round: u32) -> Vec<Matchup> {
    let mut alive: Vec<usize> = agents
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.eliminated)
        .map(|(i, _)| i)
        .collect();

    if alive.len() < 2 {
        return Vec::new();
    }

    seeded_shuffle(&mut alive, round);

    let mut matchups = Vec::with_capacity(alive.len() / 2 + 1);

    if alive.len() % 2 == 1 {
        let bye_index = round as usize % alive.len();
        let bye = alive.remove(bye_index);
        matchups.push(Matchup {
            kind: MatchupKind::Bye,
            agents: vec![bye],
        });
    }

    for pair in alive.chunks_exact(2) {
        matchups.push(Matchup {
            kind: MatchupKind::HeadToHead,
            agents: vec![pair[0], pair[1]],
        });
    }

    matchups
}

/// Fisher-Yates driven by an LCG stream seeded with `seed`.
fn seeded_shuffle(items: &mut [usize], seed: u32) {
    let mut s = seed;
    for i in (1..items.len()).rev() {
        s = s.wrapping_mul(LCG_MULT).wrapping_add(LCG_INC);
        let j = s as usize % (i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Agent;

    fn make_roster(count: usize) -> Vec<ActiveAgent> {
        (0..count)
            .map(|i| {
                ActiveAgent::new(Agent {
                    id: format!("agent-{}", i),
                    display_id: format!("display-{}", i),
                    name: format!("Agent {}", i),
                    personality: String::new(),
                    system_prompt: String::new(),
                    avatar_seed: String::new(),
                })
            })
            .collect()
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let roster = make_roster(6);
        let first = create_matchups(&roster, 3);
        let second = create_matchups(&roster, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fewer_than_two_alive_is_empty() {
        let roster = make_roster(1);
        assert!(create_matchups(&roster, 1).is_empty());

        let mut roster = make_roster(3);
        roster[0].eliminated = true;
        roster[2].eliminated = true;
        assert!(create_matchups(&roster, 1).is_empty());
    }

    #[test]
    fn test_even_roster_pairs_everyone() {
        let roster = make_roster(4);
        let matchups = create_matchups(&roster, 1);
        assert_eq!(matchups.len(), 2);
        assert!(matchups.iter().all(|m| m.kind == MatchupKind::HeadToHead));

        let mut seen: Vec<usize> = matchups.iter().flat_map(|m| m.agents.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_odd_roster_gets_exactly_one_bye() {
        let roster = make_roster(5);
        let matchups = create_matchups(&roster, 2);
        let byes = matchups
            .iter()
            .filter(|m| m.kind == MatchupKind::Bye)
            .count();
        assert_eq!(byes, 1);

        let mut seen: Vec<usize> = matchups.iter().flat_map(|m| m.agents.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bye_rotates_across_rounds() {
        let roster = make_roster(5);
        let mut bye_agents = std::collections::HashSet::new();
        for round in 1..=5 {
            let matchups = create_matchups(&roster, round);
            let bye = matchups
                .iter()
                .find(|m| m.kind == MatchupKind::Bye)
                .expect("odd roster must have a bye");
            bye_agents.insert(bye.agents[0]);
        }
        assert!(
            bye_agents.len() > 1,
            "bye should not always fall on the same agent"
        );
    }

    #[test]
    fn test_eliminated_agents_are_excluded() {
        let mut roster = make_roster(5);
        roster[2].eliminated = true;
        let matchups = create_matchups(&roster, 1);
        assert!(matchups.iter().all(|m| !m.agents.contains(&2)));
        assert_eq!(matchups.len(), 2);
    }
}
