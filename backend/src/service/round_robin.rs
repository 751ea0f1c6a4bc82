//! Round-robin scheduling by the circle method.
//!
//! The roster is laid out in slots. An odd roster gets a trailing bye slot so
//! that the slot count `n` is even. Each of the `n - 1` rounds pairs slot `i`
//! with slot `n - 1 - i`; afterwards slot 0 stays put and the remaining slots
//! rotate one step (the last slot moves to position 1). Pairs that include the
//! bye produce no matchup.

/// One scheduled pairing. `round` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub round: i32,
    pub player1_id: i32,
    pub player2_id: i32,
}

/// Number of rounds the schedule for `roster_size` players spans.
pub fn round_count(roster_size: usize) -> usize {
    if roster_size == 0 {
        return 0;
    }
    let slots = roster_size + roster_size % 2;
    slots - 1
}

/// Build the full schedule for the given roster order.
pub fn schedule(player_ids: &[i32]) -> Vec<Pairing> {
    let mut slots: Vec<Option<i32>> = player_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let n = slots.len();
    let mut pairings = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for round in 1..n {
        for i in 0..n / 2 {
            if let (Some(player1_id), Some(player2_id)) = (slots[i], slots[n - 1 - i]) {
                pairings.push(Pairing {
                    round: round as i32,
                    player1_id,
                    player2_id,
                });
            }
        }
        slots[1..].rotate_right(1);
    }

    pairings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn pairs_in_round(pairings: &[Pairing], round: i32) -> Vec<(i32, i32)> {
        pairings
            .iter()
            .filter(|p| p.round == round)
            .map(|p| (p.player1_id, p.player2_id))
            .collect()
    }

    fn unordered(p: &Pairing) -> (i32, i32) {
        (p.player1_id.min(p.player2_id), p.player1_id.max(p.player2_id))
    }

    #[test]
    fn test_four_player_rotation() {
        // A=1, B=2, C=3, D=4
        let pairings = schedule(&[1, 2, 3, 4]);

        assert_eq!(pairings.len(), 6);
        assert_eq!(pairs_in_round(&pairings, 1), vec![(1, 4), (2, 3)]);
        assert_eq!(pairs_in_round(&pairings, 2), vec![(1, 3), (4, 2)]);
        assert_eq!(pairs_in_round(&pairings, 3), vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_even_rosters_meet_everyone_once() {
        for n in (2..=16).step_by(2) {
            let roster: Vec<i32> = (1..=n).collect();
            let pairings = schedule(&roster);

            let rounds: HashSet<i32> = pairings.iter().map(|p| p.round).collect();
            assert_eq!(rounds.len(), n as usize - 1, "rounds for n={}", n);
            assert_eq!(round_count(n as usize), n as usize - 1);

            let unique: HashSet<(i32, i32)> = pairings.iter().map(unordered).collect();
            assert_eq!(unique.len(), pairings.len(), "duplicate pair for n={}", n);
            assert_eq!(pairings.len(), (n * (n - 1) / 2) as usize);

            // Nobody plays twice in a round
            for round in rounds {
                let mut seen = HashSet::new();
                for (a, b) in pairs_in_round(&pairings, round) {
                    assert!(seen.insert(a));
                    assert!(seen.insert(b));
                }
                assert_eq!(seen.len(), n as usize);
            }
        }
    }

    #[test]
    fn test_odd_rosters_sit_out_once() {
        for n in (1..=15).step_by(2) {
            let roster: Vec<i32> = (1..=n).collect();
            let pairings = schedule(&roster);

            let expected_rounds = if n == 1 { 1 } else { n as usize };
            assert_eq!(round_count(n as usize), expected_rounds);

            let unique: HashSet<(i32, i32)> = pairings.iter().map(unordered).collect();
            assert_eq!(unique.len(), pairings.len());
            assert_eq!(pairings.len(), (n * (n - 1) / 2) as usize);

            let mut appearances: HashMap<i32, usize> = HashMap::new();
            for p in &pairings {
                *appearances.entry(p.player1_id).or_default() += 1;
                *appearances.entry(p.player2_id).or_default() += 1;
            }
            // Playing n - 1 of n rounds means exactly one round off.
            for id in &roster {
                let played = appearances.get(id).copied().unwrap_or(0);
                assert_eq!(played, n as usize - 1, "player {} with n={}", id, n);
                assert_eq!(expected_rounds - played, 1);
            }
        }
    }

    #[test]
    fn test_three_players_use_a_bye() {
        let pairings = schedule(&[7, 8, 9]);
        assert_eq!(pairs_in_round(&pairings, 1), vec![(8, 9)]);
        assert_eq!(pairs_in_round(&pairings, 2), vec![(7, 9)]);
        assert_eq!(pairs_in_round(&pairings, 3), vec![(7, 8)]);
    }

    #[test]
    fn test_degenerate_rosters() {
        assert!(schedule(&[]).is_empty());
        assert_eq!(round_count(0), 0);
        // A single player only ever meets the bye.
        assert!(schedule(&[42]).is_empty());
        assert_eq!(schedule(&[1, 2]), vec![Pairing { round: 1, player1_id: 1, player2_id: 2 }]);
    }
}
