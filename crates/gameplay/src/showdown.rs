use crate::player::Player;
use crate::state::PokerState;
use bp_cards::{Card, HandEvaluator, Hole};
use bp_core::Chips;

/// Resolves a showdown among the non-folded seats of a terminal state.
///
/// This spec has no side-pot tiers: [`PokerState::apply`] already caps
/// every call to the caller's stack, so no seat can owe more to the pot
/// than it holds, and `utility` (in the mccfr crate) measures every seat's
/// result relative to its starting stack rather than an all-in side-pot
/// ladder. Only the even-split-plus-remainder idiom is reused here; the
/// teacher's own `Showdown` additionally stratifies side pots for uneven
/// stacks, which this port does not need.
pub struct Showdown;

impl Showdown {
    /// Seats among `players` whose 7-card hand value is maximal. Skips
    /// folded seats.
    pub fn winners(
        players: &[Player],
        hands: &[Hole],
        board: [Card; 5],
        eval: &dyn HandEvaluator,
    ) -> Vec<usize> {
        let mut best: Option<u16> = None;
        let mut winners = Vec::new();
        for (i, player) in players.iter().enumerate() {
            if player.folded() {
                continue;
            }
            let [h0, h1] = hands[i].cards();
            let seven = [board[0], board[1], board[2], board[3], board[4], h0, h1];
            let value = eval.evaluate(seven);
            match best {
                Some(b) if value < b => {}
                Some(b) if value == b => winners.push(i),
                _ => {
                    best = Some(value);
                    winners.clear();
                    winners.push(i);
                }
            }
        }
        winners
    }

    /// Splits `pot` evenly among `winners`, awarding the remainder one chip
    /// at a time to the lowest-indexed (earliest-seated) winners first —
    /// the `share`/`bonus` idiom the teacher's `Showdown::distribute` uses
    /// for its own side-pot tiers, reused here for the single pot.
    pub fn distribute(pot: Chips, winners: &[usize]) -> std::collections::HashMap<usize, Chips> {
        let n = winners.len() as Chips;
        let share = pot / n;
        let bonus = pot % n;
        let mut sorted = winners.to_vec();
        sorted.sort_unstable();
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, seat)| (seat, share + if (i as Chips) < bonus { 1 } else { 0 }))
            .collect()
    }

    pub fn resolve(state: &PokerState, hands: &[Hole], board: [Card; 5], eval: &dyn HandEvaluator) -> std::collections::HashMap<usize, Chips> {
        let winners = Self::winners(state.players(), hands, board, eval);
        Self::distribute(state.pot(), &winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubEvaluator;
    impl HandEvaluator for StubEvaluator {
        fn evaluate(&self, cards: [Card; 7]) -> u16 {
            cards.iter().map(|c| u8::from(c.rank()) as u16).sum()
        }
    }

    /// An even-chip pot splits exactly with no remainder.
    #[test]
    fn even_split_no_remainder() {
        let winners = vec![0usize, 1usize];
        let split = Showdown::distribute(100, &winners);
        assert_eq!(split[&0], 50);
        assert_eq!(split[&1], 50);
    }

    /// The remainder goes one chip at a time to the lowest-indexed winners.
    #[test]
    fn remainder_favors_lowest_seats() {
        let winners = vec![2usize, 0usize, 1usize];
        let split = Showdown::distribute(100, &winners);
        // share = 33, remainder = 1: the lowest seat id (0) gets the extra chip.
        assert_eq!(split[&0], 34);
        assert_eq!(split[&1], 33);
        assert_eq!(split[&2], 33);
    }

    /// Folded seats never appear among winners.
    #[test]
    fn folded_seats_excluded() {
        let mut players = vec![Player::new(100), Player::new(100)];
        players[0].fold();
        let hands = vec![
            Hole::try_from("2c 3d").unwrap(),
            Hole::try_from("As Kd").unwrap(),
        ];
        let board = Card::parse("4h 5s 6c 7d 8h").unwrap();
        let board: [Card; 5] = board.try_into().unwrap();
        let winners = Showdown::winners(&players, &hands, board, &StubEvaluator);
        assert_eq!(winners, vec![1]);
    }
}
