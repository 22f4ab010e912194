//! Stand-in [`HandEvaluator`]/[`HandIsomorphism`] implementations.
//!
//! The real 7-card evaluator and flop/turn/river hand-isomorphism indexer are
//! external collaborators this crate only consumes through a trait boundary
//! (spec's hand-strength and abstraction subsystems are out of scope here).
//! These give the binary something runnable end to end without either one.
use bp_cards::{Card, HandEvaluator, HandIsomorphism};

/// Ranks a 7-card hand by category (pair, flush, ...) and top rank within
/// that category, ignoring kickers. Coarser than a real evaluator — two
/// hands in the same category with the same top rank score as ties even when
/// their kickers would actually separate them — but monotonic enough to
/// drive training against a real game tree.
pub struct DemoEvaluator;

impl HandEvaluator for DemoEvaluator {
    fn evaluate(&self, cards: [Card; 7]) -> u16 {
        let mut rank_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        for c in cards {
            rank_counts[u8::from(c.rank()) as usize] += 1;
            suit_counts[u8::from(c.suit()) as usize] += 1;
        }
        let is_flush = suit_counts.iter().any(|&n| n >= 5);
        let is_straight = has_straight(&rank_counts);

        let mut by_count: Vec<(u8, u8)> = rank_counts
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(rank, &n)| (n, rank as u8))
            .collect();
        by_count.sort_unstable_by(|a, b| b.cmp(a));
        let top_count = by_count[0].0;
        let second_count = by_count.get(1).map(|&(n, _)| n).unwrap_or(0);

        let category: u16 = if is_flush && is_straight {
            8
        } else if top_count == 4 {
            7
        } else if top_count == 3 && second_count >= 2 {
            6
        } else if is_flush {
            5
        } else if is_straight {
            4
        } else if top_count == 3 {
            3
        } else if top_count == 2 && second_count == 2 {
            2
        } else if top_count == 2 {
            1
        } else {
            0
        };
        category * 13 + by_count[0].1 as u16
    }
}

/// True if `rank_counts` (indexed `Rank::Two..=Rank::Ace` as `0..13`)
/// contains five consecutive ranks, ace playing high or low.
fn has_straight(rank_counts: &[u8; 13]) -> bool {
    let mut present = [false; 14];
    present[0] = rank_counts[12] > 0; // ace low, for the wheel (A-2-3-4-5)
    for (rank, &count) in rank_counts.iter().enumerate() {
        present[rank + 1] = count > 0;
    }
    present.windows(5).any(|w| w.iter().all(|&b| b))
}

/// Hashes hole + board cards into `0..modulus` with FNV-1a. Bounded output is
/// load-bearing: [`bp_clustering::ClusterMap::cluster`] indexes its loaded
/// tables with this value and does not bounds-check, so `modulus` must equal
/// the cluster count of whatever tables this indexer is paired with.
pub struct DemoIsomorphism {
    modulus: u64,
}

impl DemoIsomorphism {
    pub fn new(modulus: u64) -> Self {
        Self { modulus: modulus.max(1) }
    }
}

impl HandIsomorphism for DemoIsomorphism {
    fn hand_index_last(&self, cards: &[Card]) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for &c in cards {
            hash ^= u8::from(c) as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash % self.modulus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_cards::{Rank, Suit};

    /// The indexer's output never reaches `modulus`, so it's always a safe
    /// index into a table with that many rows.
    #[test]
    fn isomorphism_output_is_bounded() {
        let indexer = DemoIsomorphism::new(200);
        let cards = Card::parse("As Ks Qh 2c 3d").unwrap();
        assert!(indexer.hand_index_last(&cards) < 200);
    }

    /// A flush beats a pair under the coarse category ordering.
    #[test]
    fn flush_outranks_pair() {
        let eval = DemoEvaluator;
        let flush = [
            Card::from((Rank::Two, Suit::S)),
            Card::from((Rank::Five, Suit::S)),
            Card::from((Rank::Eight, Suit::S)),
            Card::from((Rank::Jack, Suit::S)),
            Card::from((Rank::King, Suit::S)),
            Card::from((Rank::Three, Suit::C)),
            Card::from((Rank::Four, Suit::D)),
        ];
        let pair = [
            Card::from((Rank::Ace, Suit::S)),
            Card::from((Rank::Ace, Suit::C)),
            Card::from((Rank::Two, Suit::D)),
            Card::from((Rank::Five, Suit::H)),
            Card::from((Rank::Eight, Suit::C)),
            Card::from((Rank::Jack, Suit::D)),
            Card::from((Rank::Nine, Suit::H)),
        ];
        assert!(eval.evaluate(flush) > eval.evaluate(pair));
    }
}
