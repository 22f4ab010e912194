use bp_cards::{Hole, Rank};

/// Lexicographic index of the unordered pair `(hi, lo)`, `hi > lo`, among
/// all 78 such pairs drawn from `0..13`: the standard triangular-number
/// combination rank, `hi*(hi-1)/2 + lo`.
fn pair_index(hi: u8, lo: u8) -> u16 {
    (hi as u16) * (hi as u16 - 1) / 2 + lo as u16
}

/// Maps a hole hand to one of the 169 canonical preflop starting-hand
/// classes (the identity abstraction spec.md §3/§4.4 requires: no table
/// lookup, no external isomorphism indexer, since every suit permutation of
/// a given rank pair and suitedness is strategically identical preflop).
///
/// Layout: pairs occupy `0..13` (one class per rank), suited combos occupy
/// `13..91` (78 classes), offsuit combos occupy `91..169` (78 classes).
pub fn preflop_class(hole: Hole) -> u16 {
    let hi = u8::from(hole.high().rank());
    let lo = u8::from(hole.low().rank());
    if hi == lo {
        hi as u16
    } else if hole.high().suit() == hole.low().suit() {
        13 + pair_index(hi, lo)
    } else {
        13 + 78 + pair_index(hi, lo)
    }
}

/// Number of preflop classes. Re-exported for callers that would otherwise
/// hardcode `169`.
pub const N_PREFLOP_CLASSES: u16 = 169;

/// Number of the 1326 canonical hole combos that collapse onto `class`: 6
/// for a pocket pair, 4 for a suited combo, 12 for an offsuit combo. Used to
/// weight per-class strategy reports back into a combo-frequency estimate
/// without iterating all 1326 combos individually.
pub fn combos_per_class(class: u16) -> u8 {
    if class < 13 {
        6
    } else if class < 13 + 78 {
        4
    } else {
        12
    }
}

#[allow(dead_code)]
fn all_ranks_hi_lo() -> impl Iterator<Item = (Rank, Rank)> {
    Rank::all().into_iter().enumerate().flat_map(|(hi_idx, hi)| {
        Rank::all().into_iter().take(hi_idx + 1).map(move |lo| (hi, lo))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_cards::{Card, Suit};

    fn hole(hi: Rank, hi_suit: Suit, lo: Rank, lo_suit: Suit) -> Hole {
        Hole::from((Card::from((hi, hi_suit)), Card::from((lo, lo_suit))))
    }

    /// Every distinct (rank pair, suitedness) combination maps to a unique
    /// class, and there are exactly 169 of them.
    #[test]
    fn partitions_into_169_distinct_classes() {
        let mut seen = std::collections::HashSet::new();
        for (hi, lo) in all_ranks_hi_lo() {
            if hi == lo {
                seen.insert(preflop_class(hole(hi, Suit::C, lo, Suit::D)));
            } else {
                seen.insert(preflop_class(hole(hi, Suit::C, lo, Suit::C)));
                seen.insert(preflop_class(hole(hi, Suit::C, lo, Suit::D)));
            }
        }
        assert_eq!(seen.len(), N_PREFLOP_CLASSES as usize);
        assert!(seen.iter().all(|&c| c < N_PREFLOP_CLASSES));
    }

    /// Suit permutations of the same rank pair and suitedness collapse to
    /// one class; card order within the hole doesn't matter either.
    #[test]
    fn suit_and_order_invariant() {
        let a = hole(Rank::Ace, Suit::S, Rank::King, Suit::S);
        let b = hole(Rank::King, Suit::H, Rank::Ace, Suit::H);
        assert_eq!(preflop_class(a), preflop_class(b));

        let c = hole(Rank::Ace, Suit::S, Rank::King, Suit::D);
        assert_ne!(preflop_class(a), preflop_class(c));
    }

    /// Pocket pairs occupy the first 13 classes, one per rank.
    #[test]
    fn pairs_occupy_first_thirteen_classes() {
        for rank in Rank::all() {
            let class = preflop_class(hole(rank, Suit::C, rank, Suit::D));
            assert!(class < 13);
        }
    }

    /// Combo counts per class sum to the full 1326-combo deck.
    #[test]
    fn combo_counts_sum_to_1326() {
        let total: u32 = (0..N_PREFLOP_CLASSES).map(|c| combos_per_class(c) as u32).sum();
        assert_eq!(total, 1326);
    }
}
