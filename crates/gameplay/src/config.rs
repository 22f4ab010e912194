use bp_core::Chips;

/// Table-stakes parameters shared by every hand dealt in a training run.
///
/// Grounded on `examples/original_source/pluribus/poker.hpp`'s `PokerConfig`
/// and `crates/rbp-core/src/lib.rs`'s `STACK`/`B_BLIND`/`S_BLIND` constants
/// in the teacher repo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PokerConfig {
    pub n_players: usize,
    pub starting_chips: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl Default for PokerConfig {
    fn default() -> Self {
        Self { n_players: 2, starting_chips: 10_000, small_blind: 50, big_blind: 100, ante: 0 }
    }
}
