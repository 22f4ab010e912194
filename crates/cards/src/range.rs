use super::card::Card;
use super::hand::Hand;
use super::hole::Hole;
use bp_core::Probability;
use std::sync::OnceLock;

/// Bijection between the 1326 canonical two-card hole combos and dense
/// array indices `0..1326`, built once and shared process-wide.
///
/// Grounded on `examples/original_source/pluribus/range.hpp`'s
/// `HoleCardIndexer`: identical enumeration order (outer card descending,
/// inner card ascending below it), reimplemented as a lazily-initialised
/// `OnceLock` singleton rather than a heap-allocated `unique_ptr`.
pub struct HoleCardIndexer {
    to_index: std::collections::HashMap<Hole, u16>,
    to_hole: Vec<Hole>,
}

impl HoleCardIndexer {
    fn build() -> Self {
        let mut to_index = std::collections::HashMap::with_capacity(1326);
        let mut to_hole = Vec::with_capacity(1326);
        for c1 in 0u8..52 {
            for c2 in 0u8..c1 {
                let hole = Hole::from((Card::from(c1), Card::from(c2))).canonical();
                to_index.insert(hole, to_hole.len() as u16);
                to_hole.push(hole);
            }
        }
        Self { to_index, to_hole }
    }

    pub fn get() -> &'static HoleCardIndexer {
        static INSTANCE: OnceLock<HoleCardIndexer> = OnceLock::new();
        INSTANCE.get_or_init(Self::build)
    }

    pub fn index(&self, hole: Hole) -> u16 {
        self.to_index[&hole.canonical()]
    }
    pub fn hole(&self, index: u16) -> Hole {
        self.to_hole[index as usize]
    }
    pub fn len(&self) -> usize {
        self.to_hole.len()
    }
}

/// Dense weighted distribution over the 1326 canonical hole-card combos.
///
/// Grounded on `examples/original_source/pluribus/range.hpp`/`range.cpp`'s
/// `PokerRange`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PokerRange {
    weights: Vec<Probability>,
}

impl PokerRange {
    /// All weights at `freq` (0 for an empty range).
    pub fn new(freq: Probability) -> Self {
        Self { weights: vec![freq; HoleCardIndexer::get().len()] }
    }
    /// Every combo weighted equally at 1.0.
    pub fn full() -> Self {
        Self::new(1.0)
    }
    pub fn add(&mut self, hole: Hole, freq: Probability) {
        self.weights[HoleCardIndexer::get().index(hole) as usize] += freq;
    }
    pub fn set(&mut self, hole: Hole, freq: Probability) {
        self.weights[HoleCardIndexer::get().index(hole) as usize] = freq;
    }
    pub fn multiply(&mut self, hole: Hole, freq: Probability) {
        self.weights[HoleCardIndexer::get().index(hole) as usize] *= freq;
    }
    pub fn frequency(&self, hole: Hole) -> Probability {
        self.weights[HoleCardIndexer::get().index(hole) as usize]
    }
    /// Sum of every weight in the range.
    pub fn n_combos(&self) -> Probability {
        self.weights.iter().sum()
    }

    /// Draws a hole hand with probability proportional to weight, after
    /// zeroing any combo that overlaps `dead`. Returns `None` (a Data
    /// error, not a panic) if every remaining weight is zero. Draws from
    /// `rng` rather than the global `rand::rng()` so a caller with a seeded
    /// generator (e.g. a trainer's per-worker `SmallRng`) gets reproducible
    /// deals.
    pub fn sample<R: rand::Rng + ?Sized>(&self, dead: Hand, rng: &mut R) -> Option<Hole> {
        let indexer = HoleCardIndexer::get();
        let masked: Vec<Probability> = (0..self.weights.len())
            .map(|i| {
                let hole = indexer.hole(i as u16);
                if dead.contains(&hole.high()) || dead.contains(&hole.low()) {
                    0.0
                } else {
                    self.weights[i]
                }
            })
            .collect();
        let total: Probability = masked.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = rng.random_range(0.0..total);
        for (i, &w) in masked.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(indexer.hole(i as u16));
            }
            target -= w;
        }
        masked
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &w)| w > 0.0)
            .map(|(i, _)| indexer.hole(i as u16))
    }
}

impl std::ops::Add for PokerRange {
    type Output = PokerRange;
    fn add(mut self, rhs: Self) -> Self::Output {
        for (a, b) in self.weights.iter_mut().zip(rhs.weights.iter()) {
            *a += b;
        }
        self
    }
}
impl std::ops::Mul for PokerRange {
    type Output = PokerRange;
    fn mul(mut self, rhs: Self) -> Self::Output {
        for (a, b) in self.weights.iter_mut().zip(rhs.weights.iter()) {
            *a *= b;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The indexer enumerates exactly the 1326 canonical combos.
    #[test]
    fn indexes_1326_combos() {
        assert_eq!(HoleCardIndexer::get().len(), 1326);
    }

    /// `full()` sums to the full combo count.
    #[test]
    fn full_range_n_combos() {
        let range = PokerRange::full();
        assert!((range.n_combos() - 1326.0).abs() < 1e-3);
    }

    /// Sampling never returns a hole that overlaps the dead-card set.
    #[test]
    fn sample_respects_dead_cards() {
        let range = PokerRange::full();
        let ace_spades = Card::try_from("As").unwrap();
        let dead = Hand::from(ace_spades);
        let mut rng = rand::rng();
        for _ in 0..200 {
            let hole = range.sample(dead, &mut rng).unwrap();
            assert!(!hole.contains(ace_spades));
        }
    }

    /// An all-dead range has nothing left to sample.
    #[test]
    fn sample_empty_when_all_dead() {
        let mut range = PokerRange::new(0.0);
        let hole = Hole::try_from("As Kh").unwrap();
        range.set(hole, 1.0);
        let mut rng = rand::rng();
        assert!(range.sample(Hand::from(Card::try_from("As").unwrap()), &mut rng).is_none());
    }
}
