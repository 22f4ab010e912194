use crate::counter::Counter;
use bp_core::{POSTFLOP_CLUSTERS, PREFLOP_CLUSTERS, Probability};
use bp_gameplay::{Action, ActionHistory, ActionProfile, PokerState};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::Ordering;

/// Base offset into a [`StrategyStorage`]'s backing chunks for one admitted
/// [`ActionHistory`]. Stable forever once recorded — growth only appends
/// new chunks, never moves or resizes an existing one. Unlike
/// `examples/original_source/pluribus/storage.hpp`'s `HistoryEntry`, there
/// is no `ready` flag: the chunk is fully allocated and zero-initialised
/// *before* it is published into the map, so presence in the map already
/// means "ready".
#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    chunk: usize,
}

/// `index()` packs a chunk id and an in-chunk offset into one `usize` (high
/// 32 bits / low 32 bits) rather than flattening every history's slots into
/// one contiguous array — the chunked layout is what gives slots a stable
/// address across growth, matching `tbb::concurrent_vector`'s guarantee
/// without needing one giant reallocating buffer.
const CHUNK_SHIFT: u32 = 32;

fn encode(chunk: usize, offset: usize) -> usize {
    debug_assert!(offset < (1usize << CHUNK_SHIFT));
    (chunk << CHUNK_SHIFT) | offset
}
fn decode(idx: usize) -> (usize, usize) {
    (idx >> CHUNK_SHIFT, idx & ((1usize << CHUNK_SHIFT) - 1))
}

/// Number of abstraction clusters a history at `round` is indexed over:
/// 169 canonical preflop classes while still on the preflop street, 200
/// postflop clusters for any history that has seen the flop or later.
/// Resolves spec §9's preflop-cluster-count ambiguity (see `DESIGN.md`).
pub fn n_clusters_for_round(round: u8) -> usize {
    if round == 0 { PREFLOP_CLUSTERS } else { POSTFLOP_CLUSTERS }
}

/// Concurrent, append-only map from [`ActionHistory`] to a contiguous block
/// of `n_clusters * n_actions` atomic counters.
///
/// Grounded on `examples/original_source/pluribus/storage.hpp`'s
/// `StrategyStorage<T>`: the double-checked-locking admission path is
/// reproduced exactly (fast lock-free read via a concurrent map, a mutex
/// serialising first-write growth), but the backing store is a
/// `Vec<Box<[T::Atomic]>>` of per-history chunks rather than one
/// `tbb::concurrent_vector`, and admission needs no `ready` flag because
/// growth completes before the history is published (see [`HistoryEntry`]).
pub struct StrategyStorage<T: Counter> {
    chunks: RwLock<Vec<Box<[T::Atomic]>>>,
    history_map: DashMap<ActionHistory, HistoryEntry>,
    action_profile: ActionProfile,
    grow: Mutex<()>,
}

/// Serde-friendly snapshot of a [`StrategyStorage`]'s contents, produced by
/// [`StrategyStorage::to_dto`] and consumed by [`StrategyStorage::from_dto`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageDto {
    chunks: Vec<Vec<f64>>,
    histories: Vec<(ActionHistory, usize)>,
}

impl<T: Counter> StrategyStorage<T> {
    pub fn new(action_profile: ActionProfile) -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
            history_map: DashMap::new(),
            action_profile,
            grow: Mutex::new(()),
        }
    }

    fn n_actions(&self, state: &PokerState) -> usize {
        state.valid_actions(&self.action_profile).len()
    }

    /// Writer path: returns the slot index for `(state.actions(), cluster,
    /// action_idx)`, admitting the history (and zero-filling its block of
    /// `n_clusters_for_round(state.round()) * n_actions` counters) on first
    /// use. Concurrent callers racing to admit the same new history block
    /// on `grow` until the winner publishes it; every other `index` call is
    /// a lock-free map lookup.
    pub fn index(&self, state: &PokerState, cluster: u16, action_idx: usize) -> usize {
        let n_actions = self.n_actions(state);
        if let Some(entry) = self.history_map.get(state.actions()) {
            return encode(entry.chunk, cluster as usize * n_actions + action_idx);
        }

        let _guard = self.grow.lock();
        if let Some(entry) = self.history_map.get(state.actions()) {
            return encode(entry.chunk, cluster as usize * n_actions + action_idx);
        }
        let n_clusters = n_clusters_for_round(state.round());
        let block: Vec<T::Atomic> = (0..n_clusters * n_actions).map(|_| T::zero_atomic()).collect();
        let chunk = {
            let mut chunks = self.chunks.write();
            chunks.push(block.into_boxed_slice());
            chunks.len() - 1
        };
        self.history_map.insert(state.actions().clone(), HistoryEntry { chunk });
        encode(chunk, cluster as usize * n_actions + action_idx)
    }

    /// Reader path: `None` if `state.actions()` has never been admitted by
    /// [`Self::index`]. Callers treat this as "unvisited", not a fatal
    /// error — unlike the C++ original's `const` accessor, which throws.
    pub fn get(&self, state: &PokerState, cluster: u16, action_idx: usize) -> Option<usize> {
        let n_actions = self.n_actions(state);
        let entry = self.history_map.get(state.actions())?;
        Some(encode(entry.chunk, cluster as usize * n_actions + action_idx))
    }

    pub fn load(&self, idx: usize) -> T {
        let (chunk, offset) = decode(idx);
        let chunks = self.chunks.read();
        T::load(&chunks[chunk][offset])
    }

    /// Multiplies every admitted counter by `factor` (the LCFR discount
    /// step). Relaxed ordering is acceptable: discounting only ever runs
    /// between quiescent iteration batches (spec §5).
    pub fn lcfr_discount(&self, factor: f32) {
        let chunks = self.chunks.read();
        for chunk in chunks.iter() {
            for atomic in chunk.iter() {
                T::scale(atomic, factor);
            }
        }
    }

    pub fn action_profile(&self) -> &ActionProfile {
        &self.action_profile
    }

    /// Number of admitted histories and the total length of the backing
    /// chunk vector. Exposed for growth-determinism checks; not used by
    /// training itself.
    pub fn growth(&self) -> (usize, usize) {
        (self.history_map.len(), self.chunks.read().len())
    }

    /// Flattens this storage into a plain, serde-friendly snapshot of its
    /// chunks and history map (spec A6). The atomics themselves never
    /// implement `Serialize` directly; this is the one conversion point.
    pub fn to_dto(&self) -> StorageDto {
        let chunks = self.chunks.read();
        let chunks = chunks.iter().map(|chunk| chunk.iter().map(|a| T::load(a).to_f64()).collect()).collect();
        let histories =
            self.history_map.iter().map(|entry| (entry.key().clone(), entry.value().chunk)).collect();
        StorageDto { chunks, histories }
    }

    /// Inverse of [`Self::to_dto`]: rebuilds a storage with the same
    /// `action_profile`, chunk layout, and history-to-chunk mapping.
    pub fn from_dto(dto: StorageDto, action_profile: ActionProfile) -> Self {
        let storage = Self::new(action_profile);
        let chunks: Vec<Box<[T::Atomic]>> = dto
            .chunks
            .into_iter()
            .map(|values| values.into_iter().map(|v| T::new_atomic(T::from_f64(v))).collect::<Vec<_>>().into_boxed_slice())
            .collect();
        *storage.chunks.write() = chunks;
        for (history, chunk) in dto.histories {
            storage.history_map.insert(history, HistoryEntry { chunk });
        }
        storage
    }

    /// Current strategy at a decision node: positive-regret (or
    /// positive-phi) normalisation over `actions`, uniform if the sum is
    /// not strictly positive. Shared by regret-matching at traverser nodes
    /// and by phi-derived average-strategy reporting.
    pub fn strategy(&self, state: &PokerState, cluster: u16, actions: &[Action]) -> Vec<Probability> {
        let values: Vec<f64> = (0..actions.len())
            .map(|k| {
                self.get(state, cluster, k)
                    .map(|idx| self.load(idx).to_f64().max(0.0))
                    .unwrap_or(0.0)
            })
            .collect();
        let sum: f64 = values.iter().sum();
        if sum > 0.0 {
            values.iter().map(|&v| (v / sum) as Probability).collect()
        } else {
            vec![1.0 / actions.len() as Probability; actions.len()]
        }
    }
}

impl StrategyStorage<i32> {
    /// Atomically adds `delta` to the regret at `idx`, clamped below at
    /// `floor`. Returns `Err` instead of applying the update if it would
    /// push the counter's magnitude past
    /// [`bp_core::REGRET_OVERFLOW_BOUND`] — spec §4.6/§7 treats that as an
    /// invariant violation, not a silent saturation.
    pub fn add_regret(&self, idx: usize, delta: i64, floor: i32) -> Result<(), String> {
        let (chunk, offset) = decode(idx);
        let chunks = self.chunks.read();
        let atomic = &chunks[chunk][offset];
        let mut overflowed = false;
        let _ = atomic.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            let next = current as i64 + delta;
            if next.unsigned_abs() as i64 > bp_core::REGRET_OVERFLOW_BOUND {
                overflowed = true;
                return None;
            }
            Some(next.max(floor as i64) as i32)
        });
        if overflowed {
            return Err(format!("regret update at slot {idx} would overflow (delta {delta})"));
        }
        Ok(())
    }

    /// Sum of `max(r, 0)` over every admitted regret slot — the numerator
    /// of the `avg_regret` metric (spec §4.6), which divides this by the
    /// iteration count `t`, not by the slot count.
    pub fn sum_positive(&self) -> i64 {
        let chunks = self.chunks.read();
        chunks.iter().flat_map(|chunk| chunk.iter()).map(|a| i32::load(a).max(0) as i64).sum()
    }

    /// Largest `|r|` over every admitted regret slot. Used to check the
    /// regret-bound invariant (spec §8 item 5) after a training run.
    pub fn max_abs(&self) -> i64 {
        let chunks = self.chunks.read();
        chunks.iter().flat_map(|chunk| chunk.iter()).map(|a| i32::load(a).abs() as i64).max().unwrap_or(0)
    }
}

impl StrategyStorage<f32> {
    /// Atomically increments the phi (average-strategy visitation) counter
    /// at `idx` by one.
    pub fn increment_phi(&self, idx: usize) {
        let (chunk, offset) = decode(idx);
        let chunks = self.chunks.read();
        let atomic = &chunks[chunk][offset];
        let _ = atomic.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v + 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_gameplay::PokerConfig;

    /// A fresh history is unvisited: the reader path returns `None`.
    #[test]
    fn unvisited_history_reads_as_none() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        assert!(storage.get(&state, 0, 0).is_none());
    }

    /// Admitting a history zero-initialises its block, and repeated
    /// admission returns the same base offset.
    #[test]
    fn admission_is_idempotent_and_zeroed() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let a = storage.index(&state, 5, 0);
        let b = storage.index(&state, 5, 0);
        assert_eq!(a, b);
        assert_eq!(storage.load(a), 0);
    }

    /// Two distinct histories admit two distinct, non-overlapping chunks.
    #[test]
    fn distinct_histories_get_distinct_chunks() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let next = state.apply(Action::CheckCall);
        let idx_a = storage.index(&state, 0, 0);
        let idx_b = storage.index(&next, 0, 0);
        assert_ne!(decode(idx_a).0, decode(idx_b).0);
    }

    /// Discounting scales every admitted slot, including ones written
    /// after the history was first admitted.
    #[test]
    fn lcfr_discount_scales_every_slot() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 0, 0);
        {
            let chunks = storage.chunks.read();
            let (chunk, offset) = decode(idx);
            chunks[chunk][offset].store(100, Ordering::Relaxed);
        }
        storage.lcfr_discount(0.5);
        assert_eq!(storage.load(idx), 50);
    }

    /// `add_regret` clamps the result at `floor` rather than letting it
    /// drift arbitrarily negative.
    #[test]
    fn add_regret_clamps_to_floor() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 0, 0);
        storage.add_regret(idx, -1000, -100).unwrap();
        assert_eq!(storage.load(idx), -100);
    }

    /// An update that would push the counter past the overflow bound is
    /// rejected instead of silently saturating.
    #[test]
    fn add_regret_rejects_overflow() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 0, 0);
        let result = storage.add_regret(idx, bp_core::REGRET_OVERFLOW_BOUND + 1, i32::MIN);
        assert!(result.is_err());
    }

    /// `sum_positive` counts only the positive part of each slot.
    #[test]
    fn sum_positive_ignores_negative_slots() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 0, 0);
        storage.add_regret(idx, -50, -1_000_000).unwrap();
        assert_eq!(storage.sum_positive(), 0);
        let idx2 = storage.index(&state, 1, 0);
        storage.add_regret(idx2, 30, -1_000_000).unwrap();
        assert_eq!(storage.sum_positive(), 30);
    }

    /// `increment_phi` accumulates visitation counts.
    #[test]
    fn increment_phi_accumulates() {
        let storage: StrategyStorage<f32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 0, 0);
        storage.increment_phi(idx);
        storage.increment_phi(idx);
        assert_eq!(storage.load(idx), 2.0);
    }

    /// A storage round-trips through `to_dto`/`from_dto`: same admitted
    /// histories, same slot values.
    #[test]
    fn dto_round_trips() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let idx = storage.index(&state, 3, 0);
        storage.add_regret(idx, 42, -1_000_000).unwrap();

        let dto = storage.to_dto();
        let restored = StrategyStorage::from_dto(dto, ActionProfile::blueprint(2));
        let restored_idx = restored.get(&state, 3, 0).unwrap();
        assert_eq!(restored.load(restored_idx), 42);
    }

    /// With no visitation yet, `strategy` falls back to a uniform split.
    #[test]
    fn strategy_uniform_when_unvisited() {
        let storage: StrategyStorage<i32> = StrategyStorage::new(ActionProfile::blueprint(2));
        let state = PokerState::new(PokerConfig::default());
        let actions = state.valid_actions(storage.action_profile());
        let strategy = storage.strategy(&state, 0, &actions);
        assert!((strategy.iter().sum::<Probability>() - 1.0).abs() < 1e-6);
        assert!(strategy.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-6));
    }
}
