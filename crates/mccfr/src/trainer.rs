use crate::snapshot::Snapshot;
use crate::storage::StrategyStorage;
use crate::config::TrainerConfig;
use bp_cards::{Card, Hand, Deck, Hole, HandEvaluator, Street};
use bp_clustering::{combos_per_class, ClusterMap};
use bp_core::{ConfigError, Epoch, Probability, Utility};
use bp_gameplay::{Action, PokerState, Showdown};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;

thread_local! {
    static WORKER_RNG: RefCell<Option<SmallRng>> = RefCell::new(None);
}

/// Runs `f` against this worker's `SmallRng`, lazily seeding it on first
/// use (spec §5): `seed ^ worker_index` when `seed` is configured, a
/// non-deterministic seed drawn from `rand::rng()` otherwise. Every draw on
/// a given rayon worker thread advances the same generator, so randomness
/// accumulates normally within a run; only the *first* draw per thread
/// depends on the configured seed.
fn with_worker_rng<R>(seed: Option<u64>, f: impl FnOnce(&mut SmallRng) -> R) -> R {
    WORKER_RNG.with(|cell| {
        let mut slot = cell.borrow_mut();
        let rng = slot.get_or_insert_with(|| match seed {
            Some(base) => {
                let worker = rayon::current_thread_index().unwrap_or(0) as u64;
                SmallRng::seed_from_u64(base ^ worker)
            }
            None => SmallRng::from_rng(&mut rand::rng()),
        });
        f(rng)
    })
}

/// Draws one action index from a discrete distribution, proportional to
/// weight. Falls back to the last action on floating-point rounding slop.
fn sample_index(seed: Option<u64>, strategy: &[Probability]) -> usize {
    let mut target = with_worker_rng(seed, |rng| rng.random_range(0.0..1.0f32));
    for (k, &w) in strategy.iter().enumerate() {
        if target < w {
            return k;
        }
        target -= w;
    }
    strategy.len() - 1
}

/// Fills the community board from `deck`, honouring any preset cards in
/// `config.init_board` as a prefix. Returns the finished board alongside its
/// cards in reveal order (needed because [`bp_cards::Board`] only exposes
/// its cards as an unordered [`Hand`], and traversal needs the exact
/// per-street prefix).
fn deal_board(deck: &mut Deck, preset: &[u8]) -> (bp_cards::Board, Vec<Card>) {
    let mut ordered: Vec<Card> = preset.iter().map(|&b| Card::from(b)).collect();
    let mut board = bp_cards::Board::empty();
    for street in Street::all() {
        let n = street.n_revealed();
        if n == 0 {
            continue;
        }
        if ordered.len() < street.n_observed() {
            for _ in 0..n {
                ordered.push(deck.draw());
            }
        }
        let start = board.len();
        let revealed = ordered[start..start + n].iter().copied().map(Hand::from).fold(Hand::empty(), Hand::add);
        board.reveal(street, revealed);
    }
    (board, ordered)
}

/// External-sampling Monte Carlo CFR with negative-regret pruning (MCCFR-P)
/// and linear discounting, computing a blueprint strategy for `n`-player
/// no-limit hold'em.
///
/// Grounded on `examples/original_source/pluribus/mccfr.hpp`/`mccfr.cpp`'s
/// `BlueprintTrainer`: `regrets` and `phi` are the same two counter stores,
/// `mccfr_p` the same outer schedule, `traverse_mccfr`/`traverse_mccfr_p`/
/// `update_strategy` the same three recursive traversals. Iteration
/// batching uses `rayon`, matching the teacher's own
/// `crates/mccfr/src/solver/solver.rs::batch` use of
/// `rayon::iter::ParallelIterator` for bulk self-play.
pub struct BlueprintTrainer {
    regrets: StrategyStorage<i32>,
    phi: StrategyStorage<f32>,
    config: TrainerConfig,
    clusters: Arc<ClusterMap>,
    eval: Arc<dyn HandEvaluator>,
    t: Epoch,
    snapshot_dir: PathBuf,
    metrics_dir: PathBuf,
}

impl BlueprintTrainer {
    /// Fails with [`ConfigError::PlayerCountMismatch`] if the configured
    /// initial ranges don't cover every seat `config.poker.n_players`
    /// implies, matching the C++ original's constructor check.
    pub fn new(
        config: TrainerConfig,
        clusters: Arc<ClusterMap>,
        eval: Arc<dyn HandEvaluator>,
    ) -> Result<Self, ConfigError> {
        if config.init_ranges.len() != config.poker.n_players {
            return Err(ConfigError::PlayerCountMismatch {
                configured: config.poker.n_players,
                actual: config.init_ranges.len(),
            });
        }
        let regrets = StrategyStorage::new(config.action_profile.clone());
        let phi = StrategyStorage::new(config.action_profile.clone());
        Ok(Self {
            regrets,
            phi,
            config,
            clusters,
            eval,
            t: 1,
            snapshot_dir: PathBuf::from("snapshots"),
            metrics_dir: PathBuf::from("metrics"),
        })
    }

    pub fn set_snapshot_dir(&mut self, dir: PathBuf) {
        self.snapshot_dir = dir;
    }
    pub fn set_metrics_dir(&mut self, dir: PathBuf) {
        self.metrics_dir = dir;
    }
    pub fn get_regrets(&self) -> &StrategyStorage<i32> {
        &self.regrets
    }
    pub fn get_phi(&self) -> &StrategyStorage<f32> {
        &self.phi
    }
    pub fn get_config(&self) -> &TrainerConfig {
        &self.config
    }
    pub fn epoch(&self) -> Epoch {
        self.t
    }

    /// Advances training to `target_t`, dispatching batches of iterations in
    /// parallel up to the next discount, snapshot, preflop-freeze, or log
    /// checkpoint — whichever comes first — so every coordinator-only step
    /// (§5) runs against a quiesced worker pool. Stops early if
    /// [`bp_core::interrupted`] reports a cooperative shutdown request.
    pub fn mccfr_p(&mut self, target_t: Epoch) -> anyhow::Result<()> {
        while self.t < target_t && !bp_core::interrupted() {
            let checkpoint = [
                self.next_boundary(self.config.discount_interval),
                self.next_boundary(self.config.snapshot_interval),
                self.next_boundary(self.config.log_interval),
                self.config.preflop_threshold,
                target_t,
            ]
            .into_iter()
            .filter(|&c| c > self.t)
            .min()
            .unwrap_or(target_t);

            let batch = checkpoint - self.t;
            (0..batch).into_par_iter().for_each(|_| self.run_iteration());
            self.t = checkpoint;

            self.maybe_discount();
            self.maybe_snapshot()?;
            self.maybe_log_metrics();
        }
        Ok(())
    }

    fn next_boundary(&self, interval: Epoch) -> Epoch {
        if interval == 0 {
            return Epoch::MAX;
        }
        (self.t / interval + 1) * interval
    }

    fn maybe_discount(&self) {
        let interval = self.config.discount_interval;
        if interval == 0 || self.t > self.config.lcfr_thresh || self.t % interval != 0 {
            return;
        }
        let k = (self.t / interval) as f32;
        let d = k / (k + 1.0);
        self.regrets.lcfr_discount(d);
        self.phi.lcfr_discount(d);
    }

    fn maybe_snapshot(&self) -> anyhow::Result<()> {
        let at_preflop_freeze = self.t == self.config.preflop_threshold;
        let at_interval = self.config.snapshot_interval != 0 && self.t % self.config.snapshot_interval == 0;
        if !at_preflop_freeze && !at_interval {
            return Ok(());
        }
        std::fs::create_dir_all(&self.snapshot_dir).map_err(|source| ConfigError::DirectoryCreation {
            path: self.snapshot_dir.display().to_string(),
            source,
        })?;
        let snapshot = Snapshot {
            t: self.t,
            config: self.config.clone(),
            regrets: self.regrets.to_dto(),
            phi: self.phi.to_dto(),
        };
        let path = self.snapshot_dir.join(format!("{}.json", self.t));
        snapshot.write(&path)?;
        log::info!("wrote snapshot at t={} to {}", self.t, path.display());
        Ok(())
    }

    fn maybe_log_metrics(&self) {
        let interval = self.config.log_interval;
        if interval == 0 || self.t % interval != 0 {
            return;
        }
        let avg_regret = self.regrets.sum_positive() as f64 / self.t as f64;
        log::info!("t={} avg_regret={:.6}", self.t, avg_regret);
        if let Err(e) = self.write_metrics_record(avg_regret) {
            log::warn!("failed to write metrics record at t={}: {e}", self.t);
        }
    }

    fn write_metrics_record(&self, avg_regret: f64) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.metrics_dir).map_err(|source| ConfigError::DirectoryCreation {
            path: self.metrics_dir.display().to_string(),
            source,
        })?;
        let positions: Vec<serde_json::Value> = (0..self.config.poker.n_players)
            .map(|pos| {
                let frequencies = self.preflop_action_frequencies(pos);
                let actions: serde_json::Map<String, serde_json::Value> = frequencies
                    .into_iter()
                    .map(|(action, freq)| (action.to_string(), serde_json::json!(freq)))
                    .collect();
                serde_json::json!({ "position": pos, "actions": actions })
            })
            .collect();
        let record = serde_json::json!({
            "t": self.t,
            "avg_regret": avg_regret,
            "preflop_strategy": positions,
        });
        let path = self.metrics_dir.join(format!("{}.json", self.t));
        std::fs::write(path, serde_json::to_vec_pretty(&record)?)?;
        Ok(())
    }

    /// Range-weighted preflop action frequencies at `position`, reported
    /// for the metrics log. Simplified relative to
    /// `examples/original_source/pluribus/mccfr.cpp`'s `log_preflop_strategy`,
    /// which walks all 1326 combos individually: since every combo within
    /// one of the 169 canonical classes shares the same cluster id (and
    /// hence the same strategy under the default full-range assumption),
    /// weighting each class's strategy by [`combos_per_class`] is
    /// mathematically identical and far cheaper. Approximates "position acts
    /// first" by replaying check/call until `position` is on the clock.
    pub fn preflop_action_frequencies(&self, position: usize) -> Vec<(Action, f64)> {
        let mut state = self.config.init_state();
        while state.round() == 0 && !state.is_terminal() && state.active() != position {
            state = state.apply(Action::CheckCall);
        }
        if state.round() != 0 || state.is_terminal() {
            return Vec::new();
        }
        let actions = state.valid_actions(self.regrets.action_profile());
        if actions.is_empty() {
            return Vec::new();
        }
        let mut totals = vec![0f64; actions.len()];
        let mut total_combos = 0f64;
        for class in 0..bp_core::PREFLOP_CLUSTERS as u16 {
            let combos = combos_per_class(class) as f64;
            let strategy = self.regrets.strategy(&state, class, &actions);
            for (k, &p) in strategy.iter().enumerate() {
                totals[k] += p as f64 * combos;
            }
            total_combos += combos;
        }
        actions.into_iter().zip(totals.into_iter().map(|total| total / total_combos)).collect()
    }

    fn run_iteration(&self) {
        let preset_dead: Hand = self
            .config
            .init_board
            .iter()
            .map(|&b| Hand::from(Card::from(b)))
            .fold(Hand::empty(), Hand::add);
        let mut deck = Deck::new(preset_dead);
        with_worker_rng(self.config.seed, |rng| deck.shuffle(rng));
        let (board, board_cards) = deal_board(&mut deck, &self.config.init_board);
        let hands = self.deal_hands(&mut deck, board.cards());

        let state = self.config.init_state();
        for i in 0..self.config.poker.n_players {
            if self.config.strategy_interval != 0 && self.t % self.config.strategy_interval == 0 {
                self.update_strategy(&state, i, &board_cards, &hands);
            }
            let pruning_eligible = self.t > self.config.prune_thresh
                && with_worker_rng(self.config.seed, |rng| rng.random::<f64>()) < 0.95;
            if pruning_eligible {
                self.traverse_mccfr_p(&state, i, &board_cards, &hands);
            } else {
                self.traverse_mccfr(&state, i, &board_cards, &hands);
            }
        }
    }

    /// Deals one hole hand per seat: drawn straight from the deck when every
    /// configured range is the full 1326-combo range (the common case),
    /// otherwise sampled from each seat's range with running dead-card
    /// exclusion (spec §4.6 step 3). A sampling miss (every combo in a
    /// range dead) falls back to drawing from the deck rather than aborting
    /// the iteration — the range collapsed to nothing is the caller's
    /// misconfiguration, not a reason to lose the whole training batch.
    fn deal_hands(&self, deck: &mut Deck, board: Hand) -> Vec<Hole> {
        let all_full = self.config.init_ranges.iter().all(|range| range.n_combos() >= 1326.0 - 1e-3);
        if all_full {
            return (0..self.config.poker.n_players).map(|_| deck.hole()).collect();
        }
        let mut dead = board;
        let mut hands = Vec::with_capacity(self.config.poker.n_players);
        for range in &self.config.init_ranges {
            let hole = with_worker_rng(self.config.seed, |rng| range.sample(dead, rng)).unwrap_or_else(|| deck.hole());
            dead = Hand::add(dead, Hand::from(hole));
            hands.push(hole);
        }
        hands
    }

    fn board_slice<'a>(&self, board: &'a [Card], street: Street) -> &'a [Card] {
        &board[..street.n_observed().min(board.len())]
    }

    /// Non-pruned external-sampling traversal (spec §4.6). Returns `i`'s
    /// utility for this subtree and, at `i`'s own decision nodes, updates
    /// `regrets` via the counterfactual-regret formula.
    fn traverse_mccfr(&self, state: &PokerState, i: usize, board: &[Card], hands: &[Hole]) -> Utility {
        if state.is_terminal() || state.players()[i].folded() {
            return self.utility(state, i, board, hands);
        }
        let street = Street::from(state.round());
        let visible = self.board_slice(board, street);
        let actions = state.valid_actions(self.regrets.action_profile());
        let active = state.active();
        let cluster = self.clusters.cluster(street, hands[active], visible);

        if active == i {
            let strategy = self.regrets.strategy(state, cluster, &actions);
            let values: Vec<Utility> =
                actions.iter().map(|&a| self.traverse_mccfr(&state.apply(a), i, board, hands)).collect();
            let ev: f64 = strategy.iter().zip(&values).map(|(&s, &v)| s as f64 * v as f64).sum();
            for (k, _) in actions.iter().enumerate() {
                let idx = self.regrets.index(state, cluster, k);
                let delta = (values[k] as f64 - ev).round() as i64;
                if let Err(message) = self.regrets.add_regret(idx, delta, self.config.regret_floor) {
                    panic!("{message}");
                }
            }
            ev.round() as Utility
        } else {
            let strategy = self.regrets.strategy(state, cluster, &actions);
            let choice = sample_index(self.config.seed, &strategy);
            self.traverse_mccfr(&state.apply(actions[choice]), i, board, hands)
        }
    }

    /// Pruned external-sampling traversal (MCCFR-P). Identical to
    /// [`Self::traverse_mccfr`] except that, at `i`'s own decision nodes,
    /// actions whose stored regret is at or below `prune_cutoff` are
    /// skipped entirely: treated as contributing 0 to both the expected
    /// value and the regret update, never recursed into this iteration.
    fn traverse_mccfr_p(&self, state: &PokerState, i: usize, board: &[Card], hands: &[Hole]) -> Utility {
        if state.is_terminal() || state.players()[i].folded() {
            return self.utility(state, i, board, hands);
        }
        let street = Street::from(state.round());
        let visible = self.board_slice(board, street);
        let actions = state.valid_actions(self.regrets.action_profile());
        let active = state.active();
        let cluster = self.clusters.cluster(street, hands[active], visible);

        if active == i {
            let strategy = self.regrets.strategy(state, cluster, &actions);
            let mut values = vec![0i64; actions.len()];
            let mut explored = vec![false; actions.len()];
            for (k, &a) in actions.iter().enumerate() {
                let idx = self.regrets.index(state, cluster, k);
                if self.regrets.load(idx) <= self.config.prune_cutoff {
                    continue;
                }
                explored[k] = true;
                values[k] = self.traverse_mccfr_p(&state.apply(a), i, board, hands) as i64;
            }
            let ev: f64 = strategy.iter().zip(&values).map(|(&s, &v)| s as f64 * v as f64).sum();
            for (k, _) in actions.iter().enumerate() {
                if !explored[k] {
                    continue;
                }
                let idx = self.regrets.index(state, cluster, k);
                let delta = (values[k] as f64 - ev).round() as i64;
                if let Err(message) = self.regrets.add_regret(idx, delta, self.config.regret_floor) {
                    panic!("{message}");
                }
            }
            ev.round() as Utility
        } else {
            let strategy = self.regrets.strategy(state, cluster, &actions);
            let choice = sample_index(self.config.seed, &strategy);
            self.traverse_mccfr_p(&state.apply(actions[choice]), i, board, hands)
        }
    }

    /// Accumulates average-strategy visitation (`phi`) along `i`'s preflop
    /// branch only (spec §4.6): samples one action at `i`'s own nodes,
    /// enumerates every legal action at everyone else's (averaging over
    /// opponents rather than sampling them). Returns as soon as the branch
    /// leaves preflop, ends the hand, or `i` has folded.
    fn update_strategy(&self, state: &PokerState, i: usize, board: &[Card], hands: &[Hole]) {
        if state.is_terminal() || state.round() > 0 || state.players()[i].folded() {
            return;
        }
        let actions = state.valid_actions(self.regrets.action_profile());
        let active = state.active();
        let visible = self.board_slice(board, Street::Pref);
        let cluster = self.clusters.cluster(Street::Pref, hands[active], visible);
        let strategy = self.regrets.strategy(state, cluster, &actions);

        if active == i {
            let choice = sample_index(self.config.seed, &strategy);
            let idx = self.phi.index(state, cluster, choice);
            self.phi.increment_phi(idx);
            self.update_strategy(&state.apply(actions[choice]), i, board, hands);
        } else {
            for &a in &actions {
                self.update_strategy(&state.apply(a), i, board, hands);
            }
        }
    }

    /// Terminal-state payoff for seat `i`, in chips relative to its
    /// starting stack (spec §4.6). Never called on a non-terminal state.
    fn utility(&self, state: &PokerState, i: usize, board: &[Card], hands: &[Hole]) -> Utility {
        let player = &state.players()[i];
        let initial_chips = self.config.poker.starting_chips;
        if player.folded() {
            return player.chips() - initial_chips;
        }
        if let Some(winner) = state.winner() {
            let share = if winner == i { state.pot() } else { 0 };
            return player.chips() - initial_chips + share;
        }
        if state.round() as usize >= 4 {
            return player.chips() - initial_chips + self.showdown_payoff(state, i, board, hands);
        }
        unreachable!("utility called on a non-terminal, non-folded, no-winner state")
    }

    /// `pot / |winners|` for seat `i` (integer division, remainder dropped
    /// here and instead awarded by [`bp_gameplay::Showdown::distribute`] to
    /// the lowest-indexed winners) — 0 if `i` isn't among them.
    fn showdown_payoff(&self, state: &PokerState, i: usize, board: &[Card], hands: &[Hole]) -> Utility {
        let river: [Card; 5] = board[..5].try_into().expect("showdown requires a completed river board");
        let distribution = Showdown::resolve(state, hands, river, self.eval.as_ref());
        *distribution.get(&i).unwrap_or(&0)
    }
}
