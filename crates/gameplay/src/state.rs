use crate::action::{Action, ActionHistory};
use crate::config::PokerConfig;
use crate::player::Player;
use crate::profile::ActionProfile;
use bp_core::Chips;

/// The index of the big-blind seat for the player count implied by
/// `players.len()`: seat 0 in heads-up (the constructor reverses the usual
/// seat-0-is-button convention so two-player and multiway tables share the
/// same "seat 2 acts first preflop" shape once the special case is
/// accounted for), seat 1 otherwise.
fn big_blind_seat(n_players: usize) -> usize {
    if n_players == 2 { 0 } else { 1 }
}

fn increment(i: usize, max_val: usize) -> usize {
    if i + 1 > max_val { 0 } else { i + 1 }
}

/// A value-object snapshot of one point in a hand. `apply` produces a new
/// state; nothing is ever mutated in place once published.
///
/// Grounded on `examples/original_source/pluribus/poker.hpp`/`poker.cpp`'s
/// `PokerState`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PokerState {
    players: Vec<Player>,
    actions: ActionHistory,
    pot: Chips,
    max_bet: Chips,
    active: usize,
    round: u8,
    bet_level: usize,
    winner: Option<usize>,
    /// `max_bet`'s starting value (big blind + ante): used only to tell
    /// "nobody has raised yet" from "someone reopened the action preflop"
    /// in [`PokerState::is_round_complete`].
    big_blind: Chips,
}

impl PokerState {
    pub fn new(config: PokerConfig) -> Self {
        let mut players = vec![Player::new(config.starting_chips); config.n_players];
        let active;
        if players.len() > 2 {
            players[0].invest(config.small_blind);
            players[1].invest(config.big_blind);
            active = 2;
        } else {
            players[0].invest(config.big_blind);
            players[1].invest(config.small_blind);
            active = 1;
        }
        let mut pot = config.small_blind + config.big_blind;
        if config.ante > 0 {
            for player in players.iter_mut() {
                player.invest(config.ante);
            }
            pot += config.ante * players.len() as Chips;
        }
        Self {
            players,
            actions: ActionHistory::default(),
            pot,
            max_bet: config.big_blind + config.ante,
            active,
            round: 0,
            bet_level: 1,
            winner: None,
            big_blind: config.big_blind + config.ante,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn actions(&self) -> &ActionHistory {
        &self.actions
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn max_bet(&self) -> Chips {
        self.max_bet
    }
    pub fn active(&self) -> usize {
        self.active
    }
    pub fn round(&self) -> u8 {
        self.round
    }
    pub fn bet_level(&self) -> usize {
        self.bet_level
    }
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.round >= 4
    }

    /// The target total betsize for `action` at the active seat, per
    /// `examples/original_source/pluribus/poker.cpp`'s `total_bet_size`:
    /// truncating `(pot + to_call)·f` toward zero, exactly like the C++
    /// `int`-from-`double` cast.
    fn total_bet_size(&self, action: Action) -> Chips {
        let player = &self.players[self.active];
        match action {
            Action::AllIn => player.chips() + player.betsize(),
            Action::FractionalBet(f) => {
                let missing = self.max_bet - player.betsize();
                let real_pot = self.pot + missing;
                let raise = (real_pot as f64 * f as f64) as Chips;
                raise + missing + player.betsize()
            }
            _ => unreachable!("total_bet_size called on a non-betting action"),
        }
    }

    /// Lists the actions permitted at the current decision node, trimming
    /// the configured menu to Fold-only-when-facing-a-bet and
    /// bet/raise/all-in entries that strictly exceed `max_bet` and fit
    /// within the active player's chips. Grounded on `poker.cpp`'s
    /// `valid_actions`.
    pub fn valid_actions(&self, profile: &ActionProfile) -> Vec<Action> {
        let menu = profile.actions(self.round as usize, self.bet_level, self.active);
        let player = &self.players[self.active];
        menu.iter()
            .copied()
            .filter(|&a| match a {
                Action::CheckCall => true,
                Action::Fold => player.betsize() < self.max_bet,
                Action::AllIn | Action::FractionalBet(_) => {
                    let total = self.total_bet_size(a);
                    let required = total - player.betsize();
                    required <= player.chips() && total > self.max_bet
                }
            })
            .collect()
    }

    pub fn apply(&self, action: Action) -> Self {
        let mut state = self.next_state(action);
        state.actions.push(action);
        state
    }

    pub fn apply_history(&self, history: &ActionHistory) -> Self {
        let mut state = self.clone();
        for &action in history.iter() {
            state = state.apply(action);
        }
        state
    }

    fn next_state(&self, action: Action) -> Self {
        let player = &self.players[self.active];
        match action {
            Action::AllIn => self.bet(player.chips()),
            Action::Fold => self.fold(),
            Action::CheckCall => {
                if player.betsize() == self.max_bet {
                    self.check()
                } else {
                    self.call()
                }
            }
            Action::FractionalBet(_) => {
                let target = self.total_bet_size(action);
                self.bet(target - player.betsize())
            }
        }
    }

    /// Invests `amount` at the active seat. If the resulting betsize
    /// strictly exceeds `max_bet` this is a raise (bumps `bet_level` and
    /// `max_bet`); otherwise (an all-in for less than the call amount) it
    /// behaves like a capped call.
    fn bet(&self, amount: Chips) -> Self {
        debug_assert!(!self.players[self.active].folded());
        debug_assert!(self.players[self.active].chips() >= amount);
        debug_assert!(self.winner.is_none());
        let mut state = self.clone();
        state.players[self.active].invest(amount);
        state.pot += amount;
        let new_betsize = state.players[self.active].betsize();
        if new_betsize > state.max_bet {
            state.max_bet = new_betsize;
            state.bet_level += 1;
        }
        state.next_player();
        state
    }

    /// Calls, capping the invested amount to the caller's stack (a short
    /// stack call becomes an effective all-in) — a deliberate deviation from
    /// the C++ original's uncapped `call()`, which can drive chips negative;
    /// see `DESIGN.md`.
    fn call(&self) -> Self {
        let player = &self.players[self.active];
        debug_assert!(!player.folded());
        debug_assert!(self.max_bet > 0);
        debug_assert!(self.max_bet > player.betsize());
        debug_assert!(self.winner.is_none());
        let amount = (self.max_bet - player.betsize()).min(player.chips());
        let mut state = self.clone();
        state.players[self.active].invest(amount);
        state.pot += amount;
        state.next_player();
        state
    }

    fn check(&self) -> Self {
        let player = &self.players[self.active];
        debug_assert!(!player.folded());
        debug_assert_eq!(player.betsize(), self.max_bet);
        debug_assert!(
            self.max_bet == 0
                || (self.round == 0 && self.active == big_blind_seat(self.players.len()))
        );
        debug_assert!(self.winner.is_none());
        let mut state = self.clone();
        state.next_player();
        state
    }

    fn fold(&self) -> Self {
        let player = &self.players[self.active];
        debug_assert!(!player.folded());
        debug_assert!(self.max_bet > 0);
        debug_assert!(player.betsize() < self.max_bet);
        debug_assert!(self.winner.is_none());
        let mut state = self.clone();
        state.players[self.active].fold();
        state.winner = find_winner(&state.players);
        if state.winner.is_none() {
            state.next_player();
        }
        state
    }

    /// Returns `true` when the active seat, having just matched `max_bet`,
    /// closes the betting round: the normal case is "action has returned to
    /// the seat that opened it"; the preflop big-blind option keeps the
    /// round open one extra turn even though the blind already matches
    /// `max_bet`. Grounded on `poker.cpp`'s `is_round_complete`.
    fn is_round_complete(&self) -> bool {
        let player = &self.players[self.active];
        player.betsize() == self.max_bet
            && (self.max_bet > 0 || self.active == 0)
            && (self.max_bet > self.big_blind
                || self.active != big_blind_seat(self.players.len())
                || self.round != 0)
    }

    fn next_player(&mut self) {
        loop {
            self.active = increment(self.active, self.players.len() - 1);
            if self.is_round_complete() {
                self.next_round();
                return;
            }
            let seat = &self.players[self.active];
            if !(seat.folded() || seat.chips() == 0) {
                return;
            }
        }
    }

    fn next_round(&mut self) {
        self.round += 1;
        for player in self.players.iter_mut() {
            player.next_round();
        }
        self.active = 0;
        self.max_bet = 0;
        self.bet_level = 0;
        if self.round < 4 && (self.players[0].folded() || self.players[0].chips() == 0) {
            self.next_player();
        }
    }
}

fn find_winner(players: &[Player]) -> Option<usize> {
    let mut winner = None;
    for (i, player) in players.iter().enumerate() {
        if !player.folded() {
            if winner.is_none() {
                winner = Some(i);
            } else {
                return None;
            }
        }
    }
    winner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up() -> PokerState {
        PokerState::new(PokerConfig::default())
    }

    /// Heads-up construction posts the big blind at seat 0 and seats the
    /// small blind to act first.
    #[test]
    fn heads_up_blinds_and_first_actor() {
        let state = heads_up();
        assert_eq!(state.players()[0].betsize(), 100);
        assert_eq!(state.players()[1].betsize(), 50);
        assert_eq!(state.active(), 1);
        assert_eq!(state.pot(), 150);
        assert_eq!(state.bet_level(), 1);
    }

    /// Six-max construction seats the blinds at 0/1 and action starts at seat 2.
    #[test]
    fn six_max_blinds_and_first_actor() {
        let config = PokerConfig { n_players: 6, ..PokerConfig::default() };
        let state = PokerState::new(config);
        assert_eq!(state.players()[0].betsize(), 50);
        assert_eq!(state.players()[1].betsize(), 100);
        assert_eq!(state.active(), 2);
    }

    /// Ante is deducted from every seat's own chips while crediting the pot
    /// once per seat (the fixed by-value bug from the original).
    #[test]
    fn ante_deducted_per_seat() {
        let config = PokerConfig { ante: 10, ..PokerConfig::default() };
        let state = PokerState::new(config);
        let total_chips: Chips = state.players().iter().map(Player::chips).sum();
        assert_eq!(total_chips, config.starting_chips * config.n_players as Chips - state.pot());
    }

    /// A call is capped to the caller's remaining stack rather than driving
    /// chips negative.
    #[test]
    fn call_caps_to_available_chips() {
        let short_stack = PokerState {
            players: vec![Player::new(100), { let mut p = Player::new(20); p.invest(10); p }],
            actions: ActionHistory::default(),
            pot: 110,
            max_bet: 100,
            active: 1,
            round: 0,
            bet_level: 1,
            winner: None,
            big_blind: 100,
        };
        let after = short_stack.apply(Action::CheckCall);
        assert_eq!(after.players()[1].chips(), 0);
        assert_eq!(after.players()[1].betsize(), 20);
    }

    /// Folding down to one live player ends the hand with a winner and
    /// leaves `active` unchanged.
    #[test]
    fn fold_to_one_player_ends_hand() {
        let state = heads_up();
        let after = state.apply(Action::Fold);
        assert_eq!(after.winner(), Some(0));
        assert!(after.is_terminal());
    }

    /// A full preflop limp-check sequence in heads-up advances past the
    /// big-blind option to the flop.
    #[test]
    fn heads_up_limp_advances_to_flop() {
        let state = heads_up();
        let after = state.apply(Action::CheckCall).apply(Action::CheckCall);
        assert_eq!(after.round(), 1);
        assert_eq!(after.pot(), 200);
    }
}
