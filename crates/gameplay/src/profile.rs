use crate::action::Action;

/// The allowed-actions menu for every `(round, bet_level, position)` triple.
/// Lookup clamps both `bet_level` and `position` to the last populated entry
/// for that round, so a profile only needs to specify the cases it cares
/// about (typically position 0, i.e. "everyone else behaves like the last
/// configured seat").
///
/// Grounded on `examples/original_source/pluribus/actions.hpp`/`.cpp`'s
/// `ActionProfile`, reimplemented over `Vec<Vec<Vec<Action>>>` (round is the
/// fixed outer dimension) rather than the C++ `std::array<..., 4>` of
/// nested vectors, which is the same shape expressed in idiomatic Rust.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProfile {
    rounds: [Vec<Vec<Vec<Action>>>; 4],
}

impl ActionProfile {
    pub fn set(&mut self, round: usize, bet_level: usize, pos: usize, actions: Vec<Action>) {
        let level = &mut self.rounds[round];
        if bet_level >= level.len() {
            level.resize(bet_level + 1, Vec::new());
        }
        let positions = &mut level[bet_level];
        if pos >= positions.len() {
            positions.resize(pos + 1, Vec::new());
        }
        positions[pos] = actions;
    }

    /// Returns the allowed actions for `(round, bet_level, pos)`, clamping
    /// both indices down to the last configured entry.
    pub fn actions(&self, round: usize, bet_level: usize, pos: usize) -> &[Action] {
        let levels = &self.rounds[round];
        let level_idx = bet_level.min(levels.len() - 1);
        let positions = &levels[level_idx];
        let pos_idx = pos.min(positions.len() - 1);
        &positions[pos_idx]
    }

    /// The blueprint's default action menu for an `n`-player table, grounded
    /// on `examples/original_source/pluribus/actions.cpp`'s
    /// `BlueprintActionProfile(int n_players)` constructor.
    pub fn blueprint(n_players: usize) -> Self {
        use Action::{AllIn, CheckCall, Fold};
        let frac = Action::FractionalBet;
        let mut profile = Self::default();

        if n_players > 2 {
            for pos in 2..n_players.saturating_sub(2) {
                profile.set(0, 1, pos, vec![Fold, CheckCall, frac(0.40)]);
            }
            if n_players > 3 {
                profile.set(0, 1, n_players - 2, vec![Fold, CheckCall, frac(0.52)]);
            }
            profile.set(0, 1, n_players - 1, vec![Fold, CheckCall, frac(0.60)]);
            profile.set(0, 1, 0, vec![Fold, CheckCall, frac(0.80)]);
            profile.set(0, 1, 1, vec![Fold, CheckCall, frac(0.80)]);
        } else {
            profile.set(0, 1, 0, vec![Fold, CheckCall, frac(0.60)]);
        }

        profile.set(0, 2, 0, vec![Fold, CheckCall, frac(0.60), frac(0.80), frac(1.00), frac(1.20)]);
        profile.set(0, 3, 0, vec![Fold, CheckCall, frac(0.60), frac(0.80), frac(1.00), AllIn]);

        if n_players == 2 {
            profile.set(1, 0, 0, vec![CheckCall, frac(0.16), frac(0.33), frac(0.50), frac(0.75), frac(1.00), AllIn]);
        } else {
            profile.set(1, 0, 0, vec![CheckCall, frac(0.33), frac(0.50), frac(0.75), frac(1.00), AllIn]);
        }
        profile.set(1, 1, 0, vec![Fold, CheckCall, frac(0.50), frac(0.75), frac(1.00), AllIn]);

        profile.set(2, 0, 0, vec![CheckCall, frac(0.50), frac(1.00), AllIn]);
        profile.set(2, 1, 0, vec![Fold, CheckCall, frac(1.00), AllIn]);

        profile.set(3, 0, 0, vec![CheckCall, frac(0.50), frac(1.00), AllIn]);
        profile.set(3, 1, 0, vec![Fold, CheckCall, frac(1.00), AllIn]);

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Out-of-range bet levels and positions clamp to the last configured entry.
    #[test]
    fn clamps_to_last_entry() {
        let profile = ActionProfile::blueprint(6);
        let clamped = profile.actions(0, 99, 99);
        let exact = profile.actions(0, 3, 0);
        assert_eq!(clamped, exact);
    }

    /// The heads-up preflop open includes a fold, a check/call, and a single raise size.
    #[test]
    fn heads_up_preflop_open() {
        let profile = ActionProfile::blueprint(2);
        let actions = profile.actions(0, 1, 0);
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&Action::Fold));
        assert!(actions.contains(&Action::CheckCall));
    }

    /// Six-max preflop open uses a different sizing per position (UTG vs. button).
    #[test]
    fn six_max_preflop_open_varies_by_position() {
        let profile = ActionProfile::blueprint(6);
        let utg = profile.actions(0, 1, 2);
        let button = profile.actions(0, 1, 0);
        assert_ne!(utg, button);
    }
}
