//! No-limit hold'em state machine: actions, betting-menu abstraction, player
//! accounting, and showdown settlement.
//!
//! - [`Action`] / [`ActionHistory`] — a player decision and the sequence of
//!   decisions taken since the hand began.
//! - [`ActionProfile`] — the allowed-actions menu per round/bet-level/seat.
//! - [`PokerState`] — the game tree node: players, pot, active seat, round.
//! - [`Showdown`] — final hand comparison and pot distribution.
//! - [`PokerConfig`] — table-stakes parameters (blinds, ante, stack).

mod action;
mod config;
mod player;
mod profile;
mod showdown;
mod state;

pub use action::{Action, ActionHistory};
pub use config::PokerConfig;
pub use player::Player;
pub use profile::ActionProfile;
pub use showdown::Showdown;
pub use state::PokerState;
