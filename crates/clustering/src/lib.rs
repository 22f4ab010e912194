//! Hand-abstraction cluster tables.
//!
//! Preflop collapses to the 169 canonical starting-hand classes (a pure
//! function of rank and suitedness, no table needed). Postflop rounds use a
//! configured cluster count (default 200) looked up through an externally
//! supplied [`bp_cards::HandIsomorphism`] indexer and table files this crate
//! loads but does not produce — the k-means/EMD pipeline that builds those
//! tables offline is out of scope here; see `ClusterMap::load`.

mod map;
mod preflop;
mod table;

pub use map::ClusterMap;
pub use preflop::{combos_per_class, preflop_class};
pub use table::cluster_filename;
