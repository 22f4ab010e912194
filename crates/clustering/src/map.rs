use crate::preflop::preflop_class;
use crate::table::{cluster_filename, load_table};
use bp_cards::{Card, HandIsomorphism, Hole, Street};
use bp_core::ConfigError;
use std::sync::Arc;

/// Hand-abstraction lookup for all four streets.
///
/// Preflop needs no table (see [`preflop_class`]); flop, turn, and river
/// each have their own table mapping an isomorphism index to a cluster id.
/// Tables and the indexer are immutable once constructed and safe to share
/// behind an `Arc` across every trainer worker, matching spec §4.4's
/// process-wide-singleton framing.
pub struct ClusterMap {
    indexer: Arc<dyn HandIsomorphism>,
    flop: Vec<u16>,
    turn: Vec<u16>,
    river: Vec<u16>,
}

impl ClusterMap {
    /// Builds a map from already-loaded tables, bypassing file I/O. Used by
    /// tests and by callers that source tables from something other than
    /// the conventional on-disk layout.
    pub fn from_tables(
        indexer: Arc<dyn HandIsomorphism>,
        flop: Vec<u16>,
        turn: Vec<u16>,
        river: Vec<u16>,
    ) -> Self {
        Self { indexer, flop, turn, river }
    }

    /// Loads flop/turn/river tables named `cluster_filename(street,
    /// n_clusters, 0)` out of `dir`. A missing or malformed file is a
    /// [`ConfigError::UnknownClusterTable`] (spec §7: abort initialisation,
    /// do not attempt to train without an abstraction).
    pub fn load(
        dir: &std::path::Path,
        indexer: Arc<dyn HandIsomorphism>,
        n_clusters: usize,
    ) -> Result<Self, ConfigError> {
        let read = |street: Street| -> Result<Vec<u16>, ConfigError> {
            let name = cluster_filename(street, n_clusters, 0);
            let path = dir.join(&name);
            load_table(&path).map_err(|source| {
                log::error!("failed to load cluster table {}: {source}", path.display());
                ConfigError::UnknownClusterTable(name)
            })
        };
        Ok(Self { indexer, flop: read(Street::Flop)?, turn: read(Street::Turn)?, river: read(Street::River)? })
    }

    /// The cluster id for `hole` given `board` (may be 0, 3, 4, or 5 cards,
    /// matching preflop/flop/turn/river). Preflop returns one of the 169
    /// canonical classes directly; later streets index through the external
    /// isomorphism indexer into the matching table.
    pub fn cluster(&self, street: Street, hole: Hole, board: &[Card]) -> u16 {
        if street == Street::Pref {
            return preflop_class(hole);
        }
        let [h0, h1] = hole.cards();
        let mut cards = Vec::with_capacity(2 + board.len());
        cards.push(h0);
        cards.push(h1);
        cards.extend_from_slice(board);
        let index = self.indexer.hand_index_last(&cards) as usize;
        let table = match street {
            Street::Pref => unreachable!(),
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        };
        table[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_cards::Suit;

    struct StubIndexer;
    impl HandIsomorphism for StubIndexer {
        fn hand_index_last(&self, cards: &[Card]) -> u64 {
            cards.iter().map(|c| u8::from(*c) as u64).sum::<u64>() % 4
        }
    }

    fn hole(a: (bp_cards::Rank, Suit), b: (bp_cards::Rank, Suit)) -> Hole {
        Hole::from((Card::from(a), Card::from(b)))
    }

    /// Preflop clustering never touches a loaded table.
    #[test]
    fn preflop_needs_no_table() {
        let map = ClusterMap::from_tables(Arc::new(StubIndexer), vec![], vec![], vec![]);
        let h = hole((bp_cards::Rank::Ace, Suit::S), (bp_cards::Rank::King, Suit::S));
        assert_eq!(map.cluster(Street::Pref, h, &[]), crate::preflop_class(h));
    }

    /// Postflop clustering routes through the indexer into the matching
    /// street's table.
    #[test]
    fn postflop_routes_through_indexer_and_table() {
        let flop = vec![10u16, 11, 12, 13];
        let map = ClusterMap::from_tables(Arc::new(StubIndexer), flop.clone(), vec![], vec![]);
        let h = hole((bp_cards::Rank::Two, Suit::C), (bp_cards::Rank::Three, Suit::C));
        let board = Card::parse("4h 5s 6c").unwrap();
        let cluster = map.cluster(Street::Flop, h, &board);
        assert!(flop.contains(&cluster));
    }
}
