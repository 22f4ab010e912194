use super::board::Board;
use super::card::Card;
use super::hand::Hand;
use super::hole::Hole;
use super::street::Street;
use rand::seq::SliceRandom;

/// An ordered sequence of the 52 cards plus a set of dead cards excluded
/// from every draw. `draw` walks the order from `current` forward, skipping
/// dead cards; `shuffle`/`reset` rewind `current` to the front.
///
/// Grounded on `examples/original_source/pluribus/poker.hpp`'s `Deck`: a
/// fixed `[u8; 52]` order plus a cursor, rather than the teacher's
/// remaining-cards-as-bitmask representation, so that "dead cards" and
/// "already drawn" stay two independent concepts exactly as the spec
/// requires (a dead card is skipped every time the cursor passes it, not
/// removed once).
#[derive(Debug, Clone)]
pub struct Deck {
    order: [Card; 52],
    dead: Hand,
    current: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(Hand::empty())
    }
}

impl Deck {
    /// A fresh deck in identity order (`0..52`) with the given dead cards
    /// excluded from every draw.
    pub fn new(dead: Hand) -> Self {
        let mut order = [Card::from(0u8); 52];
        for (i, card) in order.iter_mut().enumerate() {
            *card = Card::from(i as u8);
        }
        Self { order, dead, current: 0 }
    }
    /// Marks an additional card dead without resetting the cursor.
    pub fn kill(&mut self, card: Card) {
        self.dead.insert(card);
    }
    /// Rewinds the cursor to the front of the current order.
    pub fn reset(&mut self) {
        self.current = 0;
    }
    /// Randomizes the card order and rewinds the cursor, drawing from
    /// `rng`. Takes the generator as a parameter rather than reaching for
    /// `rand::rng()` so a caller with a seeded generator (e.g. a trainer's
    /// per-worker `SmallRng`) gets reproducible deals.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
        self.current = 0;
    }
    /// Draws the next non-dead card, advancing the cursor past it.
    pub fn draw(&mut self) -> Card {
        loop {
            let card = self.order[self.current];
            self.current += 1;
            debug_assert!(self.current <= 52, "deck exhausted");
            if !self.dead.contains(&card) {
                self.dead.insert(card);
                return card;
            }
        }
    }
    /// Draws two cards as a player's hole cards.
    pub fn hole(&mut self) -> Hole {
        let a = self.draw();
        let b = self.draw();
        Hole::from((a, b))
    }
    /// Fills the board forward from its current street to the river,
    /// drawing whatever cards each intervening street still needs.
    pub fn board(&mut self, mut board: Board) -> Board {
        for street in Street::all() {
            if u8::from(street) <= u8::from(board.street()) && !board.is_empty() {
                continue;
            }
            if street.n_revealed() == 0 {
                continue;
            }
            let revealed = (0..street.n_revealed())
                .map(|_| self.draw())
                .map(Hand::from)
                .fold(Hand::empty(), Hand::add);
            board.reveal(street, revealed);
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dead cards are never returned by `draw`.
    #[test]
    fn skips_dead_cards() {
        let ace = Card::try_from("As").unwrap();
        let mut deck = Deck::new(Hand::from(ace));
        for _ in 0..51 {
            assert_ne!(deck.draw(), ace);
        }
    }

    /// Fifty-two draws from a dead-card-free deck are all distinct.
    #[test]
    fn draws_are_distinct() {
        let mut deck = Deck::default();
        let mut seen = Hand::empty();
        for _ in 0..52 {
            let card = deck.draw();
            assert!(!seen.contains(&card));
            seen.insert(card);
        }
    }

    /// Dealing a full board from empty yields five cards on the river.
    #[test]
    fn deals_full_board() {
        let mut deck = Deck::default();
        let board = deck.board(Board::empty());
        assert_eq!(board.street(), Street::River);
        assert_eq!(board.len(), 5);
    }

    /// `reset` rewinds the cursor so the same order can be redrawn.
    #[test]
    fn reset_rewinds_cursor() {
        let mut deck = Deck::default();
        let first = deck.draw();
        deck.reset();
        assert_eq!(deck.draw(), first);
    }
}
