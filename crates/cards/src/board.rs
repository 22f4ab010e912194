use super::card::Card;
use super::hand::Hand;
use super::street::Street;

/// The community cards visible to all players, revealed street by street.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Board {
    cards: Hand,
    street: Street,
}

impl Board {
    pub fn empty() -> Self {
        Self { cards: Hand::empty(), street: Street::Pref }
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn cards(&self) -> Hand {
        self.cards
    }
    pub fn len(&self) -> usize {
        self.cards.size()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.size() == 0
    }
    /// Adds the cards revealed on `street` (3 on the flop, 1 otherwise) and
    /// advances the board's street marker.
    pub fn reveal(&mut self, street: Street, revealed: Hand) {
        debug_assert_eq!(revealed.size(), street.n_revealed());
        self.cards = Hand::add(self.cards, revealed);
        self.street = street;
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.cards)
    }
}

impl TryFrom<&str> for Board {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let cards = Card::parse(s)?;
        let street = match cards.len() {
            0 => Street::Pref,
            3 => Street::Flop,
            4 => Street::Turn,
            5 => Street::River,
            n => return Err(format!("invalid board card count: {n}")),
        };
        let cards = cards.into_iter().map(Hand::from).fold(Hand::empty(), Hand::add);
        Ok(Self { cards, street })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A five-card string parses to the river street.
    #[test]
    fn parses_river_board() {
        let board = Board::try_from("AdKh9s9h5c").unwrap();
        assert_eq!(board.street(), Street::River);
        assert_eq!(board.len(), 5);
    }

    /// Revealing the flop after an empty board lands on three cards.
    #[test]
    fn reveal_flop() {
        let mut board = Board::empty();
        let flop = Hand::try_from("2c 3d 4h").unwrap();
        board.reveal(Street::Flop, flop);
        assert_eq!(board.len(), 3);
    }
}
