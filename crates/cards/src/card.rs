use super::rank::Rank;
use super::suit::Suit;

/// A playing card encoded as a single byte, `0..52`.
///
/// The encoding is `rank * 4 + suit`, matching spec's `rank = card / 4, suit
/// = card % 4`, so cards sort first by rank, then by suit within a rank.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Card(u8);

impl Card {
    /// Extracts the rank component (2 through Ace).
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    /// Extracts the suit component (clubs, diamonds, hearts, spades).
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        debug_assert!(n < 52, "card index out of range: {n}");
        Self(n)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().len() {
            2 => {
                let rank = Rank::try_from(&s.trim()[0..1])?;
                let suit = Suit::try_from(&s.trim()[1..2])?;
                Ok(Card::from((rank, suit)))
            }
            _ => Err(format!("card str must be 2 characters: {s}")),
        }
    }
}

impl Card {
    /// Parses a string of concatenated two-character card notations
    /// ("As Th 2c") into a vector of cards. Whitespace is ignored.
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        s.replace(char::is_whitespace, "")
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(|pair| Self::try_from(pair.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (rank, suit) round-trips through the u8 encoding.
    #[test]
    fn bijective_rank_suit() {
        for n in 0..52u8 {
            let card = Card::from(n);
            assert_eq!(card, Card::from((card.rank(), card.suit())));
        }
    }

    /// Display text parses back to the same card.
    #[test]
    fn display_parses_back() {
        let card = Card::from((Rank::Ten, Suit::S));
        assert_eq!(card.to_string(), "Ts");
        assert_eq!(Card::try_from("Ts").unwrap(), card);
    }

    /// A multi-card string parses into the cards in order.
    #[test]
    fn parse_multiple() {
        let cards = Card::parse("As Th 2c").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].to_string(), "As");
    }
}
