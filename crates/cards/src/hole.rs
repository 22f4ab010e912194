use super::card::Card;
use super::hand::Hand;

/// A player's two private hole cards.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hole(Card, Card);

impl Hole {
    /// Canonical form: the higher card first. Used as the key for
    /// [`crate::range::HoleCardIndexer`] so `AsKh` and `KhAs` index the same
    /// 1326-combo slot.
    pub fn canonical(self) -> Self {
        if self.0 >= self.1 {
            self
        } else {
            Self(self.1, self.0)
        }
    }
    pub fn high(&self) -> Card {
        self.0.max(self.1)
    }
    pub fn low(&self) -> Card {
        self.0.min(self.1)
    }
    pub fn cards(&self) -> [Card; 2] {
        [self.0, self.1]
    }
    pub fn contains(&self, card: Card) -> bool {
        self.0 == card || self.1 == card
    }
}

impl From<(Card, Card)> for Hole {
    fn from((a, b): (Card, Card)) -> Self {
        Self(a, b)
    }
}
impl From<Hole> for Hand {
    fn from(hole: Hole) -> Self {
        Hand::add(Hand::from(hole.0), Hand::from(hole.1))
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

impl TryFrom<&str> for Hole {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let cards = Card::parse(s)?;
        match cards.as_slice() {
            [a, b] => Ok(Self(*a, *b)),
            _ => Err(format!("hole requires exactly 2 cards: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonical form is stable regardless of input order.
    #[test]
    fn canonical_is_order_independent() {
        let a = Hole::try_from("2c As").unwrap().canonical();
        let b = Hole::try_from("As 2c").unwrap().canonical();
        assert_eq!(a, b);
    }

    /// The canonical high card is never lower than the low card.
    #[test]
    fn high_ge_low() {
        let hole = Hole::try_from("As 2c").unwrap();
        assert!(hole.high() >= hole.low());
    }
}
