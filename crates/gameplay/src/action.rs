/// A single player decision. `FractionalBet` carries the target bet size as
/// a fraction of the pot-plus-call (see [`crate::state::PokerState::apply`]
/// for the exact target-size formula); the variant itself carries no chip
/// amount, unlike `examples/original_source/pluribus/actions.hpp`'s `Action`
/// (a single `float` sentinel encoding fold/call/all-in/bet-size in one
/// field). That encoding collapses distinct actions to equal floats only by
/// convention; this tagged sum makes the cases exhaustive instead.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Fold,
    CheckCall,
    AllIn,
    FractionalBet(f32),
}

impl Action {
    pub fn is_aggressive(&self) -> bool {
        matches!(self, Action::AllIn | Action::FractionalBet(_))
    }
}

/// `f32` has no total order or `Hash` impl (NaN), so equality/hashing for
/// `FractionalBet` compare the fraction's bit pattern rather than deriving.
/// A bet fraction is never NaN in practice (it is always a positive literal
/// from an [`crate::profile::ActionProfile`] menu), so bitwise comparison
/// behaves exactly like value comparison here.
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Action::Fold, Action::Fold) => true,
            (Action::CheckCall, Action::CheckCall) => true,
            (Action::AllIn, Action::AllIn) => true,
            (Action::FractionalBet(a), Action::FractionalBet(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}
impl Eq for Action {}
impl std::hash::Hash for Action {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Action::FractionalBet(f) = self {
            f.to_bits().hash(state);
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "Fold"),
            Action::CheckCall => write!(f, "Check/Call"),
            Action::AllIn => write!(f, "All-in"),
            Action::FractionalBet(frac) => write!(f, "Bet {:.0}%", frac * 100.0),
        }
    }
}

/// Ordered sequence of actions taken since the hand began. Equality and
/// hashing are structural over the contained vector.
#[derive(Debug, Clone, Default, PartialEq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionHistory(Vec<Action>);

impl ActionHistory {
    pub fn push(&mut self, action: Action) {
        self.0.push(action);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }
}

impl Eq for ActionHistory {}

impl std::fmt::Display for ActionHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{action}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Histories with identical action sequences compare equal.
    #[test]
    fn equal_sequences_are_equal() {
        let mut a = ActionHistory::default();
        let mut b = ActionHistory::default();
        a.push(Action::CheckCall);
        a.push(Action::Fold);
        b.push(Action::CheckCall);
        b.push(Action::Fold);
        assert_eq!(a, b);
    }

    /// AllIn and FractionalBet are aggressive; Fold and CheckCall are not.
    #[test]
    fn aggressive_classification() {
        assert!(Action::AllIn.is_aggressive());
        assert!(Action::FractionalBet(0.5).is_aggressive());
        assert!(!Action::Fold.is_aggressive());
        assert!(!Action::CheckCall.is_aggressive());
    }
}
