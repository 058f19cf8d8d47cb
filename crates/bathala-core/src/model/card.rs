use crate::model::element::Element;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub element: Element,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit, element: Element) -> Self {
        Self {
            rank,
            suit,
            element,
        }
    }

    pub const fn neutral(rank: Rank, suit: Suit) -> Self {
        Self::new(rank, suit, Element::Neutral)
    }

    pub const fn with_element(self, element: Element) -> Self {
        Self::new(self.rank, self.suit, element)
    }

    /// Ordering key used for stable presentation: rank, then suit, then element.
    pub fn sort_key(self) -> (u8, u8, u8) {
        (self.rank.value(), self.suit as u8, self.element as u8)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", self.rank, self.suit, self.element)
    }
}
