use core::fmt;
use serde::{Deserialize, Serialize};

/// Poker-style category of a card subset, weakest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandCategory {
    pub const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::Pair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];

    pub const fn base_value(self) -> u32 {
        match self {
            HandCategory::HighCard => 5,
            HandCategory::Pair => 10,
            HandCategory::TwoPair => 20,
            HandCategory::ThreeOfAKind => 30,
            HandCategory::Straight => 40,
            HandCategory::Flush => 50,
            HandCategory::FullHouse => 70,
            HandCategory::FourOfAKind => 100,
            HandCategory::StraightFlush => 150,
        }
    }

    /// Smallest subset that can form this category.
    pub const fn min_cards(self) -> usize {
        match self {
            HandCategory::HighCard => 1,
            HandCategory::Pair => 2,
            HandCategory::ThreeOfAKind | HandCategory::Straight => 3,
            HandCategory::TwoPair | HandCategory::FourOfAKind => 4,
            HandCategory::Flush | HandCategory::FullHouse | HandCategory::StraightFlush => 5,
        }
    }

    pub const fn is_valid_for(self, size: usize) -> bool {
        size >= self.min_cards() && size <= 5
    }

    /// Position in the category ladder, 0 for high card.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::HandCategory;

    #[test]
    fn base_values_climb_with_category() {
        for pair in HandCategory::ALL.windows(2) {
            assert!(pair[0].base_value() < pair[1].base_value());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn validity_follows_subset_size() {
        assert!(HandCategory::HighCard.is_valid_for(1));
        assert!(!HandCategory::Pair.is_valid_for(1));
        assert!(HandCategory::Straight.is_valid_for(3));
        assert!(!HandCategory::TwoPair.is_valid_for(3));
        assert!(!HandCategory::Flush.is_valid_for(4));
        assert!(HandCategory::StraightFlush.is_valid_for(5));
        assert!(!HandCategory::HighCard.is_valid_for(6));
    }
}
