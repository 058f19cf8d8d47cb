use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        if value < 2 || value > 14 {
            return None;
        }
        Some(Self::ORDERED[(value - 2) as usize])
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Ordinal used when the ace plays low in an A-2-3-4-5 run.
    pub const fn low_value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            other => other as u8,
        }
    }

    pub const fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(rank) = Rank::ORDERED
            .iter()
            .copied()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(trimmed))
        {
            return Ok(rank);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Rank::from_value)
            .ok_or_else(|| format!("unknown rank '{trimmed}'"))
    }
}
