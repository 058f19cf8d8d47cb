use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Spades = 2,
    Hearts = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Clubs),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Spades),
            3 => Some(Suit::Hearts),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    const fn symbol(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Spades => "S",
            Suit::Hearts => "H",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Suit {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "clubs" => Ok(Suit::Clubs),
            "d" | "diamonds" => Ok(Suit::Diamonds),
            "s" | "spades" => Ok(Suit::Spades),
            "h" | "hearts" => Ok(Suit::Hearts),
            other => Err(format!("unknown suit '{other}'")),
        }
    }
}
