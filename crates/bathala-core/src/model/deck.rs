use crate::model::card::Card;
use crate::model::element::Element;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::str::FromStr;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Elemental distribution used when dealing a deck for a creature or player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeckTheme {
    Fire,
    Water,
    Earth,
    Air,
    Chaos,
    #[default]
    Balanced,
}

impl DeckTheme {
    /// Percentage weights per element, indexed by `Element::index`.
    pub const fn weights(self) -> [u32; Element::COUNT] {
        match self {
            DeckTheme::Fire => [60, 0, 0, 20, 20],
            DeckTheme::Water => [0, 60, 20, 0, 20],
            DeckTheme::Earth => [0, 20, 60, 0, 20],
            DeckTheme::Air => [20, 0, 0, 60, 20],
            DeckTheme::Chaos | DeckTheme::Balanced => [20, 20, 20, 20, 20],
        }
    }

    /// Theme matching a creature's elemental affinity.
    pub const fn for_element(element: Element) -> Self {
        match element {
            Element::Fire => DeckTheme::Fire,
            Element::Water => DeckTheme::Water,
            Element::Earth => DeckTheme::Earth,
            Element::Air => DeckTheme::Air,
            Element::Neutral => DeckTheme::Balanced,
        }
    }

    fn pick_element<R: Rng + ?Sized>(self, rng: &mut R) -> Element {
        let weights = self.weights();
        let total: u32 = weights.iter().sum();
        let mut roll = rng.gen_range(0..total);
        for (index, weight) in weights.iter().copied().enumerate() {
            if roll < weight {
                return Element::from_index(index).unwrap_or(Element::Neutral);
            }
            roll -= weight;
        }
        Element::Neutral
    }
}

impl FromStr for DeckTheme {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(DeckTheme::Fire),
            "water" => Ok(DeckTheme::Water),
            "earth" => Ok(DeckTheme::Earth),
            "air" => Ok(DeckTheme::Air),
            "chaos" => Ok(DeckTheme::Chaos),
            "balanced" => Ok(DeckTheme::Balanced),
            other => Err(format!("unknown deck theme '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 rank/suit combinations, every card neutral.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::neutral(rank, suit));
            }
        }
        Self { cards }
    }

    /// Standard deck with elements drawn from `theme`, then shuffled.
    pub fn themed<R: Rng + ?Sized>(theme: DeckTheme, rng: &mut R) -> Self {
        let mut deck = Self::standard();
        for card in deck.cards.iter_mut() {
            *card = card.with_element(theme.pick_element(rng));
        }
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn themed_with_seed(theme: DeckTheme, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::themed(theme, &mut rng)
    }

    pub fn shuffle_in_place<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draws up to `count` cards from the top of the deck.
    pub fn draw(&mut self, count: usize) -> Vec<Card> {
        let take = count.min(self.cards.len());
        let split = self.cards.len() - take;
        self.cards.split_off(split)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
