use crate::model::card::Card;
use std::vec::Vec;

/// Card pool held by one side, kept in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes every card in `played`; returns false if any was missing.
    pub fn remove_all(&mut self, played: &[Card]) -> bool {
        played
            .iter()
            .fold(true, |all_found, &card| self.remove(card) && all_found)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_by_key(|card| card.sort_key());
    }
}
