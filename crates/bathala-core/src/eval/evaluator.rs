use super::category::HandCategory;
use super::elemental::{self, SpecialEffect};
use crate::model::card::Card;
use crate::model::element::{Element, ElementTally};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Largest subset the engine scores; bounds enumeration at 31 subsets.
pub const MAX_HAND_CARDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("hand evaluation accepts at most {max} cards, got {found}")]
    TooManyCards { found: usize, max: usize },
}

/// Bitmask over the input slice selecting one subset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SubsetMask(u8);

impl SubsetMask {
    pub const EMPTY: SubsetMask = SubsetMask(0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, index: usize) -> bool {
        index < 8 && self.0 & (1 << index) != 0
    }

    pub fn select(self, cards: &[Card]) -> Vec<Card> {
        cards
            .iter()
            .enumerate()
            .filter(|(index, _)| self.contains(*index))
            .map(|(_, card)| *card)
            .collect()
    }

    /// Every non-empty subset of `size` inputs, in ascending mask order.
    fn non_empty(size: usize) -> impl Iterator<Item = SubsetMask> {
        let limit = 1u16 << size;
        (1..limit).map(|bits| SubsetMask(bits as u8))
    }
}

/// Scored view of one card subset. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: HandCategory,
    pub base_score: u32,
    /// Everything the elements added on top of `base_score`, Air doubling included.
    pub elemental_modifier: u32,
    pub total: u32,
    pub damage: u32,
    pub block: u32,
    /// Ranks ordered by multiplicity then value; a straight reports its high card.
    pub kickers: Vec<u8>,
    pub effects: Vec<SpecialEffect>,
    pub description: String,
    pub card_count: usize,
}

impl HandEvaluation {
    pub fn zero() -> Self {
        Self {
            category: HandCategory::HighCard,
            base_score: 0,
            elemental_modifier: 0,
            total: 0,
            damage: 0,
            block: 0,
            kickers: Vec::new(),
            effects: Vec::new(),
            description: "No cards played".to_string(),
            card_count: 0,
        }
    }

    pub fn has_effect(&self, effect: SpecialEffect) -> bool {
        self.effects.contains(&effect)
    }

    /// Total value, then category, then kickers.
    pub fn strength_cmp(&self, other: &Self) -> Ordering {
        self.total
            .cmp(&other.total)
            .then(self.category.cmp(&other.category))
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetEvaluation {
    pub mask: SubsetMask,
    pub cards: Vec<Card>,
    pub evaluation: HandEvaluation,
}

impl SubsetEvaluation {
    fn empty() -> Self {
        Self {
            mask: SubsetMask::EMPTY,
            cards: Vec::new(),
            evaluation: HandEvaluation::zero(),
        }
    }

    /// Stronger evaluations first; at equal strength the smaller subset wins,
    /// then the lower mask so the order is total.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .evaluation
            .strength_cmp(&self.evaluation)
            .then(self.cards.len().cmp(&other.cards.len()))
            .then(self.mask.cmp(&other.mask))
    }
}

pub struct HandEvaluator;

impl HandEvaluator {
    /// Scores exactly the given cards as one subset.
    pub fn evaluate(cards: &[Card]) -> Result<HandEvaluation, EvalError> {
        check_size(cards)?;
        if cards.is_empty() {
            return Ok(HandEvaluation::zero());
        }

        let (category, kickers) = classify(cards);
        let base_score = category.base_value();
        let tally = ElementTally::from_elements(cards.iter().map(|card| card.element));
        let outcome = elemental::apply(base_score, &tally);
        let total = outcome.total();
        let elemental_modifier = total.saturating_sub(base_score);
        let description = describe(category, &tally, elemental_modifier);

        Ok(HandEvaluation {
            category,
            base_score,
            elemental_modifier,
            total,
            damage: outcome.damage,
            block: outcome.block,
            kickers,
            effects: outcome.effects,
            description,
            card_count: cards.len(),
        })
    }

    /// Every non-empty subset, best first.
    pub fn rank_subsets(cards: &[Card]) -> Result<Vec<SubsetEvaluation>, EvalError> {
        check_size(cards)?;
        let mut ranked = SubsetMask::non_empty(cards.len())
            .map(|mask| {
                let subset = mask.select(cards);
                let evaluation = Self::evaluate(&subset)?;
                Ok(SubsetEvaluation {
                    mask,
                    cards: subset,
                    evaluation,
                })
            })
            .collect::<Result<Vec<_>, EvalError>>()?;
        ranked.sort_by(SubsetEvaluation::rank_cmp);
        Ok(ranked)
    }

    /// The single best subset; an empty input yields the zero evaluation.
    pub fn best_subset(cards: &[Card]) -> Result<SubsetEvaluation, EvalError> {
        let ranked = Self::rank_subsets(cards)?;
        Ok(ranked
            .into_iter()
            .next()
            .unwrap_or_else(SubsetEvaluation::empty))
    }
}

fn check_size(cards: &[Card]) -> Result<(), EvalError> {
    if cards.len() > MAX_HAND_CARDS {
        return Err(EvalError::TooManyCards {
            found: cards.len(),
            max: MAX_HAND_CARDS,
        });
    }
    Ok(())
}

fn classify(cards: &[Card]) -> (HandCategory, Vec<u8>) {
    let size = cards.len();
    let mut counts = [0u8; 15];
    for card in cards {
        counts[card.rank.value() as usize] += 1;
    }

    // (count, rank), largest group first, then highest rank.
    let mut groups: Vec<(u8, u8)> = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(rank, count)| (*count, rank as u8))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let kickers: Vec<u8> = groups.iter().map(|&(_, rank)| rank).collect();
    let top = groups.first().map(|group| group.0).unwrap_or(0);
    let second = groups.get(1).map(|group| group.0).unwrap_or(0);

    let flush = size == MAX_HAND_CARDS && cards.iter().all(|card| card.suit == cards[0].suit);
    let straight_high = if size >= 3 && groups.len() == size {
        straight_high(cards)
    } else {
        None
    };

    let category = match (straight_high, flush, top, second) {
        (Some(_), true, _, _) => HandCategory::StraightFlush,
        (_, _, 4, _) => HandCategory::FourOfAKind,
        (_, _, 3, 2) => HandCategory::FullHouse,
        (_, true, _, _) => HandCategory::Flush,
        (Some(_), _, _, _) => HandCategory::Straight,
        (_, _, 3, _) => HandCategory::ThreeOfAKind,
        (_, _, 2, 2) => HandCategory::TwoPair,
        (_, _, 2, _) => HandCategory::Pair,
        _ => HandCategory::HighCard,
    };

    match (category, straight_high) {
        (HandCategory::Straight | HandCategory::StraightFlush, Some(high)) => (category, vec![high]),
        _ => (category, kickers),
    }
}

/// High card of a run covering every card, letting the ace play low.
fn straight_high(cards: &[Card]) -> Option<u8> {
    let run = |mut values: Vec<u8>| -> Option<u8> {
        values.sort_unstable();
        let low = *values.first()?;
        let high = *values.last()?;
        (usize::from(high - low) == values.len() - 1).then_some(high)
    };

    run(cards.iter().map(|card| card.rank.value()).collect()).or_else(|| {
        if cards.iter().any(|card| card.rank.low_value() == 1) {
            run(cards.iter().map(|card| card.rank.low_value()).collect())
        } else {
            None
        }
    })
}

fn describe(category: HandCategory, tally: &ElementTally, elemental_modifier: u32) -> String {
    let dominant = tally.dominant().unwrap_or(Element::Neutral);
    if elemental_modifier > 0 {
        format!("{} ({} enhanced)", category.label(), dominant)
    } else {
        format!("{} ({})", category.label(), dominant)
    }
}
