use crate::config::CandidateMode;
use crate::creature::CreatureProfile;
use crate::personality::PersonalityProfile;
use bathala_core::combat::{CombatState, FixedAction};
use bathala_core::eval::{EvalError, HandEvaluation, HandEvaluator, MAX_HAND_CARDS, SpecialEffect};
use bathala_core::model::card::Card;
use bathala_core::model::element::{Element, ElementTally};
use serde::{Deserialize, Serialize};

const ATTACK_VARIANCE: f32 = 0.5;
const DEFEND_VARIANCE: f32 = 0.1;
const STATUS_VARIANCE: f32 = 0.7;

/// Position of a candidate in the turn's gathered list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CandidateId(pub u16);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Effect {
    Hand(SpecialEffect),
    Ability(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Cards {
        cards: Vec<Card>,
        evaluation: HandEvaluation,
    },
    Action(FixedAction),
}

/// One legal move with the raw numbers the scorer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub kind: CandidateKind,
    pub damage: u32,
    pub block: u32,
    /// Spread of the outcome in [0, 1]; larger and rarer plays swing more.
    pub variance: f32,
    #[serde(skip)]
    pub elements: ElementTally,
    pub effects: Vec<Effect>,
}

impl Candidate {
    /// Cards spent, or one for an action.
    pub fn size(&self) -> usize {
        match &self.kind {
            CandidateKind::Cards { cards, .. } => cards.len(),
            CandidateKind::Action(_) => 1,
        }
    }

    pub fn cards(&self) -> &[Card] {
        match &self.kind {
            CandidateKind::Cards { cards, .. } => cards.as_slice(),
            CandidateKind::Action(_) => &[],
        }
    }

    pub fn action(&self) -> Option<FixedAction> {
        match self.kind {
            CandidateKind::Action(action) => Some(action),
            CandidateKind::Cards { .. } => None,
        }
    }

    pub fn label(&self) -> String {
        match &self.kind {
            CandidateKind::Cards { cards, evaluation } => {
                let cards = cards
                    .iter()
                    .map(|card| card.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{} [{}]", evaluation.category, cards)
            }
            CandidateKind::Action(action) => action.to_string(),
        }
    }
}

pub(crate) fn gather(
    mode: CandidateMode,
    state: &CombatState,
    creature: &CreatureProfile,
) -> Result<Vec<Candidate>, EvalError> {
    match mode {
        CandidateMode::CardSubsets => card_candidates(&state.ai_hand),
        CandidateMode::FixedActions => Ok(action_candidates(creature)),
    }
}

fn card_candidates(pool: &[Card]) -> Result<Vec<Candidate>, EvalError> {
    let ranked = HandEvaluator::rank_subsets(pool)?;
    Ok(ranked
        .into_iter()
        .enumerate()
        .map(|(index, subset)| {
            let evaluation = subset.evaluation;
            let variance = card_variance(subset.cards.len(), &evaluation);
            Candidate {
                id: CandidateId(index as u16),
                damage: evaluation.damage,
                block: evaluation.block,
                variance,
                elements: ElementTally::from_elements(subset.cards.iter().map(|c| c.element)),
                effects: evaluation.effects.iter().copied().map(Effect::Hand).collect(),
                kind: CandidateKind::Cards {
                    cards: subset.cards,
                    evaluation,
                },
            }
        })
        .collect())
}

fn card_variance(size: usize, evaluation: &HandEvaluation) -> f32 {
    let spread = size as f32 / MAX_HAND_CARDS as f32;
    let rarity = evaluation.category.ordinal() as f32 / 8.0;
    spread * 0.5 + rarity * 0.5
}

fn action_candidates(creature: &CreatureProfile) -> Vec<Candidate> {
    let elements = ElementTally::from_elements([creature.element]);
    FixedAction::ALL
        .into_iter()
        .enumerate()
        .map(|(index, action)| {
            let (damage, block, variance, effects) = match action {
                FixedAction::Attack => (creature.base_damage, 0, ATTACK_VARIANCE, Vec::new()),
                FixedAction::Defend => (0, creature.base_block, DEFEND_VARIANCE, Vec::new()),
                FixedAction::Status => (
                    creature.base_damage / 2,
                    creature.base_block / 2,
                    STATUS_VARIANCE,
                    vec![Effect::Ability(creature.status_ability().to_string())],
                ),
            };
            Candidate {
                id: CandidateId(index as u16),
                kind: CandidateKind::Action(action),
                damage,
                block,
                variance,
                elements,
                effects,
            }
        })
        .collect()
}

/// Net count of counter-element cards over cards feeding `dominant`,
/// capped to [-1, 1]. Elements the profile prefers never count against a play.
pub(crate) fn counter_share(
    candidate: &Candidate,
    dominant: Element,
    counter: Element,
    profile: &PersonalityProfile,
) -> f32 {
    if dominant == counter {
        return 0.0;
    }
    let helpful = candidate.elements.count(counter) as f32;
    let harmful = if profile.prefers(dominant) {
        0.0
    } else {
        candidate.elements.count(dominant) as f32
    };
    (helpful - harmful).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personality::Archetype;
    use bathala_core::combat::CombatantState;
    use bathala_core::model::rank::Rank;
    use bathala_core::model::suit::Suit;

    fn kapre() -> CreatureProfile {
        CreatureProfile::new("Kapre", 10, 8, Element::Earth).with_abilities(["smoke_screen"])
    }

    #[test]
    fn fixed_actions_come_from_base_stats() {
        let candidates = action_candidates(&kapre());
        assert_eq!(candidates.len(), 3);

        let status = &candidates[2];
        assert_eq!(status.action(), Some(FixedAction::Status));
        assert_eq!((status.damage, status.block), (5, 4));
        assert_eq!(status.effects, vec![Effect::Ability("smoke_screen".into())]);
        assert!(candidates.iter().all(|c| c.elements.count(Element::Earth) == 1));
    }

    #[test]
    fn card_mode_enumerates_every_subset() {
        let pool = vec![
            Card::new(Rank::Five, Suit::Clubs, Element::Fire),
            Card::new(Rank::Five, Suit::Hearts, Element::Water),
            Card::new(Rank::King, Suit::Spades, Element::Neutral),
        ];
        let state = CombatState::new(CombatantState::full(50), CombatantState::full(50), 1)
            .with_hand(pool);
        let candidates = gather(CandidateMode::CardSubsets, &state, &kapre()).unwrap();
        assert_eq!(candidates.len(), 7);
        for (index, candidate) in candidates.iter().enumerate() {
            assert_eq!(candidate.id, CandidateId(index as u16));
            assert!((0.0..=1.0).contains(&candidate.variance));
        }
    }

    #[test]
    fn empty_pool_gathers_nothing() {
        let state = CombatState::new(CombatantState::full(50), CombatantState::full(50), 1);
        assert!(gather(CandidateMode::CardSubsets, &state, &kapre()).unwrap().is_empty());
    }

    fn attack_with(elements: &[Element]) -> Candidate {
        Candidate {
            id: CandidateId(0),
            kind: CandidateKind::Action(FixedAction::Attack),
            damage: 1,
            block: 0,
            variance: 0.0,
            elements: ElementTally::from_elements(elements.iter().copied()),
            effects: Vec::new(),
        }
    }

    #[test]
    fn counter_share_rewards_counter_cards() {
        let calculating = Archetype::Calculating.template();
        let water = attack_with(&[Element::Water]);
        assert_eq!(counter_share(&water, Element::Fire, Element::Water, &calculating), 1.0);
        assert_eq!(counter_share(&water, Element::Water, Element::Fire, &calculating), -1.0);
        assert_eq!(counter_share(&water, Element::Neutral, Element::Neutral, &calculating), 0.0);

        let doubled = attack_with(&[Element::Water, Element::Water, Element::Air]);
        assert_eq!(counter_share(&doubled, Element::Fire, Element::Water, &calculating), 1.0);
    }

    #[test]
    fn preferred_elements_never_count_against_a_play() {
        let aggressive = Archetype::Aggressive.template();
        assert!(aggressive.prefers(Element::Fire));

        let fire = attack_with(&[Element::Fire]);
        assert_eq!(counter_share(&fire, Element::Fire, Element::Water, &aggressive), 0.0);

        let mixed = attack_with(&[Element::Water, Element::Fire]);
        let water = attack_with(&[Element::Water]);
        assert_eq!(
            counter_share(&mixed, Element::Fire, Element::Water, &aggressive),
            counter_share(&water, Element::Fire, Element::Water, &aggressive)
        );
    }
}
