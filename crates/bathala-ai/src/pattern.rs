use crate::error::Result;
use crate::personality::unit;
use bathala_core::combat::{CombatError, CombatState, FixedAction};
use bathala_core::eval::{EvalError, HandEvaluator};
use bathala_core::model::card::Card;
use bathala_core::model::element::Element;
use serde::{Deserialize, Serialize};

const NEUTRAL_AGGRESSION: f32 = 0.5;

/// What the player did on their turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Cards(Vec<Card>),
    Action(FixedAction),
}

impl Observation {
    pub fn cards(&self) -> &[Card] {
        match self {
            Observation::Cards(cards) => cards.as_slice(),
            Observation::Action(_) => &[],
        }
    }

    /// Share of the play that went into damage, in [0, 1].
    fn aggression_sample(&self) -> std::result::Result<f32, EvalError> {
        match self {
            Observation::Cards(cards) => {
                let evaluation = HandEvaluator::evaluate(cards)?;
                let total = evaluation.damage + evaluation.block;
                if total == 0 {
                    Ok(0.0)
                } else {
                    Ok(evaluation.damage as f32 / total as f32)
                }
            }
            Observation::Action(action) => Ok(action.aggression()),
        }
    }
}

/// Running picture of the opponent inside one combat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentPatternModel {
    element_frequency: [u32; Element::COUNT],
    aggression: f32,
    sample_count: u32,
    last_turn: Option<u32>,
}

impl Default for OpponentPatternModel {
    fn default() -> Self {
        Self {
            element_frequency: [0; Element::COUNT],
            aggression: NEUTRAL_AGGRESSION,
            sample_count: 0,
            last_turn: None,
        }
    }
}

impl OpponentPatternModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observed play into the model. Nothing changes on error.
    pub fn record(
        &mut self,
        observation: &Observation,
        turn: u32,
        state: &CombatState,
        alpha: f32,
    ) -> Result<()> {
        state.validate()?;
        if turn == 0 {
            return Err(CombatError::ZeroTurn.into());
        }
        let sample = observation.aggression_sample()?;

        for card in observation.cards() {
            let slot = &mut self.element_frequency[card.element.index()];
            *slot = slot.saturating_add(1);
        }
        let alpha = unit(alpha);
        self.aggression = unit(self.aggression * (1.0 - alpha) + sample * alpha);
        self.sample_count = self.sample_count.saturating_add(1);
        self.last_turn = Some(self.last_turn.map_or(turn, |last| last.max(turn)));
        Ok(())
    }

    pub fn frequency(&self, element: Element) -> u32 {
        self.element_frequency[element.index()]
    }

    pub fn frequencies(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL
            .into_iter()
            .map(move |element| (element, self.frequency(element)))
    }

    pub fn aggression(&self) -> f32 {
        self.aggression
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn last_turn(&self) -> Option<u32> {
        self.last_turn
    }

    /// Most seen element; ties resolve Fire, Water, Earth, Air, Neutral.
    pub fn dominant_element(&self) -> Option<Element> {
        let mut best: Option<(Element, u32)> = None;
        for (element, count) in self.frequencies() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= count => {}
                _ => best = Some((element, count)),
            }
        }
        best.map(|(element, _)| element)
    }

    pub fn counter_element(element: Element) -> Element {
        element.counter()
    }

    pub fn is_informative(&self, min_observations: u32) -> bool {
        self.sample_count > min_observations
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bathala_core::combat::CombatantState;
    use bathala_core::model::rank::Rank;
    use bathala_core::model::suit::Suit;

    fn state() -> CombatState {
        CombatState::new(CombatantState::full(60), CombatantState::full(40), 1)
    }

    fn fire(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts, Element::Fire)
    }

    #[test]
    fn counts_elements_and_samples() {
        let mut model = OpponentPatternModel::new();
        let play = Observation::Cards(vec![fire(Rank::Two), fire(Rank::Three)]);
        model.record(&play, 1, &state(), 0.5).unwrap();

        assert_eq!(model.frequency(Element::Fire), 2);
        assert_eq!(model.sample_count(), 1);
        assert_eq!(model.dominant_element(), Some(Element::Fire));
        // Pure damage play: 0.5 * 0.5 + 1.0 * 0.5.
        assert!((model.aggression() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn aggression_follows_actions() {
        let mut model = OpponentPatternModel::new();
        for turn in 1..=20 {
            model
                .record(&Observation::Action(FixedAction::Defend), turn, &state(), 0.3)
                .unwrap();
        }
        assert!(model.aggression() < 0.01);
        assert_eq!(model.dominant_element(), None);
        assert_eq!(model.last_turn(), Some(20));
    }

    #[test]
    fn dominant_ties_follow_element_order() {
        let mut model = OpponentPatternModel::new();
        let play = Observation::Cards(vec![
            Card::new(Rank::Four, Suit::Clubs, Element::Air),
            Card::new(Rank::Nine, Suit::Clubs, Element::Water),
        ]);
        model.record(&play, 1, &state(), 0.2).unwrap();
        assert_eq!(model.dominant_element(), Some(Element::Water));
    }

    #[test]
    fn informative_only_past_threshold() {
        let mut model = OpponentPatternModel::new();
        for turn in 1..=3 {
            model
                .record(&Observation::Action(FixedAction::Attack), turn, &state(), 0.2)
                .unwrap();
        }
        assert!(!model.is_informative(3));
        model
            .record(&Observation::Action(FixedAction::Attack), 4, &state(), 0.2)
            .unwrap();
        assert!(model.is_informative(3));
    }

    #[test]
    fn failed_record_changes_nothing() {
        let mut model = OpponentPatternModel::new();
        let oversized = Observation::Cards(
            Rank::ORDERED.iter().take(6).map(|rank| fire(*rank)).collect(),
        );
        assert!(model.record(&oversized, 1, &state(), 0.5).is_err());
        assert_eq!(model, OpponentPatternModel::new());

        let mut broken = state();
        broken.player.health = -3;
        assert!(
            model
                .record(&Observation::Action(FixedAction::Attack), 1, &broken, 0.5)
                .is_err()
        );
        assert_eq!(model.sample_count(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut model = OpponentPatternModel::new();
        model
            .record(&Observation::Cards(vec![fire(Rank::Ace)]), 2, &state(), 0.4)
            .unwrap();
        model.reset();
        assert_eq!(model, OpponentPatternModel::default());
    }

    #[test]
    fn counters_pair_up() {
        assert_eq!(OpponentPatternModel::counter_element(Element::Fire), Element::Water);
        assert_eq!(OpponentPatternModel::counter_element(Element::Air), Element::Earth);
        assert_eq!(
            OpponentPatternModel::counter_element(Element::Neutral),
            Element::Neutral
        );
    }
}
