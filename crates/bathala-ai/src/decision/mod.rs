//! Gather, score and select.
//!
//! `DecisionEngine` is stateless: everything it reads arrives through a
//! `DecisionContext`, and the only thing it mutates is the caller's RNG.

mod candidate;
mod reasoning;
mod scoring;
mod select;

pub use candidate::{Candidate, CandidateId, CandidateKind, Effect};
pub use reasoning::Reasoning;
pub use scoring::{BLOCK_SCALE, DAMAGE_SCALE, EffectiveWeights, Factor, ScoreBreakdown};
pub use select::ScoredCandidate;

use crate::config::AiConfig;
use crate::creature::CreatureProfile;
use crate::difficulty::DifficultyProfile;
use crate::error::Result;
use crate::pattern::OpponentPatternModel;
use crate::personality::PersonalityProfile;
use bathala_core::combat::{CombatState, FixedAction};
use bathala_core::eval::HandEvaluation;
use bathala_core::model::card::Card;
use bathala_core::model::element::Element;
use rand::Rng;
use scoring::{CounterBias, ScoreInput};
use serde::Serialize;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub state: &'a CombatState,
    pub creature: &'a CreatureProfile,
    pub profile: &'a PersonalityProfile,
    pub pattern: &'a OpponentPatternModel,
    pub difficulty: DifficultyProfile,
    pub config: AiConfig,
}

impl<'a> DecisionContext<'a> {
    pub fn weights(&self) -> EffectiveWeights {
        EffectiveWeights::compose(self.profile, &self.difficulty)
    }

    /// Opponent element worth countering, once the model has seen enough.
    pub fn counter_target(&self) -> Option<Element> {
        self.counter_bias(&self.weights()).map(|bias| bias.counter)
    }

    fn counter_bias(&self, weights: &EffectiveWeights) -> Option<CounterBias> {
        if !self.pattern.is_informative(self.config.min_observations) {
            return None;
        }
        self.pattern
            .dominant_element()
            .and_then(|dominant| CounterBias::new(dominant, weights))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionKind {
    PlayCards {
        cards: Vec<Card>,
        evaluation: HandEvaluation,
    },
    Action {
        action: FixedAction,
    },
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub kind: DecisionKind,
    /// Candidate evaluated this turn; `None` only for a pass.
    pub candidate: Option<CandidateId>,
    pub estimated_damage: u32,
    pub estimated_block: u32,
    pub effects: Vec<Effect>,
    pub confidence: f32,
    pub utility: f32,
    pub bluff: bool,
    pub reasoning: Reasoning,
}

impl Decision {
    fn pass(ctx: &DecisionContext<'_>) -> Self {
        Self {
            kind: DecisionKind::Pass,
            candidate: None,
            estimated_damage: 0,
            estimated_block: 0,
            effects: Vec::new(),
            confidence: 1.0,
            utility: 0.0,
            bluff: false,
            reasoning: Reasoning::pass(ctx.profile.archetype),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.kind, DecisionKind::Pass)
    }

    pub fn cards(&self) -> &[Card] {
        match &self.kind {
            DecisionKind::PlayCards { cards, .. } => cards.as_slice(),
            _ => &[],
        }
    }

    pub fn action(&self) -> Option<FixedAction> {
        match self.kind {
            DecisionKind::Action { action } => Some(action),
            _ => None,
        }
    }
}

pub struct DecisionEngine;

impl DecisionEngine {
    /// Every legal move for this turn, in a stable order.
    pub fn gather(ctx: &DecisionContext<'_>) -> Result<Vec<Candidate>> {
        ctx.state.validate()?;
        Ok(candidate::gather(
            ctx.config.candidate_mode,
            ctx.state,
            ctx.creature,
        )?)
    }

    /// Scores and ranks candidates best-first. Chaotic creatures draw one
    /// jitter sample per candidate, in gather order.
    pub fn score<R: Rng + ?Sized>(
        ctx: &DecisionContext<'_>,
        candidates: Vec<Candidate>,
        rng: &mut R,
    ) -> Vec<ScoredCandidate> {
        let weights = ctx.weights();
        let input = ScoreInput {
            profile: ctx.profile,
            weights,
            state: ctx.state,
            counter: ctx.counter_bias(&weights),
        };
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let breakdown = scoring::score(&candidate, &input, rng);
                ScoredCandidate::new(candidate, breakdown)
            })
            .collect();
        select::rank(&mut scored);
        scored
    }

    pub fn decide<R: Rng + ?Sized>(ctx: &DecisionContext<'_>, rng: &mut R) -> Result<Decision> {
        let candidates = Self::gather(ctx)?;
        let gathered = candidates.len();
        let ranked = Self::score(ctx, candidates, rng);

        let weights = ctx.weights();
        let allow_bluff =
            ctx.config.bluffing && select::bluff_permitted(ctx.profile.archetype, ctx.state);
        let Some(selection) = select::select(&ranked, weights.bluff, allow_bluff, rng) else {
            let decision = Decision::pass(ctx);
            log_decision(ctx, gathered, &decision, "no_candidates");
            return Ok(decision);
        };

        let confidence = select::confidence(&ranked, selection);
        let chosen = &ranked[selection.index];
        let candidate = &chosen.candidate;
        let reasoning = Reasoning::explain(
            ctx.profile.archetype,
            &candidate.label(),
            chosen.breakdown,
            selection.bluff,
            ctx.counter_bias(&weights).map(|bias| bias.counter),
        );
        let kind = match &candidate.kind {
            CandidateKind::Cards { cards, evaluation } => DecisionKind::PlayCards {
                cards: cards.clone(),
                evaluation: evaluation.clone(),
            },
            CandidateKind::Action(action) => DecisionKind::Action { action: *action },
        };

        let decision = Decision {
            kind,
            candidate: Some(candidate.id),
            estimated_damage: (candidate.damage as f32 * weights.damage_multiplier).round() as u32,
            estimated_block: candidate.block,
            effects: candidate.effects.clone(),
            confidence,
            utility: chosen.utility,
            bluff: selection.bluff,
            reasoning,
        };
        let reason = if selection.bluff { "bluff" } else { "best_utility" };
        log_decision(ctx, gathered, &decision, reason);
        Ok(decision)
    }
}

fn log_decision(ctx: &DecisionContext<'_>, gathered: usize, decision: &Decision, reason: &str) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let chosen = match &decision.kind {
        DecisionKind::PlayCards { cards, evaluation } => format!(
            "{} [{}]",
            evaluation.category,
            cards
                .iter()
                .map(|card| card.to_string())
                .collect::<Vec<_>>()
                .join(",")
        ),
        DecisionKind::Action { action } => action.to_string(),
        DecisionKind::Pass => "pass".to_string(),
    };
    let counter = decision
        .reasoning
        .counter_element
        .map(|element| element.to_string())
        .unwrap_or_default();

    event!(
        target: "bathala_ai::decide",
        Level::INFO,
        creature = %ctx.creature.name,
        archetype = %ctx.profile.archetype,
        level = ctx.difficulty.level,
        turn = ctx.state.turn,
        gathered,
        candidate = ?decision.candidate.map(|id| id.0),
        chosen = %chosen,
        utility = decision.utility,
        confidence = decision.confidence,
        bluff = decision.bluff,
        counter = %counter,
        reason,
    );
}
