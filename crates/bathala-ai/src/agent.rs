use crate::config::AiConfig;
use crate::creature::CreatureProfile;
use crate::decision::{Decision, DecisionContext, DecisionEngine, EffectiveWeights};
use crate::difficulty::{DifficultyProfile, DifficultyScaler};
use crate::error::Result;
use crate::pattern::{Observation, OpponentPatternModel};
use crate::personality::{Archetype, PersonalityProfile};
use bathala_core::combat::CombatState;
use bathala_core::model::element::Element;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{Level, event};

const ADAPTATION_LEVEL_GAIN: f32 = 5.0;
const ADAPTATION_LEVEL_CAP: f32 = 100.0;

/// Snapshot of what an AI has learned and done so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiStatistics {
    pub creature: String,
    pub archetype: Archetype,
    pub level: u32,
    /// 0 to 100; grows with observations scaled by the adaptation rate.
    pub adaptation_level: f32,
    pub sample_count: u32,
    pub element_frequencies: BTreeMap<Element, u32>,
    pub aggression: f32,
    pub decisions: u32,
    pub bluffs: u32,
    pub passes: u32,
}

/// One creature's mind: its own personality copy, pattern model, difficulty
/// and random stream. Instances share nothing.
pub struct CreatureAi<R = StdRng> {
    creature: CreatureProfile,
    config: AiConfig,
    profile: PersonalityProfile,
    pattern: OpponentPatternModel,
    difficulty: DifficultyProfile,
    rng: R,
    decisions: u32,
    bluffs: u32,
    passes: u32,
}

impl CreatureAi<StdRng> {
    pub fn new(creature: CreatureProfile, config: AiConfig, level: u32) -> Result<Self> {
        Self::with_rng(creature, config, level, StdRng::from_entropy())
    }

    pub fn with_seed(
        creature: CreatureProfile,
        config: AiConfig,
        level: u32,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(creature, config, level, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CreatureAi<R> {
    pub fn with_rng(creature: CreatureProfile, config: AiConfig, level: u32, rng: R) -> Result<Self> {
        let difficulty = DifficultyScaler::profile(level)?;
        let profile = creature.archetype().template();
        Ok(Self {
            creature,
            config,
            profile,
            pattern: OpponentPatternModel::new(),
            difficulty,
            rng,
            decisions: 0,
            bluffs: 0,
            passes: 0,
        })
    }

    /// Replaces the roster personality, e.g. from configuration.
    pub fn with_profile(mut self, mut profile: PersonalityProfile) -> Self {
        profile.clamp();
        self.profile = profile;
        self
    }

    pub fn creature(&self) -> &CreatureProfile {
        &self.creature
    }

    pub fn config(&self) -> AiConfig {
        self.config
    }

    pub fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    pub fn pattern(&self) -> &OpponentPatternModel {
        &self.pattern
    }

    pub fn difficulty(&self) -> DifficultyProfile {
        self.difficulty
    }

    /// Forgets the previous opponent. Personality drift is kept.
    pub fn begin_combat(&mut self) {
        self.pattern.reset();
    }

    pub fn decide(&mut self, state: &CombatState) -> Result<Decision> {
        let ctx = DecisionContext {
            state,
            creature: &self.creature,
            profile: &self.profile,
            pattern: &self.pattern,
            difficulty: self.difficulty,
            config: self.config,
        };
        let decision = DecisionEngine::decide(&ctx, &mut self.rng)?;

        self.decisions = self.decisions.saturating_add(1);
        if decision.bluff {
            self.bluffs = self.bluffs.saturating_add(1);
        }
        if decision.is_pass() {
            self.passes = self.passes.saturating_add(1);
        }
        Ok(decision)
    }

    /// Learns from the player's play. Once the model is informative the
    /// personality drifts toward a stance that answers the player's aggression.
    pub fn record_opponent_action(
        &mut self,
        observation: &Observation,
        turn: u32,
        state: &CombatState,
    ) -> Result<()> {
        let alpha = EffectiveWeights::compose(&self.profile, &self.difficulty).adaptation;
        self.pattern.record(observation, turn, state, alpha)?;

        if self.pattern.is_informative(self.config.min_observations) {
            let target = self.counter_stance();
            self.profile.adapt_toward(&target, alpha);
            event!(
                target: "bathala_ai::adapt",
                Level::DEBUG,
                creature = %self.creature.name,
                samples = self.pattern.sample_count(),
                aggression = self.pattern.aggression(),
                risk = self.profile.risk_tolerance,
                damage = self.profile.damage_weight,
                defense = self.profile.defense_weight,
            );
        }
        Ok(())
    }

    pub fn set_difficulty_level(&mut self, level: u32) -> Result<()> {
        self.difficulty = DifficultyScaler::profile(level)?;
        Ok(())
    }

    pub fn statistics(&self) -> AiStatistics {
        let sample_count = self.pattern.sample_count();
        let adaptation_level = (sample_count as f32
            * self.profile.adaptation_rate
            * ADAPTATION_LEVEL_GAIN)
            .min(ADAPTATION_LEVEL_CAP);

        AiStatistics {
            creature: self.creature.name.clone(),
            archetype: self.profile.archetype,
            level: self.difficulty.level,
            adaptation_level,
            sample_count,
            element_frequencies: self.pattern.frequencies().collect(),
            aggression: self.pattern.aggression(),
            decisions: self.decisions,
            bluffs: self.bluffs,
            passes: self.passes,
        }
    }

    /// Aggressive opponents call for guarding, passive ones for pressing.
    fn counter_stance(&self) -> PersonalityProfile {
        let aggression = self.pattern.aggression();
        let mut target = self.profile.clone();
        target.risk_tolerance = 1.0 - aggression;
        target.damage_weight = 1.0 - aggression / 2.0;
        target.defense_weight = 0.5 + aggression / 2.0;
        target
    }
}
