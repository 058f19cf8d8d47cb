use super::candidate::{Candidate, counter_share};
use crate::difficulty::DifficultyProfile;
use crate::personality::{Archetype, PersonalityProfile, unit};
use bathala_core::combat::CombatState;
use bathala_core::model::element::Element;
use core::fmt;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DAMAGE_SCALE: f32 = 50.0;
pub const BLOCK_SCALE: f32 = 20.0;

const AFFINITY_PER_CARD: f32 = 0.05;
const COUNTER_WEIGHT: f32 = 0.25;
const COUNTER_BASE_STRENGTH: f32 = 0.5;
const CHAOS_SWING: f32 = 0.15;
const CAUTION_PENALTY: f32 = 0.6;
const FINISHER_BONUS: f32 = 0.3;
const FINISHER_HEALTH: f32 = 0.3;
const EFFICIENCY_BONUS: f32 = 0.08;
const EFFICIENCY_PER_CARD: f32 = 10.0;
const PURITY_BONUS: f32 = 0.1;
const PURITY_CARDS: u8 = 2;
const ADAPTIVE_COUNTER_GAIN: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Damage,
    Defense,
    Risk,
    Affinity,
    Counter,
    Archetype,
}

impl Factor {
    pub const fn label(self) -> &'static str {
        match self {
            Factor::Damage => "damage",
            Factor::Defense => "defense",
            Factor::Risk => "risk",
            Factor::Affinity => "affinity",
            Factor::Counter => "counter",
            Factor::Archetype => "archetype",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-factor contributions; utility is their sum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub damage: f32,
    pub defense: f32,
    pub risk: f32,
    pub affinity: f32,
    pub counter: f32,
    pub archetype: f32,
}

impl ScoreBreakdown {
    pub fn contributions(&self) -> [(Factor, f32); 6] {
        [
            (Factor::Damage, self.damage),
            (Factor::Defense, self.defense),
            (Factor::Risk, self.risk),
            (Factor::Affinity, self.affinity),
            (Factor::Counter, self.counter),
            (Factor::Archetype, self.archetype),
        ]
    }

    pub fn utility(&self) -> f32 {
        self.contributions().iter().map(|(_, value)| value).sum()
    }

    /// Factor with the largest magnitude; earlier factors win ties.
    pub fn dominant(&self) -> Factor {
        let mut best = (Factor::Damage, self.damage.abs());
        for (factor, value) in self.contributions() {
            if value.abs() > best.1 {
                best = (factor, value.abs());
            }
        }
        best.0
    }
}

/// Personality weights after difficulty scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveWeights {
    pub damage: f32,
    pub defense: f32,
    pub risk: f32,
    pub bluff: f32,
    pub adaptation: f32,
    pub jitter: f32,
    pub damage_multiplier: f32,
}

impl EffectiveWeights {
    pub fn compose(profile: &PersonalityProfile, difficulty: &DifficultyProfile) -> Self {
        Self {
            damage: profile.damage_weight * difficulty.damage_multiplier,
            defense: profile.defense_weight,
            risk: profile.risk_tolerance,
            bluff: unit(profile.bluff_chance * difficulty.jitter_amplitude),
            adaptation: unit(profile.adaptation_rate * difficulty.adaptation_multiplier),
            jitter: difficulty.jitter_amplitude,
            damage_multiplier: difficulty.damage_multiplier,
        }
    }
}

/// Steering toward the element that beats the opponent's habit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CounterBias {
    pub dominant: Element,
    pub counter: Element,
    pub strength: f32,
}

impl CounterBias {
    pub(crate) fn new(dominant: Element, weights: &EffectiveWeights) -> Option<Self> {
        let counter = dominant.counter();
        (counter != dominant).then(|| Self {
            dominant,
            counter,
            strength: COUNTER_BASE_STRENGTH + weights.adaptation,
        })
    }
}

pub(crate) struct ScoreInput<'a> {
    pub profile: &'a PersonalityProfile,
    pub weights: EffectiveWeights,
    pub state: &'a CombatState,
    pub counter: Option<CounterBias>,
}

pub(crate) fn score<R: Rng + ?Sized>(
    candidate: &Candidate,
    input: &ScoreInput<'_>,
    rng: &mut R,
) -> ScoreBreakdown {
    let weights = &input.weights;
    let normalized_damage = candidate.damage as f32 / DAMAGE_SCALE;
    let normalized_block = candidate.block as f32 / BLOCK_SCALE;

    let preferred: u32 = input
        .profile
        .preferred_elements
        .iter()
        .map(|element| candidate.elements.count(*element) as u32)
        .sum();

    let counter = input.counter.map_or(0.0, |bias| {
        COUNTER_WEIGHT
            * bias.strength
            * counter_share(candidate, bias.dominant, bias.counter, input.profile)
    });

    let mut breakdown = ScoreBreakdown {
        damage: weights.damage * normalized_damage,
        defense: weights.defense * normalized_block,
        risk: weights.risk * candidate.variance,
        affinity: AFFINITY_PER_CARD * preferred as f32,
        counter,
        archetype: 0.0,
    };
    breakdown.archetype = archetype_term(candidate, input, normalized_damage, counter, rng);
    breakdown
}

fn archetype_term<R: Rng + ?Sized>(
    candidate: &Candidate,
    input: &ScoreInput<'_>,
    normalized_damage: f32,
    counter: f32,
    rng: &mut R,
) -> f32 {
    match input.profile.archetype {
        Archetype::Chaotic => rng.gen_range(-1.0f32..=1.0) * CHAOS_SWING * input.weights.jitter,
        Archetype::Cautious => {
            let missing = 1.0 - input.state.ai.health_fraction();
            -CAUTION_PENALTY * missing * (candidate.variance + normalized_damage)
        }
        Archetype::Aggressive => {
            if input.state.player.health_fraction() < FINISHER_HEALTH {
                FINISHER_BONUS * normalized_damage
            } else {
                0.0
            }
        }
        Archetype::Calculating => {
            let per_card =
                (candidate.damage + candidate.block) as f32 / candidate.size().max(1) as f32;
            EFFICIENCY_BONUS * (per_card / EFFICIENCY_PER_CARD).min(1.0)
        }
        Archetype::Elemental => {
            let pure = Element::ALL
                .into_iter()
                .filter(|element| *element != Element::Neutral)
                .any(|element| candidate.elements.count(element) >= PURITY_CARDS);
            if pure { PURITY_BONUS } else { 0.0 }
        }
        Archetype::Adaptive => ADAPTIVE_COUNTER_GAIN * counter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::candidate::{CandidateId, CandidateKind};
    use crate::difficulty::DifficultyScaler;
    use bathala_core::combat::{CombatantState, FixedAction};
    use bathala_core::eval::HandEvaluation;
    use bathala_core::model::card::Card;
    use bathala_core::model::element::ElementTally;
    use bathala_core::model::rank::Rank;
    use bathala_core::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn candidate(damage: u32, block: u32, variance: f32, elements: &[Element]) -> Candidate {
        Candidate {
            id: CandidateId(0),
            kind: CandidateKind::Action(FixedAction::Attack),
            damage,
            block,
            variance,
            elements: ElementTally::from_elements(elements.iter().copied()),
            effects: Vec::new(),
        }
    }

    fn input<'a>(profile: &'a PersonalityProfile, state: &'a CombatState) -> ScoreInput<'a> {
        let difficulty = DifficultyScaler::profile(1).unwrap();
        ScoreInput {
            profile,
            weights: EffectiveWeights::compose(profile, &difficulty),
            state,
            counter: None,
        }
    }

    fn full_health() -> CombatState {
        CombatState::new(CombatantState::full(50), CombatantState::full(50), 1)
    }

    #[test]
    fn weights_scale_with_difficulty() {
        let profile = Archetype::Aggressive.template();
        let easy = EffectiveWeights::compose(&profile, &DifficultyScaler::profile(1).unwrap());
        let hard = EffectiveWeights::compose(&profile, &DifficultyScaler::profile(10).unwrap());
        assert!(hard.damage > easy.damage);
        assert!(hard.bluff < easy.bluff);
        assert!(hard.adaptation > easy.adaptation);
        assert!((0.0..=1.0).contains(&hard.adaptation));
    }

    #[test]
    fn more_damage_and_block_never_scores_lower() {
        let state = full_health();
        let mut rng = StdRng::seed_from_u64(3);
        for archetype in Archetype::ALL {
            if archetype == Archetype::Chaotic {
                continue;
            }
            let profile = archetype.template();
            let input = input(&profile, &state);
            let weak = score(&candidate(6, 2, 0.3, &[Element::Fire]), &input, &mut rng);
            let strong = score(&candidate(12, 4, 0.3, &[Element::Fire]), &input, &mut rng);
            assert!(
                strong.utility() >= weak.utility(),
                "{archetype} preferred the weaker play"
            );
        }
    }

    #[test]
    fn cautious_penalty_grows_with_missing_health() {
        let profile = Archetype::Cautious.template();
        let healthy = full_health();
        let hurt = CombatState::new(CombatantState::full(50), CombatantState::new(10, 50), 1);
        let attack = candidate(10, 0, 0.5, &[]);
        let mut rng = StdRng::seed_from_u64(1);

        let calm = score(&attack, &input(&profile, &healthy), &mut rng);
        let scared = score(&attack, &input(&profile, &hurt), &mut rng);
        assert_eq!(calm.archetype, 0.0);
        assert!(scared.archetype < 0.0);
        assert_eq!(scared.dominant(), Factor::Archetype);
    }

    #[test]
    fn counter_bias_rewards_counter_element() {
        let profile = Archetype::Cautious.template();
        assert!(!profile.prefers(Element::Fire));
        let state = full_health();
        let mut scoring = input(&profile, &state);
        scoring.counter = CounterBias::new(Element::Fire, &scoring.weights);
        let mut rng = StdRng::seed_from_u64(5);

        let water = score(&candidate(5, 2, 0.1, &[Element::Water]), &scoring, &mut rng);
        let fire = score(&candidate(7, 0, 0.1, &[Element::Fire]), &scoring, &mut rng);
        assert!(water.counter > 0.0);
        assert!(fire.counter < 0.0);
        assert!(water.utility() > fire.utility());
    }

    #[test]
    fn neutral_habits_have_no_counter() {
        let profile = Archetype::Adaptive.template();
        let weights = EffectiveWeights::compose(&profile, &DifficultyScaler::profile(3).unwrap());
        assert!(CounterBias::new(Element::Neutral, &weights).is_none());
    }

    #[test]
    fn chaotic_jitter_stays_within_swing() {
        let profile = Archetype::Chaotic.template();
        let state = full_health();
        let scoring = input(&profile, &state);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let breakdown = score(&candidate(5, 5, 0.2, &[]), &scoring, &mut rng);
            assert!(breakdown.archetype.abs() <= CHAOS_SWING * scoring.weights.jitter + 1e-6);
        }
    }

    #[test]
    fn elemental_likes_pure_pairs() {
        let profile = Archetype::Elemental.template();
        let state = full_health();
        let scoring = input(&profile, &state);
        let mut rng = StdRng::seed_from_u64(2);
        let pure = score(&candidate(9, 0, 0.2, &[Element::Air, Element::Air]), &scoring, &mut rng);
        let mixed = score(&candidate(9, 0, 0.2, &[Element::Air, Element::Fire]), &scoring, &mut rng);
        assert_eq!(pure.archetype, PURITY_BONUS);
        assert_eq!(mixed.archetype, 0.0);
    }

    fn played(damage: u32, block: u32, variance: f32, elements: &[Element]) -> Candidate {
        let cards = elements
            .iter()
            .zip(Rank::ORDERED)
            .map(|(element, rank)| Card::new(rank, Suit::Clubs, *element))
            .collect();
        Candidate {
            id: CandidateId(0),
            kind: CandidateKind::Cards {
                cards,
                evaluation: HandEvaluation::zero(),
            },
            damage,
            block,
            variance,
            elements: ElementTally::from_elements(elements.iter().copied()),
            effects: Vec::new(),
        }
    }

    #[test]
    fn counter_bias_spares_preferred_dominant_element() {
        let profile = Archetype::Elemental.template();
        let state = full_health();
        let mut scoring = input(&profile, &state);
        scoring.counter = CounterBias::new(Element::Fire, &scoring.weights);

        let water = played(9, 2, 0.3, &[Element::Water]);
        let with_fire = played(9, 2, 0.3, &[Element::Water, Element::Fire]);
        let without = score(&water, &scoring, &mut StdRng::seed_from_u64(4));
        let added = score(&with_fire, &scoring, &mut StdRng::seed_from_u64(4));
        assert_eq!(added.counter, without.counter);
        assert!(added.utility() > without.utility());
    }

    #[test]
    fn adding_a_preferred_card_never_lowers_utility() {
        let hurt = CombatState::new(CombatantState::new(12, 50), CombatantState::new(15, 50), 4);
        let states = [full_health(), hurt];
        let bases: [(u32, u32, f32, &[Element]); 5] = [
            (0, 0, 0.1, &[]),
            (9, 2, 0.3, &[Element::Water]),
            (10, 0, 0.2, &[Element::Neutral]),
            (12, 4, 0.5, &[Element::Fire, Element::Fire]),
            (20, 5, 0.7, &[Element::Earth, Element::Air, Element::Water]),
        ];
        let habits = [
            None,
            Some(Element::Fire),
            Some(Element::Water),
            Some(Element::Earth),
            Some(Element::Air),
        ];

        for archetype in Archetype::ALL {
            let profile = archetype.template();
            for level in [1, 5, 10] {
                let difficulty = DifficultyScaler::profile(level).unwrap();
                let weights = EffectiveWeights::compose(&profile, &difficulty);
                for state in &states {
                    for habit in habits {
                        let scoring = ScoreInput {
                            profile: &profile,
                            weights,
                            state,
                            counter: habit.and_then(|dominant| CounterBias::new(dominant, &weights)),
                        };
                        for (damage, block, variance, elements) in bases {
                            let base = played(damage, block, variance, elements);
                            let before = score(&base, &scoring, &mut StdRng::seed_from_u64(21));
                            for extra in profile.preferred_elements.iter().copied() {
                                let mut grown = elements.to_vec();
                                grown.push(extra);
                                let grown = played(damage, block, variance, &grown);
                                let after = score(&grown, &scoring, &mut StdRng::seed_from_u64(21));
                                assert!(
                                    after.utility() >= before.utility(),
                                    "{archetype} level {level} habit {habit:?}: adding {extra} to {elements:?} \
                                     dropped utility {} -> {}",
                                    before.utility(),
                                    after.utility()
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
