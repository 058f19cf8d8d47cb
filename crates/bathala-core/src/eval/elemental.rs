use crate::model::element::{Element, ElementTally};
use core::fmt;
use serde::{Deserialize, Serialize};

const FIRE_DAMAGE_PER_CARD: u32 = 2;
const WATER_BLOCK_PER_CARD: u32 = 2;
const EARTH_DAMAGE_PER_CARD: u32 = 1;
const EARTH_MASTERY_BONUS: u32 = 5;
const SYNERGY_THRESHOLD: u8 = 3;

/// Tags attached to an evaluation by its elemental make-up.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Three or more Fire cards: burn over time.
    Ignite,
    /// Three or more Water cards, or Earth mastery: restore health.
    Heal,
    /// Three or more Earth cards: flat damage and armour.
    EarthMastery,
    /// Every card is Air: the whole subset counts double.
    AirMastery,
}

impl SpecialEffect {
    pub const fn label(self) -> &'static str {
        match self {
            SpecialEffect::Ignite => "ignite",
            SpecialEffect::Heal => "heal",
            SpecialEffect::EarthMastery => "earth_mastery",
            SpecialEffect::AirMastery => "air_mastery",
        }
    }
}

impl fmt::Display for SpecialEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Damage and block after elemental modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementalOutcome {
    pub damage: u32,
    pub block: u32,
    pub effects: Vec<SpecialEffect>,
}

impl ElementalOutcome {
    pub fn total(&self) -> u32 {
        self.damage + self.block
    }
}

/// Applies the elemental rules on top of a category base score.
///
/// Fire and Earth feed damage, Water feeds block. Air doubling runs after
/// every other modifier.
pub(crate) fn apply(base_score: u32, tally: &ElementTally) -> ElementalOutcome {
    let fire = tally.count(Element::Fire);
    let water = tally.count(Element::Water);
    let earth = tally.count(Element::Earth);

    let mut damage = base_score;
    let mut block = 0u32;
    let mut effects = Vec::new();

    damage += fire as u32 * FIRE_DAMAGE_PER_CARD;
    if fire >= SYNERGY_THRESHOLD {
        effects.push(SpecialEffect::Ignite);
    }

    block += water as u32 * WATER_BLOCK_PER_CARD;
    if water >= SYNERGY_THRESHOLD {
        effects.push(SpecialEffect::Heal);
    }

    damage += earth as u32 * EARTH_DAMAGE_PER_CARD;
    if earth >= SYNERGY_THRESHOLD {
        damage += EARTH_MASTERY_BONUS;
        effects.push(SpecialEffect::EarthMastery);
        effects.push(SpecialEffect::Heal);
    }

    if tally.is_pure(Element::Air) {
        damage *= 2;
        block *= 2;
        effects.push(SpecialEffect::AirMastery);
    }

    effects.sort();
    effects.dedup();

    ElementalOutcome {
        damage,
        block,
        effects,
    }
}
