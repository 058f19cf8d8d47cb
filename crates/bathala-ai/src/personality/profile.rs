use bathala_core::model::element::Element;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Cautious,
    Aggressive,
    Calculating,
    Elemental,
    Chaotic,
    Adaptive,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Cautious,
        Archetype::Aggressive,
        Archetype::Calculating,
        Archetype::Elemental,
        Archetype::Chaotic,
        Archetype::Adaptive,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Archetype::Cautious => "cautious",
            Archetype::Aggressive => "aggressive",
            Archetype::Calculating => "calculating",
            Archetype::Elemental => "elemental",
            Archetype::Chaotic => "chaotic",
            Archetype::Adaptive => "adaptive",
        }
    }

    /// Fresh copy of the archetype's template row.
    pub fn template(self) -> PersonalityProfile {
        use Element::{Air, Earth, Fire, Neutral, Water};

        let (risk, damage, defense, bluff, adaptation, elements): (_, _, _, _, _, &[Element]) =
            match self {
                Archetype::Cautious => (0.2, 0.4, 0.8, 0.1, 0.2, &[Earth, Water]),
                Archetype::Aggressive => (0.9, 1.0, 0.2, 0.4, 0.3, &[Fire, Air]),
                Archetype::Calculating => (0.5, 0.7, 0.6, 0.15, 0.1, &[Neutral]),
                Archetype::Elemental => (0.6, 0.6, 0.4, 0.2, 0.25, &[Fire, Water, Earth, Air]),
                Archetype::Chaotic => (0.8, 0.7, 0.3, 0.5, 0.4, &[Fire, Air]),
                Archetype::Adaptive => (0.5, 0.6, 0.5, 0.25, 0.5, &[Neutral]),
            };

        PersonalityProfile {
            archetype: self,
            risk_tolerance: risk,
            damage_weight: damage,
            defense_weight: defense,
            bluff_chance: bluff,
            adaptation_rate: adaptation,
            preferred_elements: elements.iter().copied().collect(),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Archetype::ALL
            .into_iter()
            .find(|archetype| archetype.label() == wanted)
            .ok_or_else(|| format!("unknown archetype '{raw}'"))
    }
}

/// Weight vector steering the shared scoring function.
///
/// Each AI owns its copy; only adaptation moves the numbers and every
/// move ends with a clamp back into [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub archetype: Archetype,
    pub risk_tolerance: f32,
    pub damage_weight: f32,
    pub defense_weight: f32,
    pub bluff_chance: f32,
    pub adaptation_rate: f32,
    pub preferred_elements: BTreeSet<Element>,
}

impl PersonalityProfile {
    pub fn prefers(&self, element: Element) -> bool {
        self.preferred_elements.contains(&element)
    }

    /// Moves every weight a `rate` fraction of the way toward `target`.
    /// Archetype and preferred elements stay put.
    pub fn adapt_toward(&mut self, target: &PersonalityProfile, rate: f32) {
        let rate = unit(rate);
        let nudge = |current: f32, goal: f32| current + (goal - current) * rate;

        self.risk_tolerance = nudge(self.risk_tolerance, target.risk_tolerance);
        self.damage_weight = nudge(self.damage_weight, target.damage_weight);
        self.defense_weight = nudge(self.defense_weight, target.defense_weight);
        self.bluff_chance = nudge(self.bluff_chance, target.bluff_chance);
        self.adaptation_rate = nudge(self.adaptation_rate, target.adaptation_rate);
        self.clamp();
    }

    pub fn clamp(&mut self) {
        for weight in [
            &mut self.risk_tolerance,
            &mut self.damage_weight,
            &mut self.defense_weight,
            &mut self.bluff_chance,
            &mut self.adaptation_rate,
        ] {
            *weight = unit(*weight);
        }
    }

    pub fn weights(&self) -> [f32; 5] {
        [
            self.risk_tolerance,
            self.damage_weight,
            self.defense_weight,
            self.bluff_chance,
            self.adaptation_rate,
        ]
    }
}

/// Clamp into [0, 1]; NaN collapses to zero.
pub(crate) fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
