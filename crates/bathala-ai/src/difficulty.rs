use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};

/// Levels at and above this use the hard anchor unchanged.
pub const TOP_SCALED_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy)]
struct Anchor {
    damage_multiplier: f32,
    jitter_amplitude: f32,
    adaptation_multiplier: f32,
    target_win_rate: f32,
}

const EASIEST: Anchor = Anchor {
    damage_multiplier: 0.7,
    jitter_amplitude: 1.0,
    adaptation_multiplier: 0.5,
    target_win_rate: 0.30,
};

const HARDEST: Anchor = Anchor {
    damage_multiplier: 1.5,
    jitter_amplitude: 0.25,
    adaptation_multiplier: 1.5,
    target_win_rate: 0.80,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub level: u32,
    pub damage_multiplier: f32,
    /// Scales bluff chance and chaotic jitter.
    pub jitter_amplitude: f32,
    pub adaptation_multiplier: f32,
    pub target_win_rate: f32,
}

pub struct DifficultyScaler;

impl DifficultyScaler {
    pub fn profile(level: u32) -> Result<DifficultyProfile> {
        if level == 0 {
            return Err(AiError::InvalidLevel(level));
        }
        Ok(interpolate(level))
    }
}

/// Callers guarantee `level >= 1`.
pub(crate) fn interpolate(level: u32) -> DifficultyProfile {
    let step = level.clamp(1, TOP_SCALED_LEVEL) - 1;
    let t = step as f32 / (TOP_SCALED_LEVEL - 1) as f32;
    let lerp = |from: f32, to: f32| from + (to - from) * t;

    DifficultyProfile {
        level,
        damage_multiplier: lerp(EASIEST.damage_multiplier, HARDEST.damage_multiplier),
        jitter_amplitude: lerp(EASIEST.jitter_amplitude, HARDEST.jitter_amplitude),
        adaptation_multiplier: lerp(
            EASIEST.adaptation_multiplier,
            HARDEST.adaptation_multiplier,
        ),
        target_win_rate: lerp(EASIEST.target_win_rate, HARDEST.target_win_rate),
    }
}
