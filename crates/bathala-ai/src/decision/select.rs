use super::candidate::Candidate;
use super::scoring::ScoreBreakdown;
use crate::personality::Archetype;
use bathala_core::combat::CombatState;
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;

const MAX_BLUFF_DEPTH: usize = 3;
const CONFIDENCE_GAIN: f32 = 8.0;
const CAUTIOUS_BLUFF_HEALTH: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
    pub utility: f32,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate, breakdown: ScoreBreakdown) -> Self {
        let utility = breakdown.utility();
        Self {
            candidate,
            breakdown,
            utility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub index: usize,
    pub bluff: bool,
}

/// Utilities within a millionth count as equal.
fn utility_key(utility: f32) -> i64 {
    (f64::from(utility) * 1e6).round() as i64
}

fn rank_cmp(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    utility_key(b.utility)
        .cmp(&utility_key(a.utility))
        .then(a.candidate.variance.total_cmp(&b.candidate.variance))
        .then(a.candidate.id.cmp(&b.candidate.id))
}

/// Best first: utility, then lower variance, then gather order.
pub(crate) fn rank(scored: &mut [ScoredCandidate]) {
    scored.sort_by(rank_cmp);
}

/// Cautious creatures stop bluffing once half their health is gone.
pub(crate) fn bluff_permitted(archetype: Archetype, state: &CombatState) -> bool {
    match archetype {
        Archetype::Cautious => state.ai.health_fraction() > CAUTIOUS_BLUFF_HEALTH,
        _ => true,
    }
}

/// Picks from an already ranked list. The bluff roll is always drawn so the
/// random stream does not depend on whether bluffing was allowed.
pub(crate) fn select<R: Rng + ?Sized>(
    ranked: &[ScoredCandidate],
    bluff_chance: f32,
    allow_bluff: bool,
    rng: &mut R,
) -> Option<Selection> {
    if ranked.is_empty() {
        return None;
    }
    let roll: f32 = rng.r#gen();
    if allow_bluff && ranked.len() > 1 && roll < bluff_chance {
        let depth = ranked.len().min(MAX_BLUFF_DEPTH);
        let index = if depth > 2 { rng.gen_range(1..depth) } else { 1 };
        return Some(Selection { index, bluff: true });
    }
    Some(Selection {
        index: 0,
        bluff: false,
    })
}

/// Logistic squash of the gap between the pick and its best rival.
pub(crate) fn confidence(ranked: &[ScoredCandidate], selection: Selection) -> f32 {
    let chosen = ranked[selection.index].utility;
    let rival = if selection.bluff {
        ranked.first().map(|best| best.utility)
    } else {
        ranked.get(1).map(|next| next.utility)
    };
    let margin = match rival {
        Some(rival) => chosen - rival,
        None => chosen.max(0.0),
    };
    sigmoid(margin * CONFIDENCE_GAIN)
}

fn sigmoid(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}
