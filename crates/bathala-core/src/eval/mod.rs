//! Combinatorial hand evaluation.
//!
//! - `category`: poker categories and their base values.
//! - `elemental`: per-element modifiers and special-effect tags.
//! - `evaluator`: subset enumeration, scoring and ranking.

mod category;
mod elemental;
mod evaluator;

pub use category::HandCategory;
pub use elemental::{ElementalOutcome, SpecialEffect};
pub use evaluator::{
    EvalError, HandEvaluation, HandEvaluator, MAX_HAND_CARDS, SubsetEvaluation, SubsetMask,
};
