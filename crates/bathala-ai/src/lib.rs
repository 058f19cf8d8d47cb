pub mod agent;
pub mod config;
pub mod creature;
pub mod decision;
pub mod difficulty;
pub mod error;
pub mod pattern;
pub mod personality;
pub mod tuning;

pub use agent::{AiStatistics, CreatureAi};
pub use config::{AiConfig, CandidateMode};
pub use creature::CreatureProfile;
pub use decision::{
    Candidate, CandidateId, CandidateKind, Decision, DecisionContext, DecisionEngine,
    DecisionKind, Effect, Factor, Reasoning, ScoreBreakdown, ScoredCandidate,
};
pub use difficulty::{DifficultyProfile, DifficultyScaler};
pub use error::{AiError, Result};
pub use pattern::{Observation, OpponentPatternModel};
pub use personality::{Archetype, PersonalityProfile};
pub use tuning::{DifficultyTuner, LevelChange};
