use bathala_core::combat::CombatError;
use bathala_core::eval::EvalError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    #[error("invalid combat snapshot: {0}")]
    Combat(#[from] CombatError),
    #[error("hand evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error("difficulty level must be at least 1 (got {0})")]
    InvalidLevel(u32),
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, AiError>;
