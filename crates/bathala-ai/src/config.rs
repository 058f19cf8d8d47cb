use crate::error::{AiError, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_OBSERVATIONS: u32 = 3;

const MODE_KEY: &str = "BATHALA_CANDIDATE_MODE";
const MIN_OBSERVATIONS_KEY: &str = "BATHALA_MIN_OBSERVATIONS";
const BLUFFING_KEY: &str = "BATHALA_BLUFFING";

/// Where candidates come from. There is no default: card-holding and
/// action-based creatures are configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMode {
    /// Every non-empty subset of the AI's card pool.
    CardSubsets,
    /// Attack, defend and status derived from the creature's base stats.
    FixedActions,
}

impl CandidateMode {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateMode::CardSubsets => "card_subsets",
            CandidateMode::FixedActions => "fixed_actions",
        }
    }
}

impl fmt::Display for CandidateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CandidateMode {
    type Err = AiError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cards" | "subsets" | "card_subsets" => Ok(CandidateMode::CardSubsets),
            "actions" | "fixed" | "fixed_actions" => Ok(CandidateMode::FixedActions),
            _ => Err(AiError::InvalidConfig {
                key: MODE_KEY,
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub candidate_mode: CandidateMode,
    /// Samples the pattern model must exceed before it steers scoring.
    #[serde(default = "default_min_observations")]
    pub min_observations: u32,
    #[serde(default = "default_bluffing")]
    pub bluffing: bool,
}

impl AiConfig {
    pub const fn new(candidate_mode: CandidateMode) -> Self {
        Self {
            candidate_mode,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            bluffing: true,
        }
    }

    pub const fn card_subsets() -> Self {
        Self::new(CandidateMode::CardSubsets)
    }

    pub const fn fixed_actions() -> Self {
        Self::new(CandidateMode::FixedActions)
    }

    pub const fn with_min_observations(mut self, min_observations: u32) -> Self {
        self.min_observations = min_observations;
        self
    }

    pub const fn with_bluffing(mut self, enabled: bool) -> Self {
        self.bluffing = enabled;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let candidate_mode = read(MODE_KEY)
            .ok_or(AiError::MissingConfig(MODE_KEY))?
            .parse::<CandidateMode>()?;

        let min_observations = match read(MIN_OBSERVATIONS_KEY) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| AiError::InvalidConfig {
                    key: MIN_OBSERVATIONS_KEY,
                    value: raw.clone(),
                })?,
            None => DEFAULT_MIN_OBSERVATIONS,
        };

        let bluffing = read(BLUFFING_KEY)
            .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(true);

        Ok(Self {
            candidate_mode,
            min_observations,
            bluffing,
        })
    }
}

fn default_min_observations() -> u32 {
    DEFAULT_MIN_OBSERVATIONS
}

fn default_bluffing() -> bool {
    true
}
